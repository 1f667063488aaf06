use std::fmt;
use std::sync::Arc;

use crate::{Registry, RegistryError, SharedObject};

/// A lightweight per-use wrapper: extrinsic state plus a shared reference to the
/// interned object for its key.
///
/// Handles are created per use site and dropped independently of the shared
/// object, which the registry keeps alive.
pub struct Handle<T: SharedObject> {
    extrinsic: T::Extrinsic,
    shared: Arc<T>,
}

impl<T: SharedObject> Handle<T> {
    /// Creates a handle for `key`, building the shared object through
    /// [`SharedObject::build`] if the registry does not hold it yet.
    ///
    /// # Errors
    ///
    /// [`RegistryError::ConstructionFailed`] if the shared object could not be built.
    pub fn new(
        registry: &Registry<T::Key, T>,
        extrinsic: T::Extrinsic,
        key: T::Key,
    ) -> Result<Self, RegistryError> {
        let shared = registry.get_or_create(key.clone(), || T::build(&key))?;
        Ok(Self::from_shared(extrinsic, shared))
    }

    /// Pairs `extrinsic` with an already interned object.
    pub fn from_shared(extrinsic: T::Extrinsic, shared: Arc<T>) -> Self {
        Self { extrinsic, shared }
    }

    /// Forwards the stored extrinsic state to the shared object.
    pub fn render(&self) -> T::Output {
        self.shared.render(&self.extrinsic)
    }

    /// Per-use state owned by this handle.
    pub fn extrinsic(&self) -> &T::Extrinsic {
        &self.extrinsic
    }

    /// The interned object this handle points at.
    pub fn shared(&self) -> &Arc<T> {
        &self.shared
    }

    /// Returns `true` if both handles point at the same shared object.
    pub fn shares_with(&self, other: &Handle<T>) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<T> Clone for Handle<T>
where
    T: SharedObject,
    T::Extrinsic: Clone,
{
    fn clone(&self) -> Self {
        Self {
            extrinsic: self.extrinsic.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for Handle<T>
where
    T: SharedObject + fmt::Debug,
    T::Extrinsic: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("extrinsic", &self.extrinsic)
            .field("shared", &self.shared)
            .finish()
    }
}
