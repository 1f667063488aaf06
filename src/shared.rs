//! Shared objects: the heavyweight, immutable part of an object family.

use crate::{BoxError, RegistryKey};

/// An expensive object built once per key and shared by every [`Handle`](crate::Handle)
/// created for that key.
///
/// A shared object holds intrinsic state only. Anything specific to one use site is
/// passed in through [`render`](Self::render) instead of being stored.
///
/// # Examples
///
/// ```rust
/// use intern_registry::{BoxError, SharedObject};
///
/// struct Sprite {
///     name: String,
/// }
///
/// impl SharedObject for Sprite {
///     type Key = String;
///     type Extrinsic = (i32, i32);
///     type Output = String;
///
///     fn build(key: &String) -> Result<Self, BoxError> {
///         Ok(Sprite { name: key.clone() })
///     }
///
///     fn render(&self, &(x, y): &(i32, i32)) -> String {
///         format!("{} at ({x}, {y})", self.name)
///     }
/// }
///
/// let sprite = Sprite::build(&"ship".to_string()).unwrap();
/// assert_eq!(sprite.render(&(1, 2)), "ship at (1, 2)");
/// ```
pub trait SharedObject: Send + Sync + Sized + 'static {
    /// Canonical key built from the intrinsic fields.
    type Key: RegistryKey;
    /// Per-use state a handle stores and forwards.
    type Extrinsic;
    type Output;

    /// Builds the object for `key`. Called at most once per key by a registry.
    fn build(key: &Self::Key) -> Result<Self, BoxError>;

    /// Performs the family's operation for one use site.
    fn render(&self, extrinsic: &Self::Extrinsic) -> Self::Output;
}
