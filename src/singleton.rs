//! One shared instance per type.
//!
//! A [`SingletonGuard`] is a [`Registry`] whose key space holds exactly one key per
//! type: the type itself. The arguments of the first successful call build the
//! instance; every later call returns that same instance and its arguments are
//! dropped unused. Construction never runs again, so published state is never
//! overwritten.
//!
//! # Examples
//!
//! ```rust
//! use intern_registry::{BoxError, Singleton, SingletonGuard};
//!
//! struct President {
//!     name: String,
//! }
//!
//! impl Singleton for President {
//!     type Args = &'static str;
//!
//!     fn create(name: &'static str) -> Result<Self, BoxError> {
//!         Ok(President { name: name.to_string() })
//!     }
//! }
//!
//! let guard = SingletonGuard::new();
//! let p1 = guard.get_instance::<President>("Abraham Lincoln").unwrap();
//! let p2 = guard.get_instance::<President>("Barack Obama").unwrap();
//!
//! assert!(std::sync::Arc::ptr_eq(&p1, &p2));
//! assert_eq!(p2.name, "Abraham Lincoln");
//! ```

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::debug;

use crate::{BoxError, Registry, RegistryConfig, RegistryError, RegistryEvent};

type AnyArc = Arc<dyn Any + Send + Sync>;

/// A type built at most once per [`SingletonGuard`].
pub trait Singleton: Send + Sync + Sized + 'static {
    /// Arguments consumed by the first successful call only.
    type Args;

    /// Builds the instance. Runs at most once per guard unless it fails.
    fn create(args: Self::Args) -> Result<Self, BoxError>;
}

/// Registry key standing for a type. Equality and hashing use the `TypeId`; the
/// name is only carried for logs and events.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the type `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Name of the type, as reported by [`std::any::type_name`].
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Thread-safe, first-call-wins store of one instance per type.
#[derive(Debug, Default)]
pub struct SingletonGuard {
    instances: Registry<TypeKey, dyn Any + Send + Sync>,
}

impl SingletonGuard {
    /// Creates an empty guard with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty guard named and sized by `config`.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            instances: Registry::with_config(config),
        }
    }

    /// Name used in log records for this guard.
    pub fn name(&self) -> &str {
        self.instances.name()
    }

    /// Returns the instance of `T`, creating it from `args` if this is the first
    /// successful call for `T`.
    ///
    /// Once `T` exists, `args` is dropped without being looked at.
    ///
    /// # Errors
    ///
    /// [`RegistryError::ConstructionFailed`] if [`Singleton::create`] fails; the next
    /// call gets to try again with its own arguments.
    pub fn get_instance<T: Singleton>(&self, args: T::Args) -> Result<Arc<T>, RegistryError> {
        let mut created = false;
        let instance = self.get_or_init(|| {
            created = true;
            T::create(args)
        })?;
        if !created {
            debug!(
                registry = %self.instances.name(),
                type_name = type_name::<T>(),
                "instance already initialized, arguments ignored"
            );
        }
        Ok(instance)
    }

    /// Returns the instance of `T`, running `init` if none exists yet.
    ///
    /// Useful for types that do not implement [`Singleton`]. `init` must not
    /// request `T` from this guard; that call would wait on itself forever.
    pub fn get_or_init<T, F, E>(&self, init: F) -> Result<Arc<T>, RegistryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        let instance = self
            .instances
            .get_or_create_arc(TypeKey::of::<T>(), || init().map(|value| Arc::new(value) as AnyArc))?;
        downcast(instance)
    }

    /// Retrieve the instance of `T` if it was already created.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.instances
            .get(&TypeKey::of::<T>())
            .and_then(|instance| downcast(instance).ok())
    }

    /// Check if an instance of `T` exists.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.instances.contains(&TypeKey::of::<T>())
    }

    /// Number of types with a created instance.
    pub fn size(&self) -> usize {
        self.instances.size()
    }

    /// Set a tracing callback for this guard. Event keys are type names.
    ///
    /// Same rules as [`Registry::set_trace_callback`]: a callback handling
    /// [`RegistryEvent::Construct`] must not request the type being built.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        self.instances.set_trace_callback(callback)
    }

    /// Clear the tracing callback. Does not affect stored instances.
    pub fn clear_trace_callback(&self) {
        self.instances.clear_trace_callback()
    }
}

fn downcast<T: Send + Sync + 'static>(instance: AnyArc) -> Result<Arc<T>, RegistryError> {
    instance
        .downcast::<T>()
        .map_err(|_| RegistryError::TypeMismatch {
            type_name: type_name::<T>(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::convert::Infallible;

    #[derive(Debug)]
    struct President {
        name: String,
    }

    impl Singleton for President {
        type Args = String;

        fn create(name: String) -> Result<Self, BoxError> {
            if name.is_empty() {
                return Err("a president needs a name".into());
            }
            Ok(President { name })
        }
    }

    #[test]
    fn test_first_call_wins() {
        let guard = SingletonGuard::new();

        let a = guard.get_instance::<President>("A".to_string()).unwrap();
        let b = guard.get_instance::<President>("B".to_string()).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name, "A");
        assert_eq!(b.name, "A");
        assert_eq!(guard.size(), 1);
    }

    #[test]
    fn test_failed_create_is_retryable() {
        let guard = SingletonGuard::new();

        let err = guard.get_instance::<President>(String::new()).unwrap_err();
        assert!(err.is_construction_failed());
        assert!(!guard.contains::<President>());
        assert_eq!(guard.size(), 0);

        let president = guard.get_instance::<President>("B".to_string()).unwrap();
        assert_eq!(president.name, "B");
        assert_eq!(guard.size(), 1);
    }

    #[test]
    fn test_get_or_init_per_type() {
        let guard = SingletonGuard::new();

        let n = guard.get_or_init(|| Ok::<_, Infallible>(42u32)).unwrap();
        let s = guard.get_or_init(|| Ok::<_, Infallible>("hello".to_string())).unwrap();
        let again = guard.get_or_init(|| Ok::<_, Infallible>(7u32)).unwrap();

        assert_eq!(*n, 42);
        assert_eq!(&*s, "hello");
        assert!(Arc::ptr_eq(&n, &again));
        assert_eq!(guard.size(), 2);
    }

    #[test]
    fn test_get_and_contains() {
        let guard = SingletonGuard::new();
        assert!(guard.get::<u64>().is_none());
        assert!(!guard.contains::<u64>());

        guard.get_or_init(|| Ok::<_, Infallible>(1u64)).unwrap();
        assert_eq!(*guard.get::<u64>().unwrap(), 1);
        assert!(guard.contains::<u64>());
        assert!(!guard.contains::<u32>());
    }

    #[test]
    fn test_guards_are_isolated() {
        let first = SingletonGuard::new();
        let second = SingletonGuard::new();

        let a = first.get_instance::<President>("A".to_string()).unwrap();
        let b = second.get_instance::<President>("B".to_string()).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.name, "B");
    }

    #[test]
    fn test_type_key_identity() {
        let hash = |key: &TypeKey| {
            let mut hasher = DefaultHasher::new();
            key.hash(&mut hasher);
            hasher.finish()
        };

        assert_eq!(TypeKey::of::<u8>(), TypeKey::of::<u8>());
        assert_ne!(TypeKey::of::<u8>(), TypeKey::of::<i8>());
        assert_eq!(hash(&TypeKey::of::<String>()), hash(&TypeKey::of::<String>()));
        assert_eq!(format!("{:?}", TypeKey::of::<u8>()), "u8");
        assert_eq!(TypeKey::of::<bool>().type_name(), "bool");
    }

    #[test]
    fn test_downcast_mismatch_is_an_error() {
        let instance: AnyArc = Arc::new(5u8);
        let err = downcast::<u16>(instance).unwrap_err();
        assert!(matches!(err, RegistryError::TypeMismatch { type_name: "u16" }));
    }
}
