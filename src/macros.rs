//! Macros for declaring process-wide singleton modules.

/// Creates a module holding a process-wide [`SingletonGuard`](crate::SingletonGuard).
///
/// The macro generates a module containing:
/// - a guard static, built on first access and kept for the rest of the process
/// - free functions delegating to it
/// - `guard()`, for passing the guard by reference to code that takes one
///
/// Prefer an explicit `SingletonGuard` owned by your application; use this when a
/// guard genuinely has to live for the whole process.
///
/// # Examples
///
/// ```rust
/// use intern_registry::{define_singletons, BoxError, Singleton};
/// use std::sync::Arc;
///
/// define_singletons!(services);
///
/// struct Database {
///     url: String,
/// }
///
/// impl Singleton for Database {
///     type Args = &'static str;
///
///     fn create(url: &'static str) -> Result<Self, BoxError> {
///         Ok(Database { url: url.to_string() })
///     }
/// }
///
/// let db: Arc<Database> = services::get_instance("postgres://primary").unwrap();
/// let same: Arc<Database> = services::get_instance("postgres://replica").unwrap();
///
/// assert_eq!(same.url, "postgres://primary");
/// assert!(services::contains::<Database>());
/// assert_eq!(services::guard().name(), "services");
/// ```
#[macro_export]
macro_rules! define_singletons {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            static GUARD: LazyLock<$crate::SingletonGuard> = LazyLock::new(|| {
                $crate::SingletonGuard::with_config($crate::RegistryConfig::new(stringify!($name)))
            });

            /// The module's guard.
            pub fn guard() -> &'static $crate::SingletonGuard {
                &GUARD
            }

            /// Get the instance of `T`, creating it from `args` on the first call.
            pub fn get_instance<T: $crate::Singleton>(
                args: T::Args,
            ) -> Result<Arc<T>, $crate::RegistryError> {
                GUARD.get_instance::<T>(args)
            }

            /// Get the instance of `T`, running `init` if none exists yet.
            pub fn get_or_init<T, F, E>(init: F) -> Result<Arc<T>, $crate::RegistryError>
            where
                T: Send + Sync + 'static,
                F: FnOnce() -> Result<T, E>,
                E: Into<$crate::BoxError>,
            {
                GUARD.get_or_init(init)
            }

            /// Retrieve the instance of `T` if it exists.
            pub fn get<T: Send + Sync + 'static>() -> Option<Arc<T>> {
                GUARD.get::<T>()
            }

            /// Check if an instance of `T` exists.
            pub fn contains<T: Send + Sync + 'static>() -> bool {
                GUARD.contains::<T>()
            }

            /// Number of types with a created instance.
            pub fn size() -> usize {
                GUARD.size()
            }

            /// Set a tracing callback for guard operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                GUARD.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                GUARD.clear_trace_callback()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_define_singletons_macro() {
        define_singletons!(test_guard);

        let value: Arc<i32> = test_guard::get_or_init(|| Ok::<_, Infallible>(100)).unwrap();
        assert_eq!(*value, 100);

        assert!(test_guard::contains::<i32>());
        assert!(!test_guard::contains::<f64>());
        assert_eq!(test_guard::size(), 1);
        assert_eq!(*test_guard::get::<i32>().unwrap(), 100);
    }

    #[test]
    fn test_multiple_guards() {
        define_singletons!(guard_a);
        define_singletons!(guard_b);

        guard_a::get_or_init(|| Ok::<_, Infallible>(1i32)).unwrap();
        guard_b::get_or_init(|| Ok::<_, Infallible>(2i32)).unwrap();

        assert_eq!(*guard_a::get::<i32>().unwrap(), 1);
        assert_eq!(*guard_b::get::<i32>().unwrap(), 2);
    }

    #[test]
    fn test_tracing() {
        define_singletons!(trace_test);

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        trace_test::set_trace_callback(move |event| {
            events_clone.lock().unwrap().push(format!("{}", event));
        });

        trace_test::get_or_init(|| Ok::<_, Infallible>(42i32)).unwrap();
        trace_test::get_or_init(|| Ok::<_, Infallible>(0i32)).unwrap();

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 3);
        assert_eq!(recorded[0], "construct { key: i32 }");
        assert_eq!(recorded[1], "publish { key: i32, size: 1 }");
        assert_eq!(recorded[2], "hit { key: i32 }");
    }
}
