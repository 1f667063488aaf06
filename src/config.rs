use std::borrow::Cow;

/// Construction-time settings for a `Registry` or `SingletonGuard`.
///
/// # Examples
///
/// ```rust
/// use intern_registry::{Registry, RegistryConfig};
///
/// let config = RegistryConfig::new("tree-kinds").with_capacity(64);
/// let registry: Registry<String, String> = Registry::with_config(config);
/// assert_eq!(registry.name(), "tree-kinds");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Label attached to every log record and visible through `Registry::name`.
    pub name: Cow<'static, str>,
    /// Number of keys the map is pre-sized for.
    pub initial_capacity: usize,
}

impl RegistryConfig {
    /// Name used when none is configured.
    pub const DEFAULT_NAME: &'static str = "registry";

    /// Default configuration with the given `name`.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets how many keys the map is pre-sized for.
    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed(Self::DEFAULT_NAME),
            initial_capacity: 0,
        }
    }
}
