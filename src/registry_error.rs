use thiserror::Error;

/// Boxed error produced by a constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The constructor for `key` returned an error. The key stays absent and
    /// a later call may retry.
    #[error("failed to construct shared object for key {key}")]
    ConstructionFailed {
        /// `Debug` rendering of the key.
        key: String,
        #[source]
        source: BoxError,
    },

    /// A singleton slot holds a value that is not of the requested type.
    #[error("type mismatch in registry: expected {type_name}")]
    TypeMismatch { type_name: &'static str },
}

impl RegistryError {
    pub(crate) fn construction_failed(key: &impl std::fmt::Debug, source: BoxError) -> Self {
        RegistryError::ConstructionFailed {
            key: format!("{key:?}"),
            source,
        }
    }

    /// Returns `true` if the error came from a failing constructor.
    pub fn is_construction_failed(&self) -> bool {
        matches!(self, RegistryError::ConstructionFailed { .. })
    }
}
