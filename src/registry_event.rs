/// Events emitted by a registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// Keys are carried in their `Debug` rendering so one callback type serves every
/// key type.
///
/// # Examples
///
/// ```rust
/// use intern_registry::RegistryEvent;
///
/// let event = RegistryEvent::Hit { key: "\"Oak\"".to_string() };
/// assert_eq!(event.to_string(), "hit { key: \"Oak\" }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A lookup found a ready entry; no constructor ran.
    Hit {
        /// The requested key.
        key: String,
    },

    /// This caller won the race for an absent key and is running its constructor.
    Construct {
        /// The key under construction.
        key: String,
    },

    /// A newly constructed object became visible to every caller.
    Publish {
        /// The published key.
        key: String,
        /// Number of ready entries after publication.
        size: usize,
    },

    /// A constructor returned an error; the key is absent again.
    ConstructionFailed {
        /// The key whose constructor failed.
        key: String,
    },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Hit { key } => write!(f, "hit {{ key: {key} }}"),
            RegistryEvent::Construct { key } => write!(f, "construct {{ key: {key} }}"),
            RegistryEvent::Publish { key, size } => {
                write!(f, "publish {{ key: {key}, size: {size} }}")
            }
            RegistryEvent::ConstructionFailed { key } => {
                write!(f, "construction failed {{ key: {key} }}")
            }
        }
    }
}
