//! # Intern Registry
//!
//! Thread-safe interning of expensive shared objects.
//!
//! A [`Registry`] hands out exactly one shared object per key: the first caller
//! for a key runs its constructor, every concurrent or later caller receives the
//! same `Arc`. Lightweight [`Handle`]s pair that shared, immutable *intrinsic*
//! state with per-use *extrinsic* state. A [`SingletonGuard`] applies the same
//! machinery with one key per type and first-call-wins semantics.
//!
//! ## Quick Start
//!
//! ```rust
//! use intern_registry::forest::{Forest, TreeSpecies};
//! use intern_registry::Registry;
//!
//! let kinds = Registry::new();
//! let mut forest = Forest::new(&kinds);
//!
//! let oak = TreeSpecies { name: "Oak", color: "green", texture: "oak.png" };
//! forest.plant_tree(10, 20, oak).unwrap();
//! forest.plant_tree(5, 5, oak).unwrap();
//!
//! assert_eq!(forest.tree_count(), 2);
//! assert_eq!(forest.kind_count(), 1);
//! ```
//!
//! ## Features
//!
//! - **Exactly-once construction**: concurrent requests for one key run one constructor
//! - **Safe publication**: no caller ever sees a partially built object
//! - **Retryable failures**: a failing constructor leaves its key absent
//! - **Poison tolerant**: a panic never disables a registry
//! - **Tracing support**: `tracing` records plus an optional per-registry callback
//!
//! ## Main Types
//!
//! - [`Registry`] - keyed interning with [`Registry::get_or_create`]
//! - [`Intrinsic`] - derives a canonical key from intrinsic fields
//! - [`SharedObject`] / [`Handle`] - shared state plus per-use state
//! - [`SingletonGuard`] - one instance per type, first call wins
//! - [`define_singletons!`] - process-wide singleton modules

mod config;
mod handle;
mod key;
mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod shared;
mod singleton;

pub mod forest;

// Re-export the main public API
pub use config::RegistryConfig;
pub use handle::Handle;
pub use key::{Intrinsic, RegistryKey};
pub use registry::{Registry, TraceCallback};
pub use registry_error::{BoxError, RegistryError};
pub use registry_event::RegistryEvent;
pub use shared::SharedObject;
pub use singleton::{Singleton, SingletonGuard, TypeKey};
