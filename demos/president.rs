//! First-call-wins singleton example for intern-registry.
//!
//! Demonstrates:
//! - One instance per type, whatever arguments later calls pass
//! - Later arguments being ignored instead of overwriting published state
//! - A process-wide guard declared with `define_singletons!`
//!
//! Run with: `RUST_LOG=intern_registry=debug cargo run --example president`

use intern_registry::{define_singletons, BoxError, Singleton, SingletonGuard};
use std::fmt;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

define_singletons!(office);

#[derive(Debug)]
struct President {
    name: String,
}

impl Singleton for President {
    type Args = &'static str;

    fn create(name: &'static str) -> Result<Self, BoxError> {
        println!("   [creating President '{name}']");
        Ok(President {
            name: name.to_string(),
        })
    }
}

impl fmt::Display for President {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "President [Name: {}, at {:p}]", self.name, self)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== intern-registry: President ===\n");

    // -------------------------------------------------------------------------
    // 1. Explicit guard
    // -------------------------------------------------------------------------
    println!("1. Asking an explicit guard twice with different names...");
    let guard = SingletonGuard::new();
    let p1 = guard.get_instance::<President>("Mr. Abraham Lincoln")?;
    let p2 = guard.get_instance::<President>("Mr. Barack Obama")?;

    println!("   First:  {p1}");
    println!("   Second: {p2}");
    println!("   Same instance? {}", Arc::ptr_eq(&p1, &p2));

    // -------------------------------------------------------------------------
    // 2. Process-wide guard
    // -------------------------------------------------------------------------
    println!("\n2. Using the process-wide `office` guard...");
    let p3: Arc<President> = office::get_instance("Mr. George Washington")?;
    let p4: Arc<President> = office::get_instance("Mr. John Adams")?;
    println!("   Office holder: {p3}");
    println!("   Still:         {p4}");
    println!(
        "   Separate from the explicit guard? {}",
        !Arc::ptr_eq(&p1, &p3)
    );

    println!("\n=== Example Complete ===");
    Ok(())
}
