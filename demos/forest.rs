//! Flyweight forest example for intern-registry.
//!
//! Demonstrates:
//! - Planting many trees that share a few interned tree kinds
//! - Per-tree positions kept out of the shared state
//! - Concurrent planting building each kind exactly once
//!
//! Run with: `RUST_LOG=intern_registry=debug cargo run --example forest`

use intern_registry::forest::{Forest, TreeSpecies};
use intern_registry::{Registry, RegistryConfig};
use std::thread;
use tracing_subscriber::EnvFilter;

const OAK: TreeSpecies<'static> = TreeSpecies {
    name: "Oak",
    color: "green",
    texture: "oak.png",
};

const PINE: TreeSpecies<'static> = TreeSpecies {
    name: "Pine",
    color: "dark green",
    texture: "pine.png",
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== intern-registry: Forest ===\n");

    // The registry outlives every forest that borrows it.
    let kinds = Registry::with_config(RegistryConfig::new("tree-kinds"));

    // -------------------------------------------------------------------------
    // 1. Plant five oaks
    // -------------------------------------------------------------------------
    println!("1. Planting 5 oaks...");
    let mut forest = Forest::new(&kinds);
    for (x, y) in [(10, 20), (30, 15), (55, 40), (80, 60), (12, 75)] {
        forest.plant_tree(x, y, OAK)?;
    }

    // -------------------------------------------------------------------------
    // 2. Plant three pines
    // -------------------------------------------------------------------------
    println!("2. Planting 3 pines...");
    for (x, y) in [(25, 33), (43, 88), (91, 19)] {
        forest.plant_tree(x, y, PINE)?;
    }

    println!("\n   Tree kinds created: {}", forest.kind_count());
    println!("   Trees in the forest: {}", forest.tree_count());

    // -------------------------------------------------------------------------
    // 3. Draw
    // -------------------------------------------------------------------------
    println!("\n3. Drawing the forest...");
    for line in forest.draw() {
        println!("   {line}");
    }

    // -------------------------------------------------------------------------
    // 4. Plant from several threads
    // -------------------------------------------------------------------------
    println!("\n4. Planting birches from 4 threads at once...");
    let birch = TreeSpecies {
        name: "Birch",
        color: "white",
        texture: "birch.png",
    };
    let planted: usize = thread::scope(|s| {
        let workers: Vec<_> = (0..4)
            .map(|t| {
                let kinds = &kinds;
                s.spawn(move || {
                    let mut grove = Forest::new(kinds);
                    for i in 0..25 {
                        if grove.plant_tree(t * 100 + i, i, birch).is_err() {
                            break;
                        }
                    }
                    grove.tree_count()
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap_or(0)).sum()
    });
    println!("   Birches planted: {planted}");
    println!("   Tree kinds now: {}", kinds.size());

    println!("\n=== Example Complete ===");
    Ok(())
}
