//! Integration tests for tracing and event monitoring.
//!
//! This test demonstrates how to use the tracing callback system to monitor
//! registry operations, and that `tracing` records are emitted alongside it.

use intern_registry::{define_singletons, Registry, RegistryEvent};
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

fn collect_events<K, V>(registry: &Registry<K, V>) -> Arc<Mutex<Vec<String>>>
where
    K: intern_registry::RegistryKey,
    V: ?Sized + Send + Sync + 'static,
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    registry.set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(format!("{}", event));
    });
    events
}

#[test]
fn test_basic_tracing() {
    let registry: Registry<&str, u32> = Registry::new();
    let events = collect_events(&registry);

    registry.get_or_create("Oak", || Ok::<_, Infallible>(1)).unwrap();
    registry.get_or_create("Oak", || Ok::<_, Infallible>(2)).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 3);
    assert!(captured[0].contains("construct"));
    assert!(captured[1].contains("publish"));
    assert!(captured[2].contains("hit"));
}

#[test]
fn test_lookups_emit_nothing() {
    let registry: Registry<u8, u8> = Registry::new();
    let events = collect_events(&registry);

    let _ = registry.get(&1);
    let _ = registry.contains(&1);
    let _ = registry.size();

    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_trace_failure_event() {
    let registry: Registry<u8, u8> = Registry::new();
    let events = collect_events(&registry);

    let _ = registry.get_or_create(3, || Err::<u8, _>("no"));
    registry.get_or_create(3, || Ok::<_, Infallible>(3)).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            "construct { key: 3 }",
            "construction failed { key: 3 }",
            "construct { key: 3 }",
            "publish { key: 3, size: 1 }",
        ]
    );
}

#[test]
fn test_trace_callback_with_custom_logic() {
    let registry: Registry<u16, u16> = Registry::new();

    // Example: count operations by kind
    let counts = Arc::new(Mutex::new([0usize; 4]));
    let counts_clone = counts.clone();

    registry.set_trace_callback(move |event| {
        let slot = match event {
            RegistryEvent::Hit { .. } => 0,
            RegistryEvent::Construct { .. } => 1,
            RegistryEvent::Publish { .. } => 2,
            RegistryEvent::ConstructionFailed { .. } => 3,
        };
        counts_clone.lock().unwrap()[slot] += 1;
    });

    for key in [1u16, 2, 1, 1, 2] {
        registry.get_or_create(key, || Ok::<_, Infallible>(key)).unwrap();
    }

    assert_eq!(*counts.lock().unwrap(), [3, 2, 2, 0]);
}

#[test]
fn test_trace_callback_replacement() {
    let registry: Registry<usize, usize> = Registry::new();
    let first = collect_events(&registry);

    registry.get_or_create(100, || Ok::<_, Infallible>(100)).unwrap();

    let second = collect_events(&registry);
    registry.get_or_create(100, || Ok::<_, Infallible>(100)).unwrap();

    assert_eq!(first.lock().unwrap().len(), 2);
    assert_eq!(*second.lock().unwrap(), vec!["hit { key: 100 }"]);
}

#[test]
fn test_singleton_module_tracing() {
    define_singletons!(traced);

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    traced::set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(event.clone());
    });

    traced::get_or_init(|| Ok::<_, Infallible>(String::from("config"))).unwrap();
    traced::clear_trace_callback();
    traced::get_or_init(|| Ok::<_, Infallible>(String::from("ignored"))).unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), 2);
    assert_eq!(
        captured[0],
        RegistryEvent::Construct {
            key: "alloc::string::String".to_string()
        }
    );
}

#[test]
fn test_tracing_subscriber_sees_registry_records() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("intern_registry=trace")
        .with_test_writer()
        .try_init();

    let registry: Registry<&str, String> = Registry::new();
    let value = registry
        .get_or_create("logged", || Ok::<_, Infallible>("value".to_string()))
        .unwrap();
    let _ = registry.get_or_create("broken", || Err::<String, _>("refused"));

    assert_eq!(&*value, "value");
    assert_eq!(registry.size(), 1);
}
