//! Shared test utilities for the integration test suites.
//!
//! Import via `mod common;` from any test's main.rs.

#![allow(dead_code)]

pub use hotkeep::{
    mark_reloadable, persist_function, persist_object, persist_value, Error, Generation,
    HostConfig, ModuleHost, ObjectRef, Value,
};
use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Route `hotkeep::*` debug output through the test harness writer.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Hot host with the default configuration.
pub fn hot_host() -> ModuleHost {
    init_tracing();
    ModuleHost::new(HostConfig::default()).expect("default config is valid")
}

/// Host that never attaches a reload channel.
pub fn cold_host() -> ModuleHost {
    init_tracing();
    ModuleHost::new(HostConfig::cold()).expect("cold config is valid")
}

/// Object built from a JSON literal.
pub fn object(json: serde_json::Value) -> ObjectRef {
    Value::from(json)
        .as_object()
        .cloned()
        .expect("JSON literal is an object")
}

/// Function of no arguments returning a fixed string.
pub fn returning(name: &str, result: &'static str) -> ObjectRef {
    ObjectRef::function(name, 0, move |_, _| Ok(Value::from(result)))
}

/// Class whose constructor stores its first argument as `value` and whose
/// prototype carries a `describe` method returning `label`.
pub fn class(name: &str, label: &'static str) -> ObjectRef {
    let class = ObjectRef::function(name, 1, |this, args| {
        if let Some(this) = this.as_object() {
            this.set("value", args.first().cloned().unwrap_or_default());
        }
        Ok(Value::Undefined)
    });
    let prototype = class
        .get("prototype")
        .as_object()
        .cloned()
        .expect("functions own a prototype");
    prototype.set(
        "describe",
        ObjectRef::function("describe", 0, move |_, _| Ok(Value::from(label))),
    );
    class
}

/// Reload the module of `generation`, failing the test on error.
pub fn reload(host: &ModuleHost, generation: &Generation) -> Generation {
    host.reload(generation).expect("module accepted reloads")
}
