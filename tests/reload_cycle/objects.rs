//! Object identity across reloads
//!
//! The first generation's object is kept. Later generations reshape it:
//! properties they no longer define are removed and their own values win.

use crate::common::*;
use hotkeep::PropertyDescriptor;
use serde_json::json;

#[test]
fn object_identity_is_reshaped_in_place() {
    let host = hot_host();
    let g1 = host.load("app::settings");
    let first = persist_object(&g1, &object(json!({"a": 1, "b": 2})), "settings").unwrap();

    // Somewhere else in the program holds on to the object
    let holder = ObjectRef::new();
    holder.set("settings", first.clone());

    let g2 = reload(&host, &g1);
    let second = persist_object(&g2, &object(json!({"a": 1, "c": 3})), "settings").unwrap();

    assert!(second.ptr_eq(&first));
    assert_eq!(second.own_keys(), vec!["a", "c"]);
    assert_eq!(second.get("c"), Value::Int(3));
    assert!(!second.has_own("b"));

    let held = holder.get("settings");
    assert_eq!(held.as_object().unwrap().get("c"), Value::Int(3));
}

#[test]
fn new_generation_values_win() {
    let host = hot_host();
    let g1 = host.load("app");
    let first = persist_object(&g1, &object(json!({"limit": 10})), "config").unwrap();
    first.set("limit", 99);

    let g2 = reload(&host, &g1);
    let second = persist_object(&g2, &object(json!({"limit": 20})), "config").unwrap();
    assert_eq!(second.get("limit"), Value::Int(20));
}

#[test]
fn hidden_properties_stay_hidden() {
    let host = hot_host();
    let g1 = host.load("app");
    let first = persist_object(&g1, &ObjectRef::new(), "state").unwrap();

    let g2 = reload(&host, &g1);
    let replacement = ObjectRef::new();
    replacement.define_property("secret", PropertyDescriptor::hidden(Value::Int(1)));
    replacement.set("shown", true);
    let second = persist_object(&g2, &replacement, "state").unwrap();

    assert!(second.ptr_eq(&first));
    assert_eq!(second.own_keys(), vec!["shown"]);
    assert_eq!(second.own_property_names(), vec!["secret", "shown"]);
    assert!(!second.descriptor("secret").unwrap().enumerable);
}

#[test]
fn copied_read_only_property_becomes_writable() {
    let host = hot_host();
    let g1 = host.load("app");
    persist_object(&g1, &ObjectRef::new(), "state").unwrap();

    let g2 = reload(&host, &g1);
    let replacement = ObjectRef::new();
    replacement.define_property("fixed", PropertyDescriptor::read_only(Value::Int(1)));
    let second = persist_object(&g2, &replacement, "state").unwrap();

    let descriptor = second.descriptor("fixed").unwrap();
    assert!(descriptor.writable);
    assert!(descriptor.configurable);
    assert!(second.set("fixed", 2));
}

#[test]
fn object_first_use_returns_argument() {
    let host = hot_host();
    let generation = host.load("app");
    let fresh = object(json!({"x": true}));
    let persisted = persist_object(&generation, &fresh, "fresh").unwrap();
    assert!(persisted.ptr_eq(&fresh));
}

#[test]
fn cold_host_returns_argument_every_time() {
    let host = cold_host();
    let generation = host.load("app");
    let fresh = object(json!({"x": 1}));
    assert!(persist_object(&generation, &fresh, "o").unwrap().ptr_eq(&fresh));
}
