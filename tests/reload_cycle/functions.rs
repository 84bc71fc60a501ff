//! Function identity across reloads
//!
//! Callers keep the dispatcher returned by the first generation. Every call
//! through it runs the latest implementation, and instances built before a
//! reload still belong to the class afterwards.

use crate::common::*;

#[test]
fn dispatcher_runs_latest_implementation() {
    let host = hot_host();
    let g1 = host.load("app::handlers");
    let handler = persist_function(&g1, &returning("handle", "v1"), "handle").unwrap();
    assert_eq!(handler.call(&Value::Undefined, &[]).unwrap(), Value::from("v1"));

    // Registered elsewhere before the reload, e.g. as a callback
    let registry = ObjectRef::new();
    registry.set("on_event", handler.clone());

    let g2 = reload(&host, &g1);
    let again = persist_function(&g2, &returning("handle", "v2"), "handle").unwrap();
    assert!(again.ptr_eq(&handler));
    assert_eq!(
        registry.call_method("on_event", &[]).unwrap(),
        Value::from("v2")
    );
}

#[test]
fn dispatcher_keeps_name_and_arity() {
    let host = hot_host();
    let generation = host.load("app");
    let add = ObjectRef::function("add", 2, |_, args| {
        let sum = args.iter().filter_map(Value::as_int).sum::<i64>();
        Ok(Value::Int(sum))
    });
    let dispatcher = persist_function(&generation, &add, "add").unwrap();

    assert!(dispatcher.is_dispatcher());
    assert_eq!(dispatcher.arity(), 2);
    assert_eq!(dispatcher.get("name"), Value::from("add"));
    assert_eq!(
        dispatcher
            .call(&Value::Undefined, &[Value::Int(2), Value::Int(3)])
            .unwrap(),
        Value::Int(5)
    );
}

#[test]
fn instances_survive_class_reload() {
    let host = hot_host();
    let g1 = host.load("app::model");
    let widget = persist_function(&g1, &class("Widget", "old"), "Widget").unwrap();
    let instance = widget.construct(&[Value::Int(1)]).unwrap();
    assert_eq!(instance.get("value"), Value::Int(1));
    assert_eq!(instance.call_method("describe", &[]).unwrap(), Value::from("old"));

    let g2 = reload(&host, &g1);
    let reloaded_class = class("Widget", "new");
    let dispatcher = persist_function(&g2, &reloaded_class, "Widget").unwrap();

    assert!(dispatcher.ptr_eq(&widget));
    assert!(instance.is_instance_of(&dispatcher));
    assert!(instance.is_instance_of(&reloaded_class));
    assert_eq!(instance.call_method("describe", &[]).unwrap(), Value::from("new"));

    let created_after = dispatcher.construct(&[Value::Int(2)]).unwrap();
    assert!(created_after.is_instance_of(&widget));
    assert!(created_after.proto().unwrap().ptr_eq(&instance.proto().unwrap()));
}

#[test]
fn removed_methods_disappear_from_old_instances() {
    let host = hot_host();
    let g1 = host.load("app");
    let first = class("Shape", "shape");
    let prototype = first.get("prototype").as_object().cloned().unwrap();
    prototype.set("area", returning("area", "42"));
    let shape = persist_function(&g1, &first, "Shape").unwrap();
    let instance = shape.construct(&[]).unwrap();
    assert!(instance.call_method("area", &[]).is_ok());

    let g2 = reload(&host, &g1);
    persist_function(&g2, &class("Shape", "shape"), "Shape").unwrap();
    assert!(matches!(
        instance.call_method("area", &[]),
        Err(Error::NotCallable(_))
    ));
}

#[test]
fn static_properties_follow_new_generation() {
    let host = hot_host();
    let g1 = host.load("app");
    let v1 = returning("build", "v1");
    v1.set("VERSION", 1);
    v1.set("LEGACY", true);
    let build = persist_function(&g1, &v1, "build").unwrap();
    assert_eq!(build.get("VERSION"), Value::Int(1));

    let g2 = reload(&host, &g1);
    let v2 = returning("build", "v2");
    v2.set("VERSION", 2);
    persist_function(&g2, &v2, "build").unwrap();

    assert_eq!(build.get("VERSION"), Value::Int(2));
    assert!(!build.has_own("LEGACY"));
    assert_eq!(build.get("name"), Value::from("build"));
}

#[test]
fn non_callable_is_rejected() {
    let host = hot_host();
    let generation = host.load("app");
    let err = persist_function(&generation, &ObjectRef::new(), "f").unwrap_err();
    assert!(matches!(err, Error::NotCallable(_)));
}

#[test]
fn duplicate_function_key_fails() {
    let host = hot_host();
    let generation = host.load("app");
    persist_function(&generation, &returning("f", "a"), "f").unwrap();
    let err = persist_function(&generation, &returning("f", "b"), "f").unwrap_err();
    assert!(err.is_duplicate_key());
}

#[test]
fn cold_host_returns_function_unchanged() {
    let host = cold_host();
    let generation = host.load("app");
    let function = returning("f", "plain");
    let persisted = persist_function(&generation, &function, "f").unwrap();
    assert!(persisted.ptr_eq(&function));
    assert!(!persisted.is_dispatcher());
}
