//! Persistence wrappers: values, objects and functions
//!
//! All three are built on [`once`]. Each wrapper claims its own slot,
//! prefixed so that the same user key can be used for a value, an object
//! and a function in one module without colliding.
//!
//! ## Functions
//!
//! A hot module gets a dispatcher per function key. The dispatcher is the
//! persisted record: it survives every reload and forwards calls to the
//! implementation passed in by the latest generation. Its `prototype` is
//! persisted through [`persist_object`], so instances created before a
//! reload still pass `is_instance_of` against the dispatcher and the new
//! implementation afterwards.

use crate::generation::Generation;
use crate::registry::once;
use hotkeep_core::{
    reconcile, Error, ObjectRef, PropertyDescriptor, Result, Value, FUNCTION_INTRINSICS,
};
use tracing::{debug, warn};

/// Slot prefix for [`persist_object`]
pub const OBJECT_SLOT_PREFIX: &str = "--persist-object-";
/// Slot prefix for the dispatcher record of [`persist_function`]
pub const FUNCTION_SLOT_PREFIX: &str = "--persist-fn-shared-";
/// Slot prefix for the prototype object of [`persist_function`]
pub const PROTOTYPE_SLOT_PREFIX: &str = "--persist-fn-proto-";

/// Accept in-place reloads for the generation's module
///
/// No-op when the generation has no reload channel.
pub fn mark_reloadable(generation: &Generation) {
    generation.mark_reloadable();
}

/// Persist an arbitrary value under `key`
///
/// Returns the value staged by the previous generation, or runs `factory`.
pub fn persist_value<F>(generation: &Generation, factory: F, key: &str) -> Result<Value>
where
    F: FnOnce() -> Value,
{
    once(generation, factory, key)
}

/// Persist an object identity under `key`
///
/// On first use `object` itself becomes the persisted identity. On later
/// generations the persisted identity is returned after its own properties
/// are reconciled with `object`'s.
pub fn persist_object(generation: &Generation, object: &ObjectRef, key: &str) -> Result<ObjectRef> {
    let slot = format!("{OBJECT_SLOT_PREFIX}{key}");
    let shared = once(generation, || Value::Object(object.clone()), &slot)?;
    match shared {
        Value::Object(shared) if shared.ptr_eq(object) => Ok(shared),
        Value::Object(shared) => {
            debug!(
                target: "hotkeep::persist",
                module = generation.module(),
                key,
                "Transplanting object onto persisted identity"
            );
            Ok(reconcile(&shared, object, &[]))
        }
        other => {
            warn!(
                target: "hotkeep::persist",
                module = generation.module(),
                key,
                found = other.type_name(),
                "Persisted object slot does not hold an object, using the new object"
            );
            Ok(object.clone())
        }
    }
}

/// Persist a function identity under `key`
///
/// Without a reload channel `function` is returned unchanged. Otherwise the
/// returned dispatcher is the same identity for every generation of the
/// module and always forwards to the `function` passed in most recently.
///
/// # Errors
///
/// `Error::NotCallable` if `function` has no callable body,
/// `Error::DuplicateKey` if `key` was already used for a function in this
/// generation.
pub fn persist_function(
    generation: &Generation,
    function: &ObjectRef,
    key: &str,
) -> Result<ObjectRef> {
    if !function.is_callable() {
        return Err(Error::NotCallable(function.display_name()));
    }
    let hot = generation.is_hot();

    let slot = format!("{FUNCTION_SLOT_PREFIX}{key}");
    let shared = once(
        generation,
        || {
            if hot {
                Value::Object(new_dispatcher(function))
            } else {
                Value::Object(function.clone())
            }
        },
        &slot,
    )?;
    let Value::Object(dispatcher) = shared else {
        return Ok(function.clone());
    };
    if !hot {
        return Ok(dispatcher);
    }
    if !dispatcher.retarget(function.clone()) {
        warn!(
            target: "hotkeep::persist",
            module = generation.module(),
            key,
            "Persisted function slot does not hold a dispatcher, using the new function"
        );
        return Ok(function.clone());
    }

    if let Some(descriptor) = function.descriptor("prototype") {
        if let Value::Object(prototype) = descriptor.value.clone() {
            let super_proto = prototype.proto();
            let persisted = persist_object(
                generation,
                &prototype,
                &format!("{PROTOTYPE_SLOT_PREFIX}{key}"),
            )?;
            function.define_property(
                "prototype",
                PropertyDescriptor {
                    value: Value::Object(persisted.clone()),
                    ..descriptor
                },
            );
            persisted.define_property(
                "constructor",
                PropertyDescriptor::hidden(Value::Object(dispatcher.clone())),
            );
            if !same_link(&persisted.proto(), &super_proto) && !persisted.set_proto(super_proto) {
                warn!(
                    target: "hotkeep::persist",
                    key,
                    "Prototype link would be cyclic, left unchanged"
                );
            }
        }
    }

    let function_proto = function.proto();
    if !same_link(&dispatcher.proto(), &function_proto) && !dispatcher.set_proto(function_proto) {
        warn!(
            target: "hotkeep::persist",
            key,
            "Dispatcher link would be cyclic, left unchanged"
        );
    }

    Ok(reconcile(&dispatcher, function, FUNCTION_INTRINSICS))
}

/// Build the dispatcher for the first hot generation of a function
fn new_dispatcher(function: &ObjectRef) -> ObjectRef {
    let name = function
        .get_own("name")
        .and_then(|name| name.as_str().map(str::to_string))
        .unwrap_or_default();
    let dispatcher = ObjectRef::dispatcher(&name, function.arity());
    if let Some(descriptor) = function.descriptor("prototype") {
        if let Value::Object(prototype) = &descriptor.value {
            prototype.define_property(
                "constructor",
                PropertyDescriptor::hidden(Value::Object(dispatcher.clone())),
            );
        }
        dispatcher.define_property("prototype", descriptor);
    }
    dispatcher
}

fn same_link(a: &Option<ObjectRef>, b: &Option<ObjectRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.ptr_eq(b),
        (None, None) => true,
        _ => false,
    }
}
