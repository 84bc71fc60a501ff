//! Property transplant
//!
//! Makes a persisted identity structurally identical to a freshly built
//! replacement while keeping the persisted identity itself:
//!
//! 1. every own property of `target` missing from `source` is removed
//! 2. every own property of `source` is (re)defined on `target` with the
//!    source value and enumerability
//!
//! Removals run before additions. Transplanted properties are always left
//! writable and configurable on `target`, whatever their flags on `source`,
//! so the next reload can rewrite them again.

use crate::object::{ObjectRef, PropertyDescriptor};

/// Callable intrinsics that are never transplanted between callables
pub const FUNCTION_INTRINSICS: &[&str] = &["length", "name", "arguments", "caller", "prototype"];

/// Reconcile `target`'s own properties with `source`'s
///
/// Names listed in `excluded` are left untouched on `target`. Returns
/// `target`. Reconciling an object with itself is a no-op.
pub fn reconcile(target: &ObjectRef, source: &ObjectRef, excluded: &[&str]) -> ObjectRef {
    if target.ptr_eq(source) {
        return target.clone();
    }
    let is_excluded = |name: &str| excluded.iter().any(|excluded| *excluded == name);

    for name in target.own_property_names() {
        if !is_excluded(name.as_str()) && !source.has_own(&name) {
            target.remove_property(&name);
        }
    }

    for (name, descriptor) in source.own_properties() {
        if is_excluded(name.as_str()) {
            continue;
        }
        target.define_property(
            name,
            PropertyDescriptor {
                value: descriptor.value,
                enumerable: descriptor.enumerable,
                writable: true,
                configurable: true,
            },
        );
    }

    target.clone()
}
