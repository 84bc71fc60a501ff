//! Object model for persisted identities
//!
//! This module defines:
//! - ObjectRef: shared handle to a dynamic object
//! - PropertyDescriptor: an own property with its attribute flags
//! - NativeFn: the body of a callable object
//!
//! ## Identity
//!
//! An `ObjectRef` is a reference-counted handle. Cloning it clones the
//! handle, not the object; two handles are the same identity iff
//! [`ObjectRef::ptr_eq`] holds. Persistence across reloads works by keeping
//! one identity alive and rewriting its contents in place.
//!
//! ## Kinds
//!
//! - **Ordinary**: properties and an inherited-from link only
//! - **Native**: additionally carries a `NativeFn` body
//! - **Dispatcher**: carries a rewritable reference to another callable and
//!   forwards every call to it
//!
//! Callables created with [`ObjectRef::function`] own a `prototype` object
//! whose `constructor` points back at the callable. That back-link is a
//! reference cycle; a function lineage therefore lives until process exit.

use crate::error::{Error, Result};
use crate::value::Value;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Body of a callable object: `(receiver, arguments) -> result`
pub type NativeFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync>;

/// An own property: value plus attribute flags
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Current value
    pub value: Value,
    /// Whether the property shows up in [`ObjectRef::own_keys`]
    pub enumerable: bool,
    /// Whether [`ObjectRef::set`] may replace the value
    pub writable: bool,
    /// Whether [`ObjectRef::delete`] may remove the property
    pub configurable: bool,
}

impl PropertyDescriptor {
    /// Plain data property: enumerable, writable, configurable
    pub fn data(value: Value) -> Self {
        Self {
            value,
            enumerable: true,
            writable: true,
            configurable: true,
        }
    }

    /// Non-enumerable but otherwise mutable (e.g. `constructor`)
    pub fn hidden(value: Value) -> Self {
        Self {
            value,
            enumerable: false,
            writable: true,
            configurable: true,
        }
    }

    /// Non-enumerable, non-writable (e.g. `length`, `name`)
    pub fn read_only(value: Value) -> Self {
        Self {
            value,
            enumerable: false,
            writable: false,
            configurable: true,
        }
    }
}

type PropertyList = SmallVec<[(String, PropertyDescriptor); 8]>;

#[derive(Default)]
struct ObjectState {
    /// Own properties in definition order
    properties: PropertyList,
    /// Inherited-from link
    proto: Option<ObjectRef>,
}

impl ObjectState {
    fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|(n, _)| n == name)
    }

    fn find(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, descriptor)| descriptor)
    }
}

enum ObjectKind {
    Ordinary,
    Native(NativeFn),
    Dispatcher(RwLock<Option<ObjectRef>>),
}

struct ObjectCell {
    kind: ObjectKind,
    state: RwLock<ObjectState>,
}

/// Shared handle to a dynamic object
///
/// Locks are only held for the duration of a single property operation and
/// never across a call into a callable body, so bodies may freely read and
/// write the objects they are handed.
#[derive(Clone)]
pub struct ObjectRef(Arc<ObjectCell>);

impl ObjectRef {
    fn with_kind(kind: ObjectKind, proto: Option<ObjectRef>) -> Self {
        Self(Arc::new(ObjectCell {
            kind,
            state: RwLock::new(ObjectState {
                properties: PropertyList::new(),
                proto,
            }),
        }))
    }

    /// Create an empty ordinary object with no inherited-from link
    pub fn new() -> Self {
        Self::with_kind(ObjectKind::Ordinary, None)
    }

    /// Create an empty ordinary object inheriting from `proto`
    pub fn with_proto(proto: Option<ObjectRef>) -> Self {
        Self::with_kind(ObjectKind::Ordinary, proto)
    }

    /// Create an ordinary object with the given data properties
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let object = Self::new();
        for (name, value) in pairs {
            object.define_property(name, PropertyDescriptor::data(value.into()));
        }
        object
    }

    /// Create a callable object
    ///
    /// The result owns read-only `length` and `name` properties and a
    /// `prototype` object whose hidden `constructor` points back at it.
    pub fn function<F>(name: &str, arity: usize, body: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let function = Self::with_kind(ObjectKind::Native(Arc::new(body)), None);
        function.define_intrinsics(name, arity);

        let prototype = ObjectRef::new();
        prototype.define_property(
            "constructor",
            PropertyDescriptor::hidden(Value::Object(function.clone())),
        );
        function.define_property(
            "prototype",
            PropertyDescriptor {
                value: Value::Object(prototype),
                enumerable: false,
                writable: true,
                configurable: false,
            },
        );
        function
    }

    /// Create an unbound dispatcher
    ///
    /// A dispatcher's own body never changes: it forwards the receiver and
    /// arguments of every call to whatever implementation was last passed
    /// to [`ObjectRef::retarget`].
    pub fn dispatcher(name: &str, arity: usize) -> Self {
        let dispatcher = Self::with_kind(ObjectKind::Dispatcher(RwLock::new(None)), None);
        dispatcher.define_intrinsics(name, arity);
        dispatcher
    }

    fn define_intrinsics(&self, name: &str, arity: usize) {
        self.define_property(
            "length",
            PropertyDescriptor::read_only(Value::Int(arity as i64)),
        );
        self.define_property("name", PropertyDescriptor::read_only(Value::from(name)));
    }

    /// Whether both handles refer to the same object
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this object has a callable body
    pub fn is_callable(&self) -> bool {
        !matches!(self.0.kind, ObjectKind::Ordinary)
    }

    /// Whether this object is a dispatcher
    pub fn is_dispatcher(&self) -> bool {
        matches!(self.0.kind, ObjectKind::Dispatcher(_))
    }

    /// Declared arity, read from the own `length` property
    pub fn arity(&self) -> usize {
        self.get_own("length")
            .and_then(|length| length.as_int())
            .map(|n| n.max(0) as usize)
            .unwrap_or(0)
    }

    /// Display name, read from the own `name` property
    pub fn display_name(&self) -> String {
        match self.get_own("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ if self.is_callable() => "anonymous".to_string(),
            _ => "Object".to_string(),
        }
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Look up `name` on this object, then along the inherited-from chain
    ///
    /// Returns `Value::Undefined` when no object in the chain owns `name`.
    pub fn get(&self, name: &str) -> Value {
        let mut cursor = Some(self.clone());
        while let Some(object) = cursor {
            let next = {
                let state = object.0.state.read();
                if let Some(descriptor) = state.find(name) {
                    return descriptor.value.clone();
                }
                state.proto.clone()
            };
            cursor = next;
        }
        Value::Undefined
    }

    /// Value of an own property, if present
    ///
    /// Presence is distinct from value: a property holding
    /// `Value::Undefined` returns `Some(Value::Undefined)`.
    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.0
            .state
            .read()
            .find(name)
            .map(|descriptor| descriptor.value.clone())
    }

    /// Descriptor of an own property, if present
    pub fn descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.0.state.read().find(name).cloned()
    }

    /// Whether `name` is an own property
    pub fn has_own(&self, name: &str) -> bool {
        self.0.state.read().position(name).is_some()
    }

    /// All own property names, enumerable or not, in definition order
    pub fn own_property_names(&self) -> Vec<String> {
        self.0
            .state
            .read()
            .properties
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Enumerable own property names, in definition order
    pub fn own_keys(&self) -> Vec<String> {
        self.0
            .state
            .read()
            .properties
            .iter()
            .filter(|(_, descriptor)| descriptor.enumerable)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Snapshot of every own property with its descriptor
    pub fn own_properties(&self) -> Vec<(String, PropertyDescriptor)> {
        self.0.state.read().properties.iter().cloned().collect()
    }

    /// Number of own properties
    pub fn len(&self) -> usize {
        self.0.state.read().properties.len()
    }

    /// Whether the object has no own properties
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assign an own property
    ///
    /// Creates a plain data property when `name` is absent. Returns false,
    /// leaving the object unchanged, when the existing property is not
    /// writable.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> bool {
        let mut state = self.0.state.write();
        match state.position(name) {
            Some(index) => {
                let descriptor = &mut state.properties[index].1;
                if !descriptor.writable {
                    return false;
                }
                descriptor.value = value.into();
                true
            }
            None => {
                state
                    .properties
                    .push((name.to_string(), PropertyDescriptor::data(value.into())));
                true
            }
        }
    }

    /// Remove an own property
    ///
    /// Returns true when the property is gone afterwards, false when it
    /// exists but is not configurable.
    pub fn delete(&self, name: &str) -> bool {
        let mut state = self.0.state.write();
        match state.position(name) {
            None => true,
            Some(index) if state.properties[index].1.configurable => {
                state.properties.remove(index);
                true
            }
            Some(_) => false,
        }
    }

    /// Define or redefine an own property, regardless of its current flags
    ///
    /// A redefined property keeps its position in definition order.
    pub fn define_property(&self, name: impl Into<String>, descriptor: PropertyDescriptor) {
        let name = name.into();
        let mut state = self.0.state.write();
        match state.position(&name) {
            Some(index) => state.properties[index].1 = descriptor,
            None => state.properties.push((name, descriptor)),
        }
    }

    /// Remove an own property regardless of its flags
    pub(crate) fn remove_property(&self, name: &str) -> Option<PropertyDescriptor> {
        let mut state = self.0.state.write();
        let index = state.position(name)?;
        Some(state.properties.remove(index).1)
    }

    // ========================================================================
    // Inheritance
    // ========================================================================

    /// Inherited-from link
    pub fn proto(&self) -> Option<ObjectRef> {
        self.0.state.read().proto.clone()
    }

    /// Replace the inherited-from link
    ///
    /// Returns false, leaving the link unchanged, when the new link would
    /// make the chain cyclic.
    pub fn set_proto(&self, proto: Option<ObjectRef>) -> bool {
        let mut cursor = proto.clone();
        while let Some(object) = cursor {
            if object.ptr_eq(self) {
                return false;
            }
            cursor = object.proto();
        }
        self.0.state.write().proto = proto;
        true
    }

    /// Whether `constructor.prototype` appears in this object's chain
    pub fn is_instance_of(&self, constructor: &ObjectRef) -> bool {
        let Value::Object(prototype) = constructor.get("prototype") else {
            return false;
        };
        let mut cursor = self.proto();
        while let Some(object) = cursor {
            if object.ptr_eq(&prototype) {
                return true;
            }
            cursor = object.proto();
        }
        false
    }

    // ========================================================================
    // Invocation
    // ========================================================================

    /// Call this object with the given receiver and arguments
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value> {
        match &self.0.kind {
            ObjectKind::Ordinary => Err(Error::NotCallable(self.display_name())),
            ObjectKind::Native(body) => (**body)(this, args),
            ObjectKind::Dispatcher(target) => {
                let current = target.read().clone();
                match current {
                    Some(implementation) => implementation.call(this, args),
                    None => Err(Error::UnboundDispatcher(self.display_name())),
                }
            }
        }
    }

    /// Create an instance inheriting from this callable's `prototype`
    ///
    /// The body runs with the new instance as receiver. If it returns an
    /// object, that object is the result; otherwise the instance is.
    pub fn construct(&self, args: &[Value]) -> Result<ObjectRef> {
        if !self.is_callable() {
            return Err(Error::NotCallable(self.display_name()));
        }
        let proto = self.get("prototype").as_object().cloned();
        let instance = ObjectRef::with_proto(proto);
        match self.call(&Value::Object(instance.clone()), args)? {
            Value::Object(result) => Ok(result),
            _ => Ok(instance),
        }
    }

    /// Look up `name` along the chain and call it with this object as receiver
    pub fn call_method(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.get(name) {
            Value::Object(method) => method.call(&Value::Object(self.clone()), args),
            _ => Err(Error::NotCallable(name.to_string())),
        }
    }

    /// Point a dispatcher at a new implementation
    ///
    /// Returns false when this object is not a dispatcher or when
    /// `implementation` is this dispatcher itself.
    pub fn retarget(&self, implementation: ObjectRef) -> bool {
        match &self.0.kind {
            ObjectKind::Dispatcher(target) if !implementation.ptr_eq(self) => {
                *target.write() = Some(implementation);
                true
            }
            _ => false,
        }
    }

    /// Current implementation of a dispatcher
    pub fn target(&self) -> Option<ObjectRef> {
        match &self.0.kind {
            ObjectKind::Dispatcher(target) => target.read().clone(),
            _ => None,
        }
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.0.kind {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Native(_) => "Function",
            ObjectKind::Dispatcher(_) => "Dispatcher",
        };
        f.debug_struct(kind)
            .field("ptr", &Arc::as_ptr(&self.0))
            .field("properties", &self.own_property_names())
            .finish()
    }
}
