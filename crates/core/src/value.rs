//! Value types for hotkeep
//!
//! This module defines:
//! - Value: Unified enum for everything a persistence slot can hold
//!
//! ## Value Model
//!
//! - Undefined, Null, Bool, Int, Float, String, Object
//!
//! ### Type Rules
//!
//! - `Undefined != Null`: a slot explicitly holding `Undefined` is still a
//!   populated slot
//! - `Int(1) != Float(1.0)`: different types are never equal
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Objects (including callables) compare by identity, not by contents

use crate::object::ObjectRef;

/// Maximum object nesting rendered by [`Value::to_json`]
pub const MAX_JSON_DEPTH: usize = 64;

/// Dynamic value stored in persistence slots and object properties
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value; distinct from `Null`
    #[default]
    Undefined,
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Shared object or callable
    Object(ObjectRef),
}

// Custom PartialEq: IEEE-754 floats, identity for objects
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Object(o) if o.is_callable() => "Function",
            Value::Object(_) => "Object",
        }
    }

    /// Check if this is the undefined value
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is an object (callable or not)
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Check if this is a callable object
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Object(o) if o.is_callable())
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the object handle if this is an Object value
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Render as JSON
    ///
    /// Only enumerable own properties are rendered. `Undefined` properties
    /// are skipped, callables and objects nested deeper than
    /// [`MAX_JSON_DEPTH`] render as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        self.to_json_at_depth(0)
    }

    fn to_json_at_depth(&self, depth: usize) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Object(o) if o.is_callable() || depth >= MAX_JSON_DEPTH => {
                serde_json::Value::Null
            }
            Value::Object(o) => {
                let mut map = serde_json::Map::new();
                for (name, descriptor) in o.own_properties() {
                    if descriptor.enumerable && !descriptor.value.is_undefined() {
                        map.insert(name, descriptor.value.to_json_at_depth(depth + 1));
                    }
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

// ============================================================================
// serde_json interop for ergonomic fixture construction
// ============================================================================

/// Builds fresh ordinary objects for JSON objects and arrays.
///
/// Arrays become objects keyed `"0"`, `"1"`, ... with a hidden `length`.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64 range falls back to float
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                let len = items.len();
                let object = ObjectRef::from_pairs(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| (i.to_string(), Value::from(item))),
                );
                object.define_property(
                    "length",
                    crate::object::PropertyDescriptor::hidden(Value::Int(len as i64)),
                );
                Value::Object(object)
            }
            serde_json::Value::Object(map) => Value::Object(ObjectRef::from_pairs(
                map.into_iter().map(|(k, v)| (k, Value::from(v))),
            )),
        }
    }
}
