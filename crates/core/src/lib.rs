//! Core types for hotkeep
//!
//! This crate defines the foundational types used throughout the system:
//! - GenerationId: Unique identifier for one loaded instance of a module
//! - Value: Unified value enum for everything a persistence slot can hold
//! - ObjectRef: Shared dynamic object, optionally callable or a dispatcher
//! - reconcile: Property transplant between two object identities
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod object;
pub mod transplant;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use object::{NativeFn, ObjectRef, PropertyDescriptor};
pub use transplant::{reconcile, FUNCTION_INTRINSICS};
pub use types::GenerationId;
pub use value::Value;
