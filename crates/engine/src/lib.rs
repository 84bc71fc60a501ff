//! Persistence engine for hotkeep
//!
//! This crate implements the reload-continuity mechanism:
//! - Generation: explicit per-load context owning the claimed-key table
//! - ReloadChannel: host-provided hooks for staging data across generations
//! - once: at-most-once value resolution per (generation, key)
//! - persist_value / persist_object / persist_function: the public wrappers
//!
//! The engine never drives reloads itself. A host loader creates
//! generations, runs their disposal hooks and hands the staged data to the
//! next generation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod generation;
pub mod persist;
pub mod registry;

#[cfg(test)]
mod testing;

pub use channel::{DisposeHook, HandoffData, ReloadChannel};
pub use generation::{Generation, WeakGeneration, HANDOFF_NAMESPACE};
pub use persist::{
    mark_reloadable, persist_function, persist_object, persist_value, FUNCTION_SLOT_PREFIX,
    OBJECT_SLOT_PREFIX, PROTOTYPE_SLOT_PREFIX,
};
pub use registry::{once, ClaimTable};
