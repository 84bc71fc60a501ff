//! Reload cycle tests
//!
//! Drives modules through load and reload with `ModuleHost` and checks
//! what each generation observes.

#[path = "../common/mod.rs"]
mod common;

mod config;
mod functions;
mod objects;
