//! Reference host for hotkeep
//!
//! This crate provides a concrete in-process implementation of the reload
//! channel contract:
//! - ModuleHost: loads, reloads and unloads module generations
//! - HostChannel: the per-generation reload channel it hands out
//! - HostConfig: `hotkeep.toml` configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod host;

pub use channel::HostChannel;
pub use config::{HostConfig, CONFIG_FILE_NAME};
pub use host::ModuleHost;
