//! Error types for hotkeep
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Only [`Error::DuplicateKey`] is produced by the persistence operations
//! themselves. It signals caller misuse and is never caught or retried
//! internally.

use crate::types::GenerationId;
use std::io;
use thiserror::Error;

/// Result type alias for hotkeep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for hotkeep
#[derive(Debug, Error)]
pub enum Error {
    /// A persistence key was claimed twice within one module generation
    #[error("persistence key {key:?} used more than once in generation {generation}")]
    DuplicateKey {
        /// The key, including any internal slot prefix
        key: String,
        /// Generation in which the key was claimed twice
        generation: GenerationId,
    },

    /// Attempted to call or construct a value that has no callable body
    #[error("value is not callable: {0}")]
    NotCallable(String),

    /// A dispatcher was invoked before any implementation was bound to it
    #[error("dispatcher '{0}' has no current implementation")]
    UnboundDispatcher(String),

    /// The host was asked to reload a module that cannot be reloaded
    #[error("module '{0}' is not reloadable")]
    NotReloadable(String),

    /// The host was handed a generation that is no longer the live one
    #[error("generation {0} is not the live generation of its module")]
    StaleGeneration(GenerationId),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (config file access)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns true for the duplicate-key programming error
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Error::DuplicateKey { .. })
    }
}
