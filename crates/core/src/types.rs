//! Identifier types
//!
//! - GenerationId: Unique identifier for one loaded instance of a module

use std::fmt;
use uuid::Uuid;

/// Unique identifier for a module generation
///
/// Every load or reload of a module produces a new generation with a fresh
/// UUID v4. Persistence keys are unique per generation, and errors report
/// the generation they were raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationId(Uuid);

impl GenerationId {
    /// Create a new random GenerationId using UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GenerationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
