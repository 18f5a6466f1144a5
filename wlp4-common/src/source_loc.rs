//! Input location tracking for error reporting
//!
//! The code generator reads a line-oriented tree serialization, so a location
//! is just a 1-based line number in that input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line in the serialized tree (1-based, 0 means unknown)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
}

impl SourceLocation {
    pub fn new(line: u32) -> Self {
        Self { line }
    }

    /// Create a dummy location for testing
    pub fn dummy() -> Self {
        Self::new(0)
    }

    pub fn is_known(&self) -> bool {
        self.line != 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "line {}", self.line)
        } else {
            write!(f, "<unknown>")
        }
    }
}
