//! Common types used throughout the code generator
//!
//! This module defines the WLP4 value types and the target facts that every
//! phase agrees on (word size, null representation).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size of every WLP4 value (`int` and `int*`) in bytes
pub const WORD_SIZE: i32 = 4;

/// Bit pattern of the null pointer.
///
/// Address 0 is a valid loadable address on the target, so null is 1.
/// Allocation failure is normalised to this value as well.
pub const NULL_SENTINEL: i32 = 1;

/// WLP4 value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// `int` - 32-bit signed integer
    #[serde(rename = "int")]
    Int,
    /// `int*` - word address of an `int`
    #[serde(rename = "int*")]
    IntPtr,
}

impl Type {
    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::IntPtr)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::IntPtr => write!(f, "int*"),
        }
    }
}

/// Error returned when a type annotation is neither `int` nor `int*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl fmt::Display for UnknownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type '{}'", self.0)
    }
}

impl std::error::Error for UnknownType {}

impl FromStr for Type {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "int" => Ok(Type::Int),
            "int*" => Ok(Type::IntPtr),
            other => Err(UnknownType(other.to_string())),
        }
    }
}
