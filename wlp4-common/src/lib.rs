//! WLP4 Code Generator - Common Types and Utilities
//! 
//! This crate contains shared types, error definitions, and target constants
//! used across all components of the WLP4 code generator.

pub mod error;
pub mod types;
pub mod source_loc;

pub use error::CompilerError;
pub use types::*;
pub use source_loc::SourceLocation;
