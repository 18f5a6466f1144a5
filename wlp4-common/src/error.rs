//! Error handling for the WLP4 code generator
//!
//! Every error is fatal: the generator is a one-shot batch translator and
//! there is no recovery path. Each phase has its own error enum which converts
//! into [`CompilerError`] at the crate boundary.

use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of translation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Malformed input at {location}: {message}")]
    MalformedInput {
        location: SourceLocation,
        message: String,
    },

    #[error("Unexpected end of input at {location}: tree is incomplete")]
    UnexpectedEof {
        location: SourceLocation,
    },

    #[error("Code generation error: {message}")]
    CodegenError {
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create a malformed-input error
    pub fn malformed(message: impl Into<String>, location: SourceLocation) -> Self {
        CompilerError::MalformedInput { location, message: message.into() }
    }

    /// Create a codegen error
    pub fn codegen_error(message: impl Into<String>) -> Self {
        CompilerError::CodegenError { message: message.into() }
    }

    /// Whether this error means the input tree itself was bad
    pub fn is_input_error(&self) -> bool {
        matches!(self, CompilerError::MalformedInput { .. } | CompilerError::UnexpectedEof { .. })
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}
