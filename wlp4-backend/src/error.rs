//! Code generation error types
//!
//! Every variant is an upstream contract violation: a checked tree never
//! produces them. They are fatal because continuing would emit wrong code.

use thiserror::Error;
use wlp4_common::{CompilerError, Type};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodegenError {
    #[error("Undefined procedure '{name}' called from '{caller}'")]
    UndefinedProcedure { name: String, caller: String },

    #[error("Undefined variable '{name}' in procedure '{procedure}'")]
    UndefinedVariable { name: String, procedure: String },

    #[error("Procedure '{name}' takes {expected} argument(s) but {found} were passed")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Operator '{op}' cannot be applied to {left} and {right} in procedure '{procedure}'")]
    InvalidOperands {
        op: String,
        left: Type,
        right: Type,
        procedure: String,
    },

    #[error("Procedure '{procedure}': cannot {action} during the {phase} phase")]
    PhaseViolation {
        procedure: String,
        action: &'static str,
        phase: &'static str,
    },
}

impl From<CodegenError> for CompilerError {
    fn from(err: CodegenError) -> Self {
        CompilerError::CodegenError {
            message: err.to_string(),
        }
    }
}
