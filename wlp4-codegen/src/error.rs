//! Assembly validation and parsing errors

use thiserror::Error;
use wlp4_common::CompilerError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("label '{0}' is defined more than once")]
    DuplicateLabel(String),

    #[error("label '{0}' is used but never defined or imported")]
    UndefinedLabel(String),

    #[error("lis at instruction {0} is not followed by a .word")]
    DanglingLis(usize),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl AsmError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        AsmError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl From<AsmError> for CompilerError {
    fn from(err: AsmError) -> Self {
        CompilerError::InternalError {
            message: format!("invalid assembly: {err}"),
        }
    }
}
