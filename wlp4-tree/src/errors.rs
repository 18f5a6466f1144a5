//! Tree reading and conversion errors

use thiserror::Error;
use wlp4_common::{CompilerError, SourceLocation};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    #[error("empty input: no tree to read")]
    EmptyInput,

    #[error("unknown symbol '{symbol}' at {location}")]
    UnknownSymbol {
        symbol: String,
        location: SourceLocation,
    },

    #[error("unknown production '{text}' at {location}")]
    UnknownRule {
        text: String,
        location: SourceLocation,
    },

    #[error("terminal {kind} has no lexeme at {location}")]
    MissingLexeme {
        kind: String,
        location: SourceLocation,
    },

    #[error("bad type annotation '{text}' at {location}")]
    BadType {
        text: String,
        location: SourceLocation,
    },

    #[error("expected {expected} but found {found} at {location}")]
    UnexpectedSymbol {
        expected: String,
        found: String,
        location: SourceLocation,
    },

    #[error("tree is incomplete at {location}")]
    UnexpectedEof {
        location: SourceLocation,
    },

    #[error("input continues after the tree is complete at {location}")]
    TrailingInput {
        location: SourceLocation,
    },

    #[error("'{rule}' has no type annotation at {location}")]
    MissingType {
        rule: String,
        location: SourceLocation,
    },

    #[error("expected {expected} at {location}")]
    UnexpectedShape {
        expected: String,
        location: SourceLocation,
    },

    #[error("invalid number literal '{lexeme}' at {location}")]
    InvalidNumber {
        lexeme: String,
        location: SourceLocation,
    },
}

impl From<TreeError> for CompilerError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::UnexpectedEof { location } => CompilerError::UnexpectedEof { location },
            TreeError::EmptyInput => CompilerError::UnexpectedEof {
                location: SourceLocation::new(1),
            },
            other => {
                let location = match &other {
                    TreeError::UnknownSymbol { location, .. }
                    | TreeError::UnknownRule { location, .. }
                    | TreeError::MissingLexeme { location, .. }
                    | TreeError::BadType { location, .. }
                    | TreeError::UnexpectedSymbol { location, .. }
                    | TreeError::TrailingInput { location }
                    | TreeError::MissingType { location, .. }
                    | TreeError::UnexpectedShape { location, .. }
                    | TreeError::InvalidNumber { location, .. } => *location,
                    TreeError::EmptyInput | TreeError::UnexpectedEof { .. } => SourceLocation::dummy(),
                };
                CompilerError::MalformedInput {
                    location,
                    message: other.to_string(),
                }
            }
        }
    }
}
