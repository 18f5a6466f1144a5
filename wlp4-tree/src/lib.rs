//! WLP4 Code Generator - Annotated Tree Input
//!
//! This crate turns the type checker's serialized output into something the
//! code generator can walk:
//! - Token and rule tables: closed enums for every terminal and production
//! - Reader: parses the line-oriented tree format into [`AnnotatedNode`]s
//! - Typed AST: flattened procedures, statements and typed expressions

pub mod errors;
pub mod node;
pub mod reader;
pub mod rule;
pub mod token;
pub mod typed_ast;

pub use errors::TreeError;
pub use node::{AnnotatedNode, Production, Terminal};
pub use reader::read_tree;
pub use rule::Rule;
pub use token::TokenKind;
pub use typed_ast::{build_program, Program};

use wlp4_common::CompilerError;

/// High-level input interface
pub struct Frontend;

impl Frontend {
    /// Read the serialized annotated tree
    pub fn parse_tree(input: &str) -> Result<AnnotatedNode, CompilerError> {
        Ok(read_tree(input)?)
    }

    /// Read the serialized tree and convert it to a typed program
    pub fn load_program(input: &str) -> Result<Program, CompilerError> {
        let tree = Self::parse_tree(input)?;
        Ok(build_program(&tree)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_truncated_input_is_eof_error() {
        let err = Frontend::load_program("start BOF procedures EOF\nBOF BOF\n").unwrap_err();
        assert!(matches!(err, CompilerError::UnexpectedEof { .. }), "{err:?}");
    }

    #[test]
    fn test_frontend_unknown_rule_is_malformed_input() {
        let err = Frontend::parse_tree("statement FOR LPAREN RPAREN\n").unwrap_err();
        assert!(err.is_input_error());
        assert!(matches!(err, CompilerError::MalformedInput { .. }), "{err:?}");
    }
}
