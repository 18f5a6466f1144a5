//! WLP4 Code Generator - Backend
//!
//! This crate lowers a checked WLP4 program to MIPS assembly:
//! frame layout first, then prologue, body and epilogue of every procedure
//! against the finished layout table.

pub mod body;
pub mod error;
pub mod expr;
pub mod function;
pub mod layout;
pub mod lower;
pub mod naming;
pub mod stmt;

#[cfg(test)]
mod tests;

pub use error::CodegenError;
pub use layout::{EntryArgument, ProcedureFrame, ProcedureTable, Symbol};
pub use lower::lower_program;
pub use naming::LabelAllocator;

use wlp4_common::CompilerError;
use wlp4_tree::{Frontend, Program};

/// Options for lowering
#[derive(Debug, Clone)]
pub struct LoweringOptions {
    /// Annotate procedures, prologues, epilogues and runtime calls
    pub emit_comments: bool,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self { emit_comments: true }
    }
}

/// Lower a program and render it as assembly text
pub fn generate_assembly(program: &Program, options: &LoweringOptions) -> Result<String, CompilerError> {
    let instructions = lower_program(program, options)?;
    Ok(wlp4_codegen::generate_assembly(&instructions)?)
}

/// Translate a serialized annotated tree to assembly text
pub fn compile_tree(input: &str, options: &LoweringOptions) -> Result<String, CompilerError> {
    let program = Frontend::load_program(input)?;
    generate_assembly(&program, options)
}
