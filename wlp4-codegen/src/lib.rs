//! WLP4 Code Generator - MIPS Assembly Model
//!
//! The target side of the generator:
//!
//! - Assembly instruction and register definitions
//! - ABI (register roles, stack discipline, runtime routines)
//! - Text emission with label validation
//! - A parser for the emitted dialect, used to execute generated text

pub mod abi;
pub mod asm;
pub mod emit;
pub mod error;
pub mod parse;

pub use abi::{CallingConvention, RuntimeRoutine};
pub use asm::{AsmInst, Reg, WordValue};
pub use emit::{emit_instructions, validate};
pub use error::AsmError;
pub use parse::parse_program;

/// Main entry point for rendering a generated program
pub fn generate_assembly(instructions: &[AsmInst]) -> Result<String, AsmError> {
    emit_instructions(instructions)
}
