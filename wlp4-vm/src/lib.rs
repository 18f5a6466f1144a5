//! WLP4 MIPS Virtual Machine
//!
//! Loads the assembly text produced by the WLP4 code generator and runs it
//! under the standard `wain` conventions. Runtime routines are implemented by
//! the host, so generated programs run without a separate runtime library.

pub mod constants;
pub mod error;
pub mod vm;

pub use error::VmError;
pub use vm::{run_array, run_two_ints, Heap, Instr, RunOutcome, RuntimeStats, VMState, VmConfig, VM};
