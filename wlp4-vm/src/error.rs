//! Interpreter faults

use thiserror::Error;
use wlp4_codegen::AsmError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("invalid assembly: {0}")]
    Assembly(#[from] AsmError),

    #[error("undefined label '{0}'")]
    UndefinedLabel(String),

    #[error("unknown import '{0}'")]
    UnknownImport(String),

    #[error("program and data ({words} words) do not fit in memory")]
    ProgramTooLarge { words: usize },

    #[error("memory access at 0x{addr:08x} is out of range (pc 0x{pc:08x})")]
    BadAddress { addr: u32, pc: u32 },

    #[error("unaligned memory access at 0x{addr:08x} (pc 0x{pc:08x})")]
    Misaligned { addr: u32, pc: u32 },

    #[error("store into program text at 0x{addr:08x} (pc 0x{pc:08x})")]
    CodeWrite { addr: u32, pc: u32 },

    #[error("jump to 0x{addr:08x}, which is not an instruction")]
    BadJump { addr: u32 },

    #[error("data word executed at 0x{addr:08x}")]
    DataExecuted { addr: u32 },

    #[error("lis at 0x{pc:08x} is not followed by a data word")]
    BadLis { pc: u32 },

    #[error("division by zero at 0x{pc:08x}")]
    DivideByZero { pc: u32 },

    #[error("delete of 0x{addr:08x}, which is not an allocated block")]
    BadFree { addr: u32 },

    #[error("step limit of {limit} exceeded")]
    StepLimit { limit: u64 },

    #[error("VM is not running")]
    NotRunning,
}
