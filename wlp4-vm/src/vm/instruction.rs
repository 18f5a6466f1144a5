//! Resolved program words
//!
//! Assembly is loaded at address 0, one word per code line. Labels become
//! addresses and imports become the addresses of host-implemented runtime
//! routines.

use crate::constants::{ROUTINE_BASE, WORD_BYTES};
use crate::error::VmError;
use log::debug;
use std::collections::HashMap;
use wlp4_codegen::{AsmInst, Reg, RuntimeRoutine, WordValue};

/// One word of loaded program text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    Add(Reg, Reg, Reg),
    Sub(Reg, Reg, Reg),
    Mult(Reg, Reg),
    Div(Reg, Reg),
    Mfhi(Reg),
    Mflo(Reg),
    Lis(Reg),
    Slt(Reg, Reg, Reg),
    Sltu(Reg, Reg, Reg),
    Lw(Reg, i16, Reg),
    Sw(Reg, i16, Reg),
    /// Branch targets are absolute addresses
    Beq(Reg, Reg, u32),
    Bne(Reg, Reg, u32),
    Jr(Reg),
    Jalr(Reg),
    Data(u32),
}

/// Address a runtime routine is reached at
pub fn routine_addr(routine: RuntimeRoutine) -> u32 {
    let index = RuntimeRoutine::ALL
        .iter()
        .position(|r| *r == routine)
        .unwrap_or_default() as u32;
    ROUTINE_BASE + WORD_BYTES * index
}

/// Routine reached at `addr`, if any
pub fn routine_at(addr: u32) -> Option<RuntimeRoutine> {
    RuntimeRoutine::ALL
        .iter()
        .copied()
        .find(|routine| routine_addr(*routine) == addr)
}

/// Resolve labels and imports into loadable words
pub fn assemble(program: &[AsmInst]) -> Result<Vec<Instr>, VmError> {
    let mut symbols: HashMap<&str, u32> = HashMap::new();
    let mut addr = 0u32;
    for inst in program {
        match inst {
            AsmInst::Label(name) => {
                symbols.insert(name.as_str(), addr);
            }
            AsmInst::Import(name) => {
                let routine = RuntimeRoutine::from_name(name).ok_or_else(|| VmError::UnknownImport(name.clone()))?;
                symbols.insert(name.as_str(), routine_addr(routine));
            }
            AsmInst::Comment(_) => {}
            _ => addr += WORD_BYTES,
        }
    }

    let resolve = |label: &str| {
        symbols
            .get(label)
            .copied()
            .ok_or_else(|| VmError::UndefinedLabel(label.to_string()))
    };

    let mut words = Vec::new();
    for inst in program {
        let word = match inst {
            AsmInst::Add(d, s, t) => Instr::Add(*d, *s, *t),
            AsmInst::Sub(d, s, t) => Instr::Sub(*d, *s, *t),
            AsmInst::Mult(s, t) => Instr::Mult(*s, *t),
            AsmInst::Div(s, t) => Instr::Div(*s, *t),
            AsmInst::Mfhi(d) => Instr::Mfhi(*d),
            AsmInst::Mflo(d) => Instr::Mflo(*d),
            AsmInst::Lis(d) => Instr::Lis(*d),
            AsmInst::Slt(d, s, t) => Instr::Slt(*d, *s, *t),
            AsmInst::Sltu(d, s, t) => Instr::Sltu(*d, *s, *t),
            AsmInst::Lw(t, offset, s) => Instr::Lw(*t, *offset, *s),
            AsmInst::Sw(t, offset, s) => Instr::Sw(*t, *offset, *s),
            AsmInst::Beq(s, t, label) => Instr::Beq(*s, *t, resolve(label)?),
            AsmInst::Bne(s, t, label) => Instr::Bne(*s, *t, resolve(label)?),
            AsmInst::Jr(s) => Instr::Jr(*s),
            AsmInst::Jalr(s) => Instr::Jalr(*s),
            AsmInst::Word(WordValue::Int(value)) => Instr::Data(*value as u32),
            AsmInst::Word(WordValue::Hex(value)) => Instr::Data(*value),
            AsmInst::Word(WordValue::Label(label)) => Instr::Data(resolve(label)?),
            AsmInst::Label(_) | AsmInst::Import(_) | AsmInst::Comment(_) => continue,
        };
        words.push(word);
    }

    debug!("Assembled {} words, {} symbols", words.len(), symbols.len());
    Ok(words)
}
