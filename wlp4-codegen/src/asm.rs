//! MIPS Assembly Instruction Definitions
//!
//! This module defines the instruction subset and register model of the
//! teaching MIPS target the generator emits for.

use std::fmt;

/// MIPS register file
///
/// 32 general purpose registers. `$0` always reads as zero; every other role
/// (stack pointer, frame pointer, ...) is a software convention, see
/// [`crate::abi::CallingConvention`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reg {
    R0, R1, R2, R3, R4, R5, R6, R7,
    R8, R9, R10, R11, R12, R13, R14, R15,
    R16, R17, R18, R19, R20, R21, R22, R23,
    R24, R25, R26, R27, R28, R29, R30, R31,
}

impl Reg {
    pub const ALL: [Reg; 32] = [
        Reg::R0, Reg::R1, Reg::R2, Reg::R3, Reg::R4, Reg::R5, Reg::R6, Reg::R7,
        Reg::R8, Reg::R9, Reg::R10, Reg::R11, Reg::R12, Reg::R13, Reg::R14, Reg::R15,
        Reg::R16, Reg::R17, Reg::R18, Reg::R19, Reg::R20, Reg::R21, Reg::R22, Reg::R23,
        Reg::R24, Reg::R25, Reg::R26, Reg::R27, Reg::R28, Reg::R29, Reg::R30, Reg::R31,
    ];

    /// Register number, 0 to 31
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Reg> {
        Reg::ALL.get(index).copied()
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.index())
    }
}

/// Operand of a `.word` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordValue {
    /// Decimal literal, signed or unsigned 32-bit
    Int(i64),
    /// Hexadecimal literal (memory-mapped addresses)
    Hex(u32),
    /// Address of a label, resolved by the assembler
    Label(String),
}

impl WordValue {
    pub fn label(name: impl Into<String>) -> Self {
        WordValue::Label(name.into())
    }
}

impl fmt::Display for WordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordValue::Int(value) => write!(f, "{value}"),
            WordValue::Hex(value) => write!(f, "0x{value:x}"),
            WordValue::Label(name) => f.write_str(name),
        }
    }
}

/// MIPS assembly instructions
///
/// Only the subset the code generator uses. `lis` loads the word that
/// immediately follows it, so it is always paired with a [`AsmInst::Word`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInst {
    // Arithmetic
    Add(Reg, Reg, Reg),           // rd = rs + rt
    Sub(Reg, Reg, Reg),           // rd = rs - rt
    Mult(Reg, Reg),               // hi:lo = rs * rt
    Div(Reg, Reg),                // lo = rs / rt, hi = rs % rt
    Mfhi(Reg),                    // rd = hi
    Mflo(Reg),                    // rd = lo
    Lis(Reg),                     // rd = next word, skip it

    // Comparison
    Slt(Reg, Reg, Reg),           // rd = (rs < rt) ? 1 : 0
    Sltu(Reg, Reg, Reg),          // rd = (rs < rt) ? 1 : 0 (unsigned)

    // Memory
    Lw(Reg, i16, Reg),            // rt = MEM[rs + offset]
    Sw(Reg, i16, Reg),            // MEM[rs + offset] = rt

    // Control flow
    Beq(Reg, Reg, String),        // branch to label if rs == rt
    Bne(Reg, Reg, String),        // branch to label if rs != rt
    Jr(Reg),                      // pc = rs
    Jalr(Reg),                    // $31 = pc, pc = rs

    // Directives
    Word(WordValue),
    Import(String),

    // Pseudo
    Label(String),
    Comment(String),
}

impl AsmInst {
    /// Whether this line occupies a word of the assembled program
    pub fn is_code(&self) -> bool {
        !matches!(self, AsmInst::Label(_) | AsmInst::Comment(_) | AsmInst::Import(_))
    }

    /// Label this instruction refers to, if any
    pub fn label_reference(&self) -> Option<&str> {
        match self {
            AsmInst::Beq(_, _, label) | AsmInst::Bne(_, _, label) => Some(label),
            AsmInst::Word(WordValue::Label(label)) => Some(label),
            _ => None,
        }
    }
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::Add(rd, rs, rt) => write!(f, "add {rd}, {rs}, {rt}"),
            AsmInst::Sub(rd, rs, rt) => write!(f, "sub {rd}, {rs}, {rt}"),
            AsmInst::Mult(rs, rt) => write!(f, "mult {rs}, {rt}"),
            AsmInst::Div(rs, rt) => write!(f, "div {rs}, {rt}"),
            AsmInst::Mfhi(rd) => write!(f, "mfhi {rd}"),
            AsmInst::Mflo(rd) => write!(f, "mflo {rd}"),
            AsmInst::Lis(rd) => write!(f, "lis {rd}"),

            AsmInst::Slt(rd, rs, rt) => write!(f, "slt {rd}, {rs}, {rt}"),
            AsmInst::Sltu(rd, rs, rt) => write!(f, "sltu {rd}, {rs}, {rt}"),

            AsmInst::Lw(rt, offset, rs) => write!(f, "lw {rt}, {offset}({rs})"),
            AsmInst::Sw(rt, offset, rs) => write!(f, "sw {rt}, {offset}({rs})"),

            AsmInst::Beq(rs, rt, label) => write!(f, "beq {rs}, {rt}, {label}"),
            AsmInst::Bne(rs, rt, label) => write!(f, "bne {rs}, {rt}, {label}"),
            AsmInst::Jr(rs) => write!(f, "jr {rs}"),
            AsmInst::Jalr(rs) => write!(f, "jalr {rs}"),

            AsmInst::Word(value) => write!(f, ".word {value}"),
            AsmInst::Import(name) => write!(f, ".import {name}"),

            AsmInst::Label(label) => write!(f, "{label}:"),
            AsmInst::Comment(text) => write!(f, "; {text}"),
        }
    }
}
