//! MIPS runtime ABI
//!
//! Register roles, the stack discipline and the runtime entry points the
//! generated code relies on. The stack grows downward one word at a time and
//! `$30` always points just past the last pushed word.

use crate::asm::{AsmInst, Reg, WordValue};
use std::fmt;

/// Register usage of generated code
///
/// - `$0`: always zero
/// - `$1`, `$2`: entry procedure arguments; `$1` also carries the argument of
///   runtime routine calls
/// - `$3`: expression result and return value
/// - `$4`: the constant 4, loaded once by the entry procedure
/// - `$5`: scratch (saved left operands, addresses of call targets)
/// - `$6`: comparison result
/// - `$29`: frame pointer
/// - `$30`: stack pointer
/// - `$31`: return address
pub struct CallingConvention;

impl CallingConvention {
    pub const ZERO: Reg = Reg::R0;
    pub const ENTRY_ARGS: [Reg; 2] = [Reg::R1, Reg::R2];
    pub const RUNTIME_ARG: Reg = Reg::R1;
    pub const RESULT: Reg = Reg::R3;
    pub const FOUR: Reg = Reg::R4;
    pub const SCRATCH: Reg = Reg::R5;
    pub const COMPARE: Reg = Reg::R6;
    pub const FRAME_PTR: Reg = Reg::R29;
    pub const STACK_PTR: Reg = Reg::R30;
    pub const RETURN_ADDR: Reg = Reg::R31;

    /// Bytes per stack slot
    pub const WORD_BYTES: i32 = 4;

    /// Load address for one input byte (`getchar`)
    pub const INPUT_ADDR: u32 = 0xffff_0004;

    /// Store address for one output byte (`putchar`)
    pub const OUTPUT_ADDR: u32 = 0xffff_000c;
}

/// Externally linked runtime routines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuntimeRoutine {
    /// Print `$1` as a signed decimal followed by a newline
    Print,
    /// Allocate `$1` words; result in `$3`, 0 on failure
    New,
    /// Release the block at `$1`
    Delete,
    /// Heap setup for array-mode entry. Known but never called.
    Init,
}

impl RuntimeRoutine {
    pub const ALL: [RuntimeRoutine; 4] = [
        RuntimeRoutine::Print,
        RuntimeRoutine::New,
        RuntimeRoutine::Delete,
        RuntimeRoutine::Init,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RuntimeRoutine::Print => "print",
            RuntimeRoutine::New => "new",
            RuntimeRoutine::Delete => "delete",
            RuntimeRoutine::Init => "init",
        }
    }

    pub fn from_name(name: &str) -> Option<RuntimeRoutine> {
        RuntimeRoutine::ALL.iter().copied().find(|routine| routine.name() == name)
    }
}

impl fmt::Display for RuntimeRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `lis reg; .word value`
pub fn load_word(reg: Reg, value: WordValue) -> [AsmInst; 2] {
    [AsmInst::Lis(reg), AsmInst::Word(value)]
}

/// Load a decimal constant
pub fn load_constant(reg: Reg, value: i64) -> [AsmInst; 2] {
    load_word(reg, WordValue::Int(value))
}

/// Push `reg` onto the stack
pub fn push(reg: Reg) -> [AsmInst; 2] {
    [
        AsmInst::Sw(reg, -4, CallingConvention::STACK_PTR),
        AsmInst::Sub(CallingConvention::STACK_PTR, CallingConvention::STACK_PTR, CallingConvention::FOUR),
    ]
}

/// Pop the top of the stack into `reg`
pub fn pop(reg: Reg) -> [AsmInst; 2] {
    [
        AsmInst::Add(CallingConvention::STACK_PTR, CallingConvention::STACK_PTR, CallingConvention::FOUR),
        AsmInst::Lw(reg, -4, CallingConvention::STACK_PTR),
    ]
}

/// Discard the top stack word
pub fn discard() -> AsmInst {
    AsmInst::Add(CallingConvention::STACK_PTR, CallingConvention::STACK_PTR, CallingConvention::FOUR)
}

/// Call the routine whose address is in `$5` after `lis $5; .word target`
pub fn call(target: WordValue) -> [AsmInst; 3] {
    let [lis, word] = load_word(CallingConvention::SCRATCH, target);
    [lis, word, AsmInst::Jalr(CallingConvention::SCRATCH)]
}

/// Offset usable directly as a `lw`/`sw` immediate
pub fn immediate_offset(offset: i32) -> Option<i16> {
    i16::try_from(offset).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_sequences() {
        let text: Vec<String> = push(Reg::R3).iter().chain(pop(Reg::R5).iter()).map(ToString::to_string).collect();
        assert_eq!(
            text,
            vec!["sw $3, -4($30)", "sub $30, $30, $4", "add $30, $30, $4", "lw $5, -4($30)"]
        );
    }

    #[test]
    fn test_runtime_routine_names() {
        for routine in RuntimeRoutine::ALL {
            assert_eq!(RuntimeRoutine::from_name(routine.name()), Some(routine));
        }
        assert_eq!(RuntimeRoutine::from_name("Pwain"), None);
    }

    #[test]
    fn test_call_sequence() {
        let text: Vec<String> = call(WordValue::label("Pf")).iter().map(ToString::to_string).collect();
        assert_eq!(text, vec!["lis $5", ".word Pf", "jalr $5"]);
    }

    #[test]
    fn test_immediate_offset_range() {
        assert_eq!(immediate_offset(-32768), Some(-32768));
        assert_eq!(immediate_offset(32767), Some(32767));
        assert_eq!(immediate_offset(-32772), None);
        assert_eq!(immediate_offset(40000), None);
    }
}
