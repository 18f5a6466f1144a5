//! VM module - MIPS interpreter for generated WLP4 programs
//!
//! Memory layout (byte addresses):
//!
//! ```text
//! 0                program text
//! code_end         array argument (array mode only)
//! heap_start       heap, grows up
//! heap_limit       stack, grows down from the top of memory
//! ```

mod execution;
mod instruction;
mod mmio;
mod runtime;
mod state;

pub use instruction::{assemble, routine_addr, routine_at, Instr};
pub use runtime::Heap;
pub use state::{RuntimeStats, VMState};

use crate::constants::*;
use crate::error::VmError;
use log::{debug, info};
use std::collections::VecDeque;
use wlp4_codegen::{parse_program, AsmInst, CallingConvention as CC, Reg};

/// Interpreter configuration
#[derive(Debug, Clone)]
pub struct VmConfig {
    /// Total memory in words
    pub memory_words: usize,
    /// Words reserved for the stack at the top of memory
    pub stack_words: usize,
    /// Executed instructions before the run is abandoned
    pub max_steps: u64,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            memory_words: DEFAULT_MEMORY_WORDS,
            stack_words: DEFAULT_STACK_WORDS,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// The WLP4 MIPS Virtual Machine
pub struct VM {
    // Program text, one entry per word from address 0
    pub instructions: Vec<Instr>,

    // Data memory covering the whole address space, including the text
    pub memory: Vec<u32>,

    pub registers: [u32; 32],
    hi: u32,
    lo: u32,
    pub pc: u32,

    pub state: VMState,
    pub config: VmConfig,
    pub steps: u64,

    heap: Heap,
    pub stats: RuntimeStats,

    // Bytes written through the output address and by `print`
    pub output_buffer: Vec<u8>,
    // Bytes served to the input address
    pub input_buffer: VecDeque<u8>,
}

impl VM {
    pub fn new(config: VmConfig) -> Self {
        let memory_words = config.memory_words.max(MIN_MEMORY_WORDS);
        VM {
            instructions: Vec::new(),
            memory: vec![0; memory_words],
            registers: [0; 32],
            hi: 0,
            lo: 0,
            pc: 0,
            state: VMState::Setup,
            config,
            steps: 0,
            heap: Heap::new(0, 0),
            stats: RuntimeStats::default(),
            output_buffer: Vec::new(),
            input_buffer: VecDeque::new(),
        }
    }

    fn memory_bytes(&self) -> u32 {
        (self.memory.len() as u32).saturating_mul(WORD_BYTES)
    }

    fn heap_limit(&self) -> u32 {
        let stack = (self.config.stack_words as u32).saturating_mul(WORD_BYTES);
        self.memory_bytes().saturating_sub(stack)
    }

    fn code_end(&self) -> u32 {
        self.instructions.len() as u32 * WORD_BYTES
    }

    /// Parse and load assembly text
    pub fn load_source(&mut self, source: &str) -> Result<(), VmError> {
        let program = parse_program(source)?;
        self.load_program(&program)
    }

    pub fn load_program(&mut self, program: &[AsmInst]) -> Result<(), VmError> {
        let words = assemble(program)?;
        if words.len() as u32 * WORD_BYTES > self.heap_limit() {
            return Err(VmError::ProgramTooLarge { words: words.len() });
        }
        self.instructions = words;
        debug!("Loaded {} program words", self.instructions.len());
        Ok(())
    }

    pub fn set_input(&mut self, input: &[u8]) {
        self.input_buffer = input.iter().copied().collect();
    }

    fn reset(&mut self, heap_start: u32) {
        self.registers = [0; 32];
        self.hi = 0;
        self.lo = 0;
        self.pc = 0;
        self.steps = 0;
        self.stats = RuntimeStats::default();
        self.registers[CC::STACK_PTR.index()] = self.memory_bytes();
        self.registers[CC::RETURN_ADDR.index()] = HALT_ADDR;
        self.heap = Heap::new(heap_start, self.heap_limit());
        self.state = VMState::Running;
    }

    /// Run `wain(a, b)` with two integers
    pub fn start_two_ints(&mut self, a: i32, b: i32) {
        let code_end = self.code_end();
        self.reset(code_end);
        self.registers[1] = a as u32;
        self.registers[2] = b as u32;
        info!("Starting wain({a}, {b})");
    }

    /// Run `wain(array, length)` with the array placed after the program
    pub fn start_array(&mut self, array: &[i32]) -> Result<(), VmError> {
        let base = self.code_end();
        let end = base + array.len() as u32 * WORD_BYTES;
        if end > self.heap_limit() {
            return Err(VmError::ProgramTooLarge {
                words: self.instructions.len() + array.len(),
            });
        }
        self.reset(end);
        for (i, value) in array.iter().enumerate() {
            self.memory[(base / WORD_BYTES) as usize + i] = *value as u32;
        }
        self.registers[1] = base;
        self.registers[2] = array.len() as u32;
        info!("Starting wain(array of {}) at 0x{base:08x}", array.len());
        Ok(())
    }

    /// Run until `wain` returns
    pub fn run(&mut self) -> Result<(), VmError> {
        while self.state == VMState::Running {
            if let Err(err) = self.step() {
                self.state = VMState::Error(err.to_string());
                return Err(err);
            }
        }
        info!("Halted after {} steps", self.steps);
        Ok(())
    }

    pub fn register(&self, reg: Reg) -> u32 {
        self.registers[reg.index()]
    }

    /// `wain`'s return value
    pub fn result(&self) -> i32 {
        self.register(CC::RESULT) as i32
    }

    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output_buffer).into_owned()
    }
}

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub result: i32,
    pub output: String,
    pub stats: RuntimeStats,
    pub steps: u64,
}

impl RunOutcome {
    fn from_vm(vm: &VM) -> Self {
        Self {
            result: vm.result(),
            output: vm.output_text(),
            stats: vm.stats,
            steps: vm.steps,
        }
    }
}

/// Assemble `source` and run it with two integer arguments
pub fn run_two_ints(source: &str, a: i32, b: i32, input: &[u8]) -> Result<RunOutcome, VmError> {
    let mut vm = VM::new(VmConfig::default());
    vm.load_source(source)?;
    vm.set_input(input);
    vm.start_two_ints(a, b);
    vm.run()?;
    Ok(RunOutcome::from_vm(&vm))
}

/// Assemble `source` and run it with an array argument
pub fn run_array(source: &str, array: &[i32], input: &[u8]) -> Result<RunOutcome, VmError> {
    let mut vm = VM::new(VmConfig::default());
    vm.load_source(source)?;
    vm.set_input(input);
    vm.start_array(array)?;
    vm.run()?;
    Ok(RunOutcome::from_vm(&vm))
}
