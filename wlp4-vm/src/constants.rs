//! Central configuration and constants for the WLP4 MIPS VM

/// Bytes per memory word
pub const WORD_BYTES: u32 = 4;

// Default VM configuration
pub const DEFAULT_MEMORY_WORDS: usize = 1 << 20; // 4 MiB
pub const DEFAULT_STACK_WORDS: usize = 1 << 16;
pub const DEFAULT_MAX_STEPS: u64 = 50_000_000;
pub const MIN_MEMORY_WORDS: usize = 1024;

/// Initial `$31`; jumping here ends the program
pub const HALT_ADDR: u32 = 0x8123_456c;

/// Runtime routines live at `ROUTINE_BASE + 4 * index`, outside memory
pub const ROUTINE_BASE: u32 = 0xfffe_0000;

/// Value `getchar()` yields once input is exhausted
pub const INPUT_EOF: u32 = u32::MAX;
