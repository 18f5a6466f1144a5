/// VM execution states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VMState {
    Setup,
    Running,
    Halted,
    Error(String),
}

/// Counts of runtime routine invocations
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeStats {
    pub prints: u32,
    pub allocations: u32,
    pub failed_allocations: u32,
    pub frees: u32,
}
