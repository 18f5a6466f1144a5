//! Label naming
//!
//! Control-flow labels are a fixed lowercase prefix followed by a counter
//! shared by the whole translation, so no two calls ever return the same
//! label. Procedure labels use the `P` prefix and never carry a counter,
//! which keeps the two families and the imported runtime names disjoint.

/// Prefix of every procedure entry label
pub const PROCEDURE_PREFIX: &str = "P";

/// Entry label of a procedure
pub fn procedure_label(name: &str) -> String {
    format!("{PROCEDURE_PREFIX}{name}")
}

/// Label kinds used by the emitters
pub mod prefix {
    pub const ELSE: &str = "else";
    pub const ENDIF: &str = "endif";
    pub const WHILE: &str = "while";
    pub const ENDWHILE: &str = "endwhile";
    pub const ALLOC_SUCCESS: &str = "allocsuccess";
    pub const SKIP_DELETE: &str = "skipdelete";
}

/// Source of unique control-flow labels for one translation
#[derive(Debug)]
pub struct LabelAllocator {
    next_id: u32,
}

impl Default for LabelAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn new_label(&mut self, prefix: &str) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("{prefix}{id}")
    }

    /// Number of labels handed out so far
    pub fn allocated(&self) -> u32 {
        self.next_id - 1
    }
}
