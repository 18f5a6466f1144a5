//! Host-implemented runtime routines
//!
//! `print`, `new`, `delete` and `init` are reached by jumping to their
//! routine addresses. Each takes its argument in `$1`, leaves any result in
//! `$3` and returns through `$31`.

use super::VM;
use crate::constants::WORD_BYTES;
use crate::error::VmError;
use log::{debug, trace};
use std::collections::BTreeMap;
use wlp4_codegen::{CallingConvention as CC, RuntimeRoutine};

/// First-fit allocator over `[start, limit)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heap {
    next: u32,
    limit: u32,
    /// Live blocks, address to size in words
    live: BTreeMap<u32, u32>,
    /// Freed blocks, address to size in words
    free: BTreeMap<u32, u32>,
}

impl Heap {
    pub fn new(start: u32, limit: u32) -> Self {
        Self {
            next: start,
            limit,
            live: BTreeMap::new(),
            free: BTreeMap::new(),
        }
    }

    /// Allocate `words` words; `None` when the request cannot be met
    pub fn allocate(&mut self, words: i32) -> Option<u32> {
        let words = u32::try_from(words).ok().filter(|w| *w > 0)?;

        let reuse = self
            .free
            .iter()
            .find(|(_, size)| **size >= words)
            .map(|(addr, size)| (*addr, *size));
        if let Some((addr, size)) = reuse {
            self.free.remove(&addr);
            if size > words {
                self.free.insert(addr + words * WORD_BYTES, size - words);
            }
            self.live.insert(addr, words);
            return Some(addr);
        }

        let bytes = words.checked_mul(WORD_BYTES)?;
        let end = self.next.checked_add(bytes)?;
        if end > self.limit {
            return None;
        }
        let addr = self.next;
        self.next = end;
        self.live.insert(addr, words);
        Some(addr)
    }

    /// Release a block returned by [`Heap::allocate`]
    pub fn release(&mut self, addr: u32) -> Result<(), VmError> {
        let mut size = self.live.remove(&addr).ok_or(VmError::BadFree { addr })?;
        let mut start = addr;

        // Merge with the neighbouring free blocks
        if let Some(next_size) = self.free.remove(&(addr + size * WORD_BYTES)) {
            size += next_size;
        }
        if let Some((&prev, &prev_size)) = self.free.range(..addr).next_back() {
            if prev + prev_size * WORD_BYTES == addr {
                self.free.remove(&prev);
                start = prev;
                size += prev_size;
            }
        }
        self.free.insert(start, size);
        Ok(())
    }

    pub fn live_blocks(&self) -> usize {
        self.live.len()
    }
}

impl VM {
    pub(super) fn run_routine(&mut self, routine: RuntimeRoutine) -> Result<(), VmError> {
        let arg = self.registers[CC::RUNTIME_ARG.index()];
        trace!("runtime {routine}({})", arg as i32);
        match routine {
            RuntimeRoutine::Print => {
                self.output_buffer
                    .extend_from_slice(format!("{}\n", arg as i32).as_bytes());
                self.stats.prints += 1;
            }
            RuntimeRoutine::New => {
                let result = match self.heap.allocate(arg as i32) {
                    Some(addr) => {
                        self.stats.allocations += 1;
                        addr
                    }
                    None => {
                        debug!("new int[{}] failed", arg as i32);
                        self.stats.failed_allocations += 1;
                        0
                    }
                };
                self.registers[CC::RESULT.index()] = result;
            }
            RuntimeRoutine::Delete => {
                self.heap.release(arg)?;
                self.stats.frees += 1;
            }
            RuntimeRoutine::Init => {}
        }
        Ok(())
    }

    pub fn live_allocations(&self) -> usize {
        self.heap.live_blocks()
    }
}
