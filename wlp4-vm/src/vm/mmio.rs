use super::VM;
use crate::constants::INPUT_EOF;
use log::trace;
use wlp4_codegen::CallingConvention as CC;

impl VM {
    /// Reads from the input address pop one byte
    pub(super) fn handle_mmio_read(&mut self, addr: u32) -> Option<u32> {
        if addr != CC::INPUT_ADDR {
            return None;
        }
        let value = match self.input_buffer.pop_front() {
            Some(byte) => u32::from(byte),
            None => INPUT_EOF,
        };
        trace!("getchar -> {}", value as i32);
        Some(value)
    }

    /// Writes to the output address emit the low byte; returns whether the
    /// address was a device
    pub(super) fn handle_mmio_write(&mut self, addr: u32, value: u32) -> bool {
        if addr != CC::OUTPUT_ADDR {
            return false;
        }
        self.output_buffer.push(value as u8);
        true
    }
}
