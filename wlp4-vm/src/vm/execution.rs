use super::instruction::{routine_at, Instr};
use super::{VMState, VM};
use crate::constants::*;
use crate::error::VmError;
use log::trace;
use wlp4_codegen::{CallingConvention as CC, Reg};

impl VM {
    fn reg(&self, reg: Reg) -> u32 {
        self.registers[reg.index()]
    }

    fn set_reg(&mut self, reg: Reg, value: u32) {
        self.registers[reg.index()] = value;
    }

    fn fetch(&self, addr: u32) -> Result<Instr, VmError> {
        if addr % WORD_BYTES != 0 {
            return Err(VmError::BadJump { addr });
        }
        self.instructions
            .get((addr / WORD_BYTES) as usize)
            .copied()
            .ok_or(VmError::BadJump { addr })
    }

    /// Execute one instruction, or one runtime routine when `pc` points at one
    pub fn step(&mut self) -> Result<(), VmError> {
        if self.state != VMState::Running {
            return Err(VmError::NotRunning);
        }

        if self.pc == HALT_ADDR {
            self.state = VMState::Halted;
            return Ok(());
        }

        if self.steps >= self.config.max_steps {
            return Err(VmError::StepLimit {
                limit: self.config.max_steps,
            });
        }
        self.steps += 1;

        if let Some(routine) = routine_at(self.pc) {
            self.run_routine(routine)?;
            self.pc = self.reg(CC::RETURN_ADDR);
            return Ok(());
        }

        let pc = self.pc;
        let instr = self.fetch(pc)?;
        trace!("0x{pc:08x}: {instr:?}");
        self.pc = pc.wrapping_add(WORD_BYTES);
        self.execute_instruction(instr, pc)?;

        // $0 always reads as 0
        self.registers[0] = 0;
        Ok(())
    }

    fn execute_instruction(&mut self, instr: Instr, pc: u32) -> Result<(), VmError> {
        match instr {
            Instr::Add(d, s, t) => {
                let value = self.reg(s).wrapping_add(self.reg(t));
                self.set_reg(d, value);
            }
            Instr::Sub(d, s, t) => {
                let value = self.reg(s).wrapping_sub(self.reg(t));
                self.set_reg(d, value);
            }
            Instr::Mult(s, t) => {
                let product = i64::from(self.reg(s) as i32) * i64::from(self.reg(t) as i32);
                self.hi = (product >> 32) as u32;
                self.lo = product as u32;
            }
            Instr::Div(s, t) => {
                let divisor = self.reg(t) as i32;
                if divisor == 0 {
                    return Err(VmError::DivideByZero { pc });
                }
                let dividend = self.reg(s) as i32;
                self.lo = dividend.wrapping_div(divisor) as u32;
                self.hi = dividend.wrapping_rem(divisor) as u32;
            }
            Instr::Mfhi(d) => self.set_reg(d, self.hi),
            Instr::Mflo(d) => self.set_reg(d, self.lo),
            Instr::Lis(d) => match self.fetch(self.pc) {
                Ok(Instr::Data(value)) => {
                    self.set_reg(d, value);
                    self.pc = self.pc.wrapping_add(WORD_BYTES);
                }
                _ => return Err(VmError::BadLis { pc }),
            },
            Instr::Slt(d, s, t) => {
                let value = (self.reg(s) as i32) < (self.reg(t) as i32);
                self.set_reg(d, u32::from(value));
            }
            Instr::Sltu(d, s, t) => {
                let value = self.reg(s) < self.reg(t);
                self.set_reg(d, u32::from(value));
            }
            Instr::Lw(t, offset, s) => {
                let addr = effective_address(self.reg(s), offset);
                let value = self.load(addr, pc)?;
                self.set_reg(t, value);
            }
            Instr::Sw(t, offset, s) => {
                let addr = effective_address(self.reg(s), offset);
                self.store(addr, self.reg(t), pc)?;
            }
            Instr::Beq(s, t, target) => {
                if self.reg(s) == self.reg(t) {
                    self.pc = target;
                }
            }
            Instr::Bne(s, t, target) => {
                if self.reg(s) != self.reg(t) {
                    self.pc = target;
                }
            }
            Instr::Jr(s) => self.pc = self.reg(s),
            Instr::Jalr(s) => {
                let target = self.reg(s);
                self.set_reg(CC::RETURN_ADDR, self.pc);
                self.pc = target;
            }
            Instr::Data(_) => return Err(VmError::DataExecuted { addr: pc }),
        }
        Ok(())
    }

    fn checked_index(&self, addr: u32, pc: u32) -> Result<usize, VmError> {
        if addr % WORD_BYTES != 0 {
            return Err(VmError::Misaligned { addr, pc });
        }
        let index = (addr / WORD_BYTES) as usize;
        if index >= self.memory.len() {
            return Err(VmError::BadAddress { addr, pc });
        }
        Ok(index)
    }

    fn load(&mut self, addr: u32, pc: u32) -> Result<u32, VmError> {
        if let Some(value) = self.handle_mmio_read(addr) {
            return Ok(value);
        }
        let index = self.checked_index(addr, pc)?;
        Ok(self.memory[index])
    }

    fn store(&mut self, addr: u32, value: u32, pc: u32) -> Result<(), VmError> {
        if self.handle_mmio_write(addr, value) {
            return Ok(());
        }
        let index = self.checked_index(addr, pc)?;
        if index < self.instructions.len() {
            return Err(VmError::CodeWrite { addr, pc });
        }
        self.memory[index] = value;
        Ok(())
    }
}

fn effective_address(base: u32, offset: i16) -> u32 {
    base.wrapping_add(i32::from(offset) as u32)
}
