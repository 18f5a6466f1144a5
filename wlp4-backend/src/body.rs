//! Shared state for lowering procedure bodies
//!
//! [`BodyLowering`] borrows the read-only procedure table and the current
//! frame, plus the translation-wide label counter and import set. Expression
//! and statement lowering live in `expr.rs` and `stmt.rs`.

use crate::error::CodegenError;
use crate::layout::{ProcedureFrame, ProcedureTable, Symbol};
use crate::naming::LabelAllocator;
use std::collections::BTreeSet;
use wlp4_codegen::abi::{self, CallingConvention as CC, RuntimeRoutine};
use wlp4_codegen::{AsmInst, Reg, WordValue};

pub struct BodyLowering<'a> {
    pub(crate) table: &'a ProcedureTable,
    pub(crate) frame: &'a ProcedureFrame,
    pub(crate) labels: &'a mut LabelAllocator,
    pub(crate) imports: &'a mut BTreeSet<RuntimeRoutine>,
    pub(crate) out: &'a mut Vec<AsmInst>,
    pub(crate) emit_comments: bool,
}

impl<'a> BodyLowering<'a> {
    pub fn new(
        table: &'a ProcedureTable,
        frame: &'a ProcedureFrame,
        labels: &'a mut LabelAllocator,
        imports: &'a mut BTreeSet<RuntimeRoutine>,
        out: &'a mut Vec<AsmInst>,
        emit_comments: bool,
    ) -> Self {
        Self {
            table,
            frame,
            labels,
            imports,
            out,
            emit_comments,
        }
    }

    pub(crate) fn emit(&mut self, inst: AsmInst) {
        self.out.push(inst);
    }

    pub(crate) fn extend(&mut self, insts: impl IntoIterator<Item = AsmInst>) {
        self.out.extend(insts);
    }

    pub(crate) fn comment(&mut self, text: impl Into<String>) {
        if self.emit_comments {
            self.out.push(AsmInst::Comment(text.into()));
        }
    }

    pub(crate) fn push(&mut self, reg: Reg) {
        self.extend(abi::push(reg));
    }

    pub(crate) fn pop(&mut self, reg: Reg) {
        self.extend(abi::pop(reg));
    }

    pub(crate) fn load_constant(&mut self, reg: Reg, value: i64) {
        self.extend(abi::load_constant(reg, value));
    }

    pub(crate) fn label(&mut self, name: &str) {
        self.emit(AsmInst::Label(name.to_string()));
    }

    pub(crate) fn jump(&mut self, target: &str) {
        self.emit(AsmInst::Beq(CC::ZERO, CC::ZERO, target.to_string()));
    }

    /// Call an imported runtime routine with its argument already in `$1`
    pub(crate) fn call_runtime(&mut self, routine: RuntimeRoutine) {
        self.imports.insert(routine);
        self.extend(abi::call(WordValue::label(routine.name())));
    }

    pub(crate) fn symbol(&self, name: &str) -> Result<&'a Symbol, CodegenError> {
        let frame: &'a ProcedureFrame = self.frame;
        frame.lookup(name).ok_or_else(|| CodegenError::UndefinedVariable {
            name: name.to_string(),
            procedure: frame.name.clone(),
        })
    }

    /// `$3 = $29 + offset`
    pub(crate) fn load_slot_address(&mut self, offset: i32) {
        self.load_constant(CC::RESULT, i64::from(offset));
        self.emit(AsmInst::Add(CC::RESULT, CC::RESULT, CC::FRAME_PTR));
    }

    /// Load or store `reg` at `offset($29)`
    ///
    /// Offsets beyond the 16-bit immediate go through an address built in
    /// `$5`, so `reg` must not be `$5`.
    fn access_slot(&mut self, reg: Reg, offset: i32, store: bool) {
        let (base, offset) = match abi::immediate_offset(offset) {
            Some(imm) => (CC::FRAME_PTR, imm),
            None => {
                self.load_constant(CC::SCRATCH, i64::from(offset));
                self.emit(AsmInst::Add(CC::SCRATCH, CC::SCRATCH, CC::FRAME_PTR));
                (CC::SCRATCH, 0)
            }
        };
        self.emit(if store {
            AsmInst::Sw(reg, offset, base)
        } else {
            AsmInst::Lw(reg, offset, base)
        });
    }

    /// `$3 = name`
    pub(crate) fn load_variable(&mut self, name: &str) -> Result<(), CodegenError> {
        let symbol = self.symbol(name)?;
        self.access_slot(CC::RESULT, symbol.offset, false);
        Ok(())
    }

    /// `name = $3`, keeping the entry argument registers in step
    pub(crate) fn store_variable(&mut self, name: &str) -> Result<(), CodegenError> {
        let symbol = self.symbol(name)?;
        if self.frame.is_entry() {
            if let Some(index) = self.frame.param_index(name) {
                if let Some(&mirror) = CC::ENTRY_ARGS.get(index) {
                    self.emit(AsmInst::Add(mirror, CC::RESULT, CC::ZERO));
                }
            }
        }
        self.access_slot(CC::RESULT, symbol.offset, true);
        Ok(())
    }
}
