//! Procedure emission
//!
//! [`ProcedureEmitter`] owns the instruction stream of one procedure and
//! walks it through prologue, body and epilogue in that order. Calling a step
//! out of order is reported as [`CodegenError::PhaseViolation`] instead of
//! producing a frame the epilogue cannot unwind.

use crate::error::CodegenError;
use crate::layout::ProcedureFrame;
use crate::naming::procedure_label;
use log::{debug, trace};
use wlp4_codegen::abi::{self, CallingConvention as CC};
use wlp4_codegen::AsmInst;
use wlp4_common::NULL_SENTINEL;
use wlp4_tree::typed_ast::{Initializer, LocalDecl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Prologue,
    Body,
    Done,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Prologue => "prologue",
            Phase::Body => "body",
            Phase::Done => "epilogue",
        }
    }
}

pub struct ProcedureEmitter<'a> {
    frame: &'a ProcedureFrame,
    instructions: Vec<AsmInst>,
    phase: Phase,
    locals_initialized: usize,
    emit_comments: bool,
}

impl<'a> ProcedureEmitter<'a> {
    pub fn new(frame: &'a ProcedureFrame, emit_comments: bool) -> Self {
        Self {
            frame,
            instructions: Vec::new(),
            phase: Phase::Start,
            locals_initialized: 0,
            emit_comments,
        }
    }

    fn require(&self, phase: Phase, action: &'static str) -> Result<(), CodegenError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(CodegenError::PhaseViolation {
                procedure: self.frame.name.clone(),
                action,
                phase: self.phase.name(),
            })
        }
    }

    fn comment(&mut self, text: impl Into<String>) {
        if self.emit_comments {
            self.instructions.push(AsmInst::Comment(text.into()));
        }
    }

    /// Entry label and frame setup
    pub fn emit_prologue(&mut self) -> Result<(), CodegenError> {
        self.require(Phase::Start, "emit the prologue")?;
        debug!("Emitting prologue for '{}'", self.frame.name);

        self.comment(format!("procedure {}", self.frame.name));
        self.instructions.push(AsmInst::Label(procedure_label(&self.frame.name)));
        self.comment("prologue");
        if self.frame.is_entry() {
            self.instructions.extend(abi::load_constant(CC::FOUR, 4));
            for reg in CC::ENTRY_ARGS {
                self.instructions.extend(abi::push(reg));
            }
        }
        self.instructions.push(AsmInst::Sub(CC::FRAME_PTR, CC::STACK_PTR, CC::FOUR));

        self.phase = Phase::Prologue;
        Ok(())
    }

    /// Push the next local's initial value, creating its slot
    pub fn init_local(&mut self, local: &LocalDecl) -> Result<(), CodegenError> {
        self.require(Phase::Prologue, "initialize a local")?;
        let value = match local.init {
            Initializer::Num(n) => i64::from(n),
            Initializer::Null => i64::from(NULL_SENTINEL),
        };
        trace!("  local {} = {value}", local.decl.name);

        self.comment(format!("local {} = {value}", local.decl.name));
        self.instructions.extend(abi::load_constant(CC::SCRATCH, value));
        self.instructions.extend(abi::push(CC::SCRATCH));
        self.locals_initialized += 1;
        Ok(())
    }

    /// Finish the prologue; every local must have its slot by now
    pub fn begin_body(&mut self) -> Result<(), CodegenError> {
        self.require(Phase::Prologue, "begin the body")?;
        if self.locals_initialized != self.frame.local_count() {
            return Err(CodegenError::PhaseViolation {
                procedure: self.frame.name.clone(),
                action: "begin the body before every local has a slot",
                phase: self.phase.name(),
            });
        }
        self.comment("body");
        self.phase = Phase::Body;
        Ok(())
    }

    /// Instruction stream for body code
    pub fn body(&mut self) -> Result<&mut Vec<AsmInst>, CodegenError> {
        self.require(Phase::Body, "emit body code")?;
        Ok(&mut self.instructions)
    }

    /// Release the frame and return; the result is already in `$3`
    pub fn emit_epilogue(&mut self) -> Result<(), CodegenError> {
        self.require(Phase::Body, "emit the epilogue")?;
        let slots = self.frame.epilogue_slots();
        debug!("Emitting epilogue for '{}' ({slots} slot(s))", self.frame.name);

        self.comment("epilogue");
        for _ in 0..slots {
            self.instructions.push(abi::discard());
        }
        self.instructions.push(AsmInst::Jr(CC::RETURN_ADDR));

        self.phase = Phase::Done;
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<AsmInst>, CodegenError> {
        self.require(Phase::Done, "finish")?;
        Ok(self.instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ProcedureFrame;
    use pretty_assertions::assert_eq;
    use wlp4_common::Type;
    use wlp4_tree::typed_ast::{Declaration, Expr, ProcedureDef, ProcedureKind};

    fn def(kind: ProcedureKind, name: &str, params: usize, locals: Vec<LocalDecl>) -> ProcedureDef {
        ProcedureDef {
            kind,
            name: name.to_string(),
            params: (0..params).map(|i| Declaration::new(&format!("p{i}"), Type::Int)).collect(),
            locals,
            body: Vec::new(),
            ret: Expr::num(0),
        }
    }

    fn local(name: &str, init: Initializer) -> LocalDecl {
        LocalDecl {
            decl: Declaration::new(name, Type::Int),
            init,
        }
    }

    fn text(insts: &[AsmInst]) -> Vec<String> {
        insts.iter().map(ToString::to_string).collect()
    }

    fn emit_empty(frame: &ProcedureFrame, locals: &[LocalDecl]) -> Vec<AsmInst> {
        let mut emitter = ProcedureEmitter::new(frame, false);
        emitter.emit_prologue().unwrap();
        for l in locals {
            emitter.init_local(l).unwrap();
        }
        emitter.begin_body().unwrap();
        emitter.emit_epilogue().unwrap();
        emitter.finish().unwrap()
    }

    #[test]
    fn test_entry_prologue_and_epilogue() {
        let locals = vec![local("x", Initializer::Num(7))];
        let frame = ProcedureFrame::build(&def(ProcedureKind::Entry, "wain", 2, locals.clone()));
        assert_eq!(
            text(&emit_empty(&frame, &locals)),
            vec![
                "Pwain:",
                "lis $4",
                ".word 4",
                "sw $1, -4($30)",
                "sub $30, $30, $4",
                "sw $2, -4($30)",
                "sub $30, $30, $4",
                "sub $29, $30, $4",
                "lis $5",
                ".word 7",
                "sw $5, -4($30)",
                "sub $30, $30, $4",
                "add $30, $30, $4",
                "add $30, $30, $4",
                "add $30, $30, $4",
                "jr $31",
            ]
        );
    }

    #[test]
    fn test_ordinary_epilogue_leaves_parameters() {
        let locals = vec![local("q", Initializer::Null)];
        let frame = ProcedureFrame::build(&def(ProcedureKind::Ordinary, "f", 3, locals.clone()));
        assert_eq!(
            text(&emit_empty(&frame, &locals)),
            vec![
                "Pf:",
                "sub $29, $30, $4",
                "lis $5",
                ".word 1",
                "sw $5, -4($30)",
                "sub $30, $30, $4",
                "add $30, $30, $4",
                "jr $31",
            ]
        );
    }

    #[test]
    fn test_comments_are_optional() {
        let frame = ProcedureFrame::build(&def(ProcedureKind::Ordinary, "g", 0, Vec::new()));
        let mut emitter = ProcedureEmitter::new(&frame, true);
        emitter.emit_prologue().unwrap();
        emitter.begin_body().unwrap();
        emitter.emit_epilogue().unwrap();
        let insts = emitter.finish().unwrap();
        assert!(insts.contains(&AsmInst::Comment("procedure g".to_string())));
        assert!(insts.contains(&AsmInst::Comment("epilogue".to_string())));
    }

    #[test]
    fn test_out_of_order_steps_are_rejected() {
        let frame = ProcedureFrame::build(&def(ProcedureKind::Ordinary, "h", 0, Vec::new()));
        let mut emitter = ProcedureEmitter::new(&frame, false);
        assert!(matches!(emitter.body(), Err(CodegenError::PhaseViolation { .. })));
        assert!(matches!(emitter.emit_epilogue(), Err(CodegenError::PhaseViolation { .. })));
        emitter.emit_prologue().unwrap();
        assert!(matches!(emitter.emit_prologue(), Err(CodegenError::PhaseViolation { .. })));
        emitter.begin_body().unwrap();
        assert!(matches!(
            emitter.init_local(&local("late", Initializer::Num(1))),
            Err(CodegenError::PhaseViolation { .. })
        ));
    }

    #[test]
    fn test_missing_local_initialization_is_rejected() {
        let locals = vec![local("a", Initializer::Num(1)), local("b", Initializer::Num(2))];
        let frame = ProcedureFrame::build(&def(ProcedureKind::Ordinary, "k", 0, locals.clone()));
        let mut emitter = ProcedureEmitter::new(&frame, false);
        emitter.emit_prologue().unwrap();
        emitter.init_local(&locals[0]).unwrap();
        assert!(matches!(emitter.begin_body(), Err(CodegenError::PhaseViolation { .. })));
    }
}
