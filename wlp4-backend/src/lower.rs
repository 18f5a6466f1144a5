//! Whole-program lowering
//!
//! Two phases: the procedure table is built from the complete program, then
//! each procedure is emitted against that read-only table. The entry
//! procedure comes first so execution starts at its prologue.

use crate::body::BodyLowering;
use crate::error::CodegenError;
use crate::function::ProcedureEmitter;
use crate::layout::{EntryArgument, ProcedureFrame, ProcedureTable};
use crate::naming::LabelAllocator;
use crate::LoweringOptions;
use log::{debug, info};
use std::collections::BTreeSet;
use wlp4_codegen::{AsmInst, RuntimeRoutine};
use wlp4_tree::typed_ast::{ProcedureDef, Program};

/// State shared by every procedure of one translation
struct ProgramLowering<'a> {
    table: &'a ProcedureTable,
    labels: LabelAllocator,
    imports: BTreeSet<RuntimeRoutine>,
    options: &'a LoweringOptions,
}

impl ProgramLowering<'_> {
    fn lower_procedure(&mut self, def: &ProcedureDef, frame: &ProcedureFrame) -> Result<Vec<AsmInst>, CodegenError> {
        debug!("Lowering procedure '{}'", def.name);
        if frame.entry_argument() == Some(EntryArgument::Array) {
            debug!("'{}' takes an array; runtime init is not called", def.name);
        }

        let mut emitter = ProcedureEmitter::new(frame, self.options.emit_comments);
        emitter.emit_prologue()?;
        for local in &def.locals {
            emitter.init_local(local)?;
        }
        emitter.begin_body()?;

        let mut body = BodyLowering::new(
            self.table,
            frame,
            &mut self.labels,
            &mut self.imports,
            emitter.body()?,
            self.options.emit_comments,
        );
        body.lower_statements(&def.body)?;
        body.comment("return");
        body.lower_expr(&def.ret)?;

        emitter.emit_epilogue()?;
        emitter.finish()
    }
}

/// Lower a checked program to MIPS instructions
pub fn lower_program(program: &Program, options: &LoweringOptions) -> Result<Vec<AsmInst>, CodegenError> {
    info!("Lowering program with {} procedure(s)", program.procedures.len() + 1);
    let table = ProcedureTable::build(program);

    let mut lowering = ProgramLowering {
        table: &table,
        labels: LabelAllocator::new(),
        imports: BTreeSet::from([RuntimeRoutine::Print]),
        options,
    };

    let mut code = Vec::new();
    for (def, frame) in program.all_procedures().zip(table.iter()) {
        code.extend(lowering.lower_procedure(def, frame)?);
    }

    let mut instructions: Vec<AsmInst> = lowering
        .imports
        .iter()
        .map(|routine| AsmInst::Import(routine.name().to_string()))
        .collect();
    instructions.extend(code);

    info!(
        "Lowered {} instructions, {} label(s) allocated",
        instructions.len(),
        lowering.labels.allocated()
    );
    Ok(instructions)
}
