//! Statement lowering

use crate::body::BodyLowering;
use crate::error::CodegenError;
use crate::naming::prefix;
use wlp4_codegen::abi::{self, CallingConvention as CC, RuntimeRoutine};
use wlp4_codegen::{AsmInst, WordValue};
use wlp4_common::NULL_SENTINEL;
use wlp4_tree::typed_ast::{Expr, LValue, Statement};

impl BodyLowering<'_> {
    pub fn lower_statements(&mut self, statements: &[Statement]) -> Result<(), CodegenError> {
        for statement in statements {
            self.lower_statement(statement)?;
        }
        Ok(())
    }

    pub fn lower_statement(&mut self, statement: &Statement) -> Result<(), CodegenError> {
        match statement {
            Statement::Assign { target, value } => self.lower_assign(target, value),

            Statement::If {
                test,
                then_branch,
                else_branch,
            } => {
                let else_label = self.labels.new_label(prefix::ELSE);
                let end_label = self.labels.new_label(prefix::ENDIF);
                self.comment(format!("if {}", test.op));
                self.lower_test(test, &else_label)?;
                self.lower_statements(then_branch)?;
                self.jump(&end_label);
                self.label(&else_label);
                self.lower_statements(else_branch)?;
                self.label(&end_label);
                Ok(())
            }

            Statement::While { test, body } => {
                let start_label = self.labels.new_label(prefix::WHILE);
                let end_label = self.labels.new_label(prefix::ENDWHILE);
                self.comment(format!("while {}", test.op));
                self.label(&start_label);
                self.lower_test(test, &end_label)?;
                self.lower_statements(body)?;
                self.jump(&start_label);
                self.label(&end_label);
                Ok(())
            }

            Statement::Println(value) => {
                self.comment("println");
                self.with_runtime_arg(value, |this| {
                    this.emit(AsmInst::Add(CC::RUNTIME_ARG, CC::RESULT, CC::ZERO));
                    this.call_runtime(RuntimeRoutine::Print);
                })
            }

            Statement::Putchar(value) => {
                self.lower_expr(value)?;
                self.extend(abi::load_word(CC::SCRATCH, WordValue::Hex(CC::OUTPUT_ADDR)));
                self.emit(AsmInst::Sw(CC::RESULT, 0, CC::SCRATCH));
                Ok(())
            }

            Statement::Delete(value) => {
                self.comment("delete");
                self.with_runtime_arg(value, |this| {
                    let skip = this.labels.new_label(prefix::SKIP_DELETE);
                    this.load_constant(CC::SCRATCH, i64::from(NULL_SENTINEL));
                    this.emit(AsmInst::Beq(CC::RESULT, CC::SCRATCH, skip.clone()));
                    this.emit(AsmInst::Add(CC::RUNTIME_ARG, CC::RESULT, CC::ZERO));
                    this.call_runtime(RuntimeRoutine::Delete);
                    this.label(&skip);
                })
            }
        }
    }

    fn lower_assign(&mut self, target: &LValue, value: &Expr) -> Result<(), CodegenError> {
        match target.peel() {
            LValue::Var { name, .. } => {
                self.lower_expr(value)?;
                self.store_variable(name)
            }
            // The value is computed before the address and parked on the stack
            LValue::Deref(pointer) => {
                self.lower_expr(value)?;
                self.push(CC::RESULT);
                self.lower_expr(pointer)?;
                self.pop(CC::SCRATCH);
                self.emit(AsmInst::Sw(CC::SCRATCH, 0, CC::RESULT));
                Ok(())
            }
            LValue::Paren(inner) => self.lower_assign(inner, value),
        }
    }

    /// Save `$1` and `$31`, evaluate `value` into `$3`, run `call`, restore
    fn with_runtime_arg(
        &mut self,
        value: &Expr,
        call: impl FnOnce(&mut Self),
    ) -> Result<(), CodegenError> {
        self.push(CC::RUNTIME_ARG);
        self.push(CC::RETURN_ADDR);
        self.lower_expr(value)?;
        call(self);
        self.pop(CC::RETURN_ADDR);
        self.pop(CC::RUNTIME_ARG);
        Ok(())
    }
}
