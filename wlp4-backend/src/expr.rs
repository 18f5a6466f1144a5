//! Expression lowering
//!
//! Every expression leaves its value in `$3`. Binary operators evaluate the
//! left operand, push it, evaluate the right operand and pop the left one
//! into `$5`. Operand types decide pointer scaling and whether comparisons
//! are signed.
//!
//! Lowering recurses once per operand, following the shape of the typed tree.

use crate::body::BodyLowering;
use crate::error::CodegenError;
use crate::naming::{prefix, procedure_label};
use log::trace;
use wlp4_codegen::abi::{self, CallingConvention as CC, RuntimeRoutine};
use wlp4_codegen::{AsmInst, Reg, WordValue};
use wlp4_common::{Type, NULL_SENTINEL};
use wlp4_tree::typed_ast::{BinaryOp, Expr, ExprKind, LValue, RelOp, Test};

/// Which operand of `+`/`-` is an index that needs scaling to bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scale {
    None,
    Left,
    Right,
}

impl BodyLowering<'_> {
    pub fn lower_expr(&mut self, expr: &Expr) -> Result<(), CodegenError> {
        match &expr.kind {
            ExprKind::Num(value) => self.load_constant(CC::RESULT, i64::from(*value)),
            ExprKind::Null => self.load_constant(CC::RESULT, i64::from(NULL_SENTINEL)),
            ExprKind::Var(name) => self.load_variable(name)?,
            ExprKind::Paren(inner) => self.lower_expr(inner)?,
            ExprKind::AddressOf(target) => self.lower_address(target)?,
            ExprKind::Deref(pointer) => {
                self.lower_expr(pointer)?;
                self.emit(AsmInst::Lw(CC::RESULT, 0, CC::RESULT));
            }
            ExprKind::New(size) => self.lower_new(size)?,
            ExprKind::Call { callee, args } => self.lower_call(callee, args)?,
            ExprKind::Getchar => {
                self.extend(abi::load_word(CC::SCRATCH, WordValue::Hex(CC::INPUT_ADDR)));
                self.emit(AsmInst::Lw(CC::RESULT, 0, CC::SCRATCH));
            }
            ExprKind::Binary { op, left, right } => self.lower_binary(*op, left, right)?,
        }
        Ok(())
    }

    /// `$3` = storage address of an lvalue
    pub fn lower_address(&mut self, target: &LValue) -> Result<(), CodegenError> {
        match target.peel() {
            LValue::Var { name, .. } => {
                let offset = self.symbol(name)?.offset;
                self.load_slot_address(offset);
            }
            LValue::Deref(pointer) => self.lower_expr(pointer)?,
            LValue::Paren(inner) => self.lower_address(inner)?,
        }
        Ok(())
    }

    /// Left operand in `$5`, right operand in `$3`
    fn lower_operands(&mut self, left: &Expr, right: &Expr, scale: Scale) -> Result<(), CodegenError> {
        self.lower_expr(left)?;
        if scale == Scale::Left {
            self.scale_result();
        }
        self.push(CC::RESULT);
        self.lower_expr(right)?;
        if scale == Scale::Right {
            self.scale_result();
        }
        self.pop(CC::SCRATCH);
        Ok(())
    }

    /// `$3 *= 4`
    fn scale_result(&mut self) {
        self.emit(AsmInst::Mult(CC::RESULT, CC::FOUR));
        self.emit(AsmInst::Mflo(CC::RESULT));
    }

    fn lower_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<(), CodegenError> {
        trace!("  {} {op} {}", left.ty, right.ty);
        match (op, left.ty, right.ty) {
            (BinaryOp::Add, Type::Int, Type::Int) => {
                self.lower_operands(left, right, Scale::None)?;
                self.emit(AsmInst::Add(CC::RESULT, CC::SCRATCH, CC::RESULT));
            }
            (BinaryOp::Add, Type::IntPtr, Type::Int) => {
                self.lower_operands(left, right, Scale::Right)?;
                self.emit(AsmInst::Add(CC::RESULT, CC::SCRATCH, CC::RESULT));
            }
            (BinaryOp::Add, Type::Int, Type::IntPtr) => {
                self.lower_operands(left, right, Scale::Left)?;
                self.emit(AsmInst::Add(CC::RESULT, CC::SCRATCH, CC::RESULT));
            }
            (BinaryOp::Sub, Type::Int, Type::Int) => {
                self.lower_operands(left, right, Scale::None)?;
                self.emit(AsmInst::Sub(CC::RESULT, CC::SCRATCH, CC::RESULT));
            }
            (BinaryOp::Sub, Type::IntPtr, Type::Int) => {
                self.lower_operands(left, right, Scale::Right)?;
                self.emit(AsmInst::Sub(CC::RESULT, CC::SCRATCH, CC::RESULT));
            }
            (BinaryOp::Sub, Type::IntPtr, Type::IntPtr) => {
                self.lower_operands(left, right, Scale::None)?;
                self.emit(AsmInst::Sub(CC::RESULT, CC::SCRATCH, CC::RESULT));
                self.emit(AsmInst::Div(CC::RESULT, CC::FOUR));
                self.emit(AsmInst::Mflo(CC::RESULT));
            }
            (BinaryOp::Mul, Type::Int, Type::Int) => {
                self.lower_operands(left, right, Scale::None)?;
                self.emit(AsmInst::Mult(CC::SCRATCH, CC::RESULT));
                self.emit(AsmInst::Mflo(CC::RESULT));
            }
            (BinaryOp::Div, Type::Int, Type::Int) => {
                self.lower_operands(left, right, Scale::None)?;
                self.emit(AsmInst::Div(CC::SCRATCH, CC::RESULT));
                self.emit(AsmInst::Mflo(CC::RESULT));
            }
            (BinaryOp::Mod, Type::Int, Type::Int) => {
                self.lower_operands(left, right, Scale::None)?;
                self.emit(AsmInst::Div(CC::SCRATCH, CC::RESULT));
                self.emit(AsmInst::Mfhi(CC::RESULT));
            }
            (op, left_ty, right_ty) => {
                return Err(CodegenError::InvalidOperands {
                    op: op.to_string(),
                    left: left_ty,
                    right: right_ty,
                    procedure: self.frame.name.clone(),
                })
            }
        }
        Ok(())
    }

    /// `new int[size]`; a failed allocation yields the null sentinel
    fn lower_new(&mut self, size: &Expr) -> Result<(), CodegenError> {
        self.comment("new");
        self.push(CC::RUNTIME_ARG);
        self.push(CC::RETURN_ADDR);
        self.lower_expr(size)?;
        self.emit(AsmInst::Add(CC::RUNTIME_ARG, CC::RESULT, CC::ZERO));
        self.call_runtime(RuntimeRoutine::New);

        let success = self.labels.new_label(prefix::ALLOC_SUCCESS);
        self.emit(AsmInst::Bne(CC::RESULT, CC::ZERO, success.clone()));
        self.load_constant(CC::RESULT, i64::from(NULL_SENTINEL));
        self.label(&success);

        self.pop(CC::RETURN_ADDR);
        self.pop(CC::RUNTIME_ARG);
        Ok(())
    }

    /// Arguments are pushed left to right and popped by the caller
    fn lower_call(&mut self, callee: &str, args: &[Expr]) -> Result<(), CodegenError> {
        let table = self.table;
        let target = table.get(callee).ok_or_else(|| CodegenError::UndefinedProcedure {
            name: callee.to_string(),
            caller: self.frame.name.clone(),
        })?;
        if target.param_count() != args.len() {
            return Err(CodegenError::ArityMismatch {
                name: callee.to_string(),
                expected: target.param_count(),
                found: args.len(),
            });
        }

        self.comment(format!("call {callee}"));
        self.push(CC::FRAME_PTR);
        self.push(CC::RETURN_ADDR);
        for arg in args {
            self.lower_expr(arg)?;
            self.push(CC::RESULT);
        }
        self.extend(abi::call(WordValue::Label(procedure_label(callee))));
        for _ in args {
            self.emit(abi::discard());
        }
        self.pop(CC::RETURN_ADDR);
        self.pop(CC::FRAME_PTR);
        Ok(())
    }

    /// Evaluate a test and branch to `fail` when it is false
    pub fn lower_test(&mut self, test: &Test, fail: &str) -> Result<(), CodegenError> {
        self.lower_operands(&test.left, &test.right, Scale::None)?;

        let less_than: fn(Reg, Reg, Reg) -> AsmInst = if test.is_unsigned() { AsmInst::Sltu } else { AsmInst::Slt };
        let fail = fail.to_string();
        match test.op {
            RelOp::Eq => self.emit(AsmInst::Bne(CC::SCRATCH, CC::RESULT, fail)),
            RelOp::Ne => self.emit(AsmInst::Beq(CC::SCRATCH, CC::RESULT, fail)),
            RelOp::Lt => {
                self.emit(less_than(CC::COMPARE, CC::SCRATCH, CC::RESULT));
                self.emit(AsmInst::Beq(CC::COMPARE, CC::ZERO, fail));
            }
            RelOp::Ge => {
                self.emit(less_than(CC::COMPARE, CC::SCRATCH, CC::RESULT));
                self.emit(AsmInst::Bne(CC::COMPARE, CC::ZERO, fail));
            }
            RelOp::Gt => {
                self.emit(less_than(CC::COMPARE, CC::RESULT, CC::SCRATCH));
                self.emit(AsmInst::Beq(CC::COMPARE, CC::ZERO, fail));
            }
            RelOp::Le => {
                self.emit(less_than(CC::COMPARE, CC::RESULT, CC::SCRATCH));
                self.emit(AsmInst::Bne(CC::COMPARE, CC::ZERO, fail));
            }
        }
        Ok(())
    }
}
