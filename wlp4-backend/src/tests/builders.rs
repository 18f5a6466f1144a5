//! Typed-tree builders shared by the backend tests

use crate::{generate_assembly, lower_program, LoweringOptions};
use wlp4_codegen::AsmInst;
use wlp4_common::Type;
use wlp4_tree::typed_ast::{
    BinaryOp, Declaration, Expr, ExprKind, Initializer, LValue, LocalDecl, ProcedureDef, ProcedureKind, Program,
    RelOp, Statement, Test,
};
use wlp4_vm::RunOutcome;

pub fn int(name: &str) -> Declaration {
    Declaration::new(name, Type::Int)
}

pub fn ptr(name: &str) -> Declaration {
    Declaration::new(name, Type::IntPtr)
}

pub fn local(name: &str, value: i32) -> LocalDecl {
    LocalDecl {
        decl: int(name),
        init: Initializer::Num(value),
    }
}

pub fn local_ptr(name: &str) -> LocalDecl {
    LocalDecl {
        decl: ptr(name),
        init: Initializer::Null,
    }
}

pub fn var(name: &str) -> Expr {
    Expr::var(name, Type::Int)
}

pub fn pvar(name: &str) -> Expr {
    Expr::var(name, Type::IntPtr)
}

pub fn num(value: i32) -> Expr {
    Expr::num(value)
}

pub fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let ty = match (op, left.ty, right.ty) {
        (BinaryOp::Add, Type::IntPtr, _) | (BinaryOp::Add, _, Type::IntPtr) => Type::IntPtr,
        (BinaryOp::Sub, Type::IntPtr, Type::Int) => Type::IntPtr,
        _ => Type::Int,
    };
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        ty,
    )
}

pub fn add(left: Expr, right: Expr) -> Expr {
    bin(BinaryOp::Add, left, right)
}

pub fn sub(left: Expr, right: Expr) -> Expr {
    bin(BinaryOp::Sub, left, right)
}

pub fn deref(pointer: Expr) -> Expr {
    Expr::new(ExprKind::Deref(Box::new(pointer)), Type::Int)
}

pub fn address_of(name: &str) -> Expr {
    Expr::new(
        ExprKind::AddressOf(Box::new(LValue::Var {
            name: name.to_string(),
            ty: Type::Int,
        })),
        Type::IntPtr,
    )
}

pub fn call(callee: &str, args: Vec<Expr>) -> Expr {
    Expr::new(
        ExprKind::Call {
            callee: callee.to_string(),
            args,
        },
        Type::Int,
    )
}

pub fn new_array(size: Expr) -> Expr {
    Expr::new(ExprKind::New(Box::new(size)), Type::IntPtr)
}

pub fn test(op: RelOp, left: Expr, right: Expr) -> Test {
    Test { op, left, right }
}

pub fn assign(name: &str, value: Expr) -> Statement {
    Statement::Assign {
        target: LValue::Var {
            name: name.to_string(),
            ty: value.ty,
        },
        value,
    }
}

pub fn store(pointer: Expr, value: Expr) -> Statement {
    Statement::Assign {
        target: LValue::Deref(pointer),
        value,
    }
}

pub fn if_else(test: Test, then_branch: Vec<Statement>, else_branch: Vec<Statement>) -> Statement {
    Statement::If {
        test,
        then_branch,
        else_branch,
    }
}

pub fn while_loop(test: Test, body: Vec<Statement>) -> Statement {
    Statement::While { test, body }
}

pub fn wain(params: [Declaration; 2], locals: Vec<LocalDecl>, body: Vec<Statement>, ret: Expr) -> ProcedureDef {
    ProcedureDef {
        kind: ProcedureKind::Entry,
        name: "wain".to_string(),
        params: params.to_vec(),
        locals,
        body,
        ret,
    }
}

pub fn procedure(
    name: &str,
    params: Vec<Declaration>,
    locals: Vec<LocalDecl>,
    body: Vec<Statement>,
    ret: Expr,
) -> ProcedureDef {
    ProcedureDef {
        kind: ProcedureKind::Ordinary,
        name: name.to_string(),
        params,
        locals,
        body,
        ret,
    }
}

pub fn program(procedures: Vec<ProcedureDef>, main: ProcedureDef) -> Program {
    Program { procedures, main }
}

/// `int wain(int a, int b)` with the given body and return value
pub fn simple(locals: Vec<LocalDecl>, body: Vec<Statement>, ret: Expr) -> Program {
    program(Vec::new(), wain([int("a"), int("b")], locals, body, ret))
}

/// Instructions without comments, rendered one per line
pub fn lines(program: &Program) -> Vec<String> {
    let options = LoweringOptions { emit_comments: false };
    lower_program(program, &options)
        .unwrap()
        .iter()
        .map(AsmInst::to_string)
        .collect()
}

/// Whether `needle` occurs as consecutive lines of `haystack`
pub fn contains_run(haystack: &[String], needle: &[&str]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window.iter().zip(needle).all(|(line, expected)| line == expected))
}

pub fn compile(program: &Program) -> String {
    generate_assembly(program, &LoweringOptions::default()).unwrap()
}

pub fn run(program: &Program, a: i32, b: i32) -> RunOutcome {
    run_with_input(program, a, b, b"")
}

pub fn run_with_input(program: &Program, a: i32, b: i32, input: &[u8]) -> RunOutcome {
    wlp4_vm::run_two_ints(&compile(program), a, b, input).unwrap()
}

pub fn run_array(program: &Program, array: &[i32]) -> RunOutcome {
    wlp4_vm::run_array(&compile(program), array, b"").unwrap()
}
