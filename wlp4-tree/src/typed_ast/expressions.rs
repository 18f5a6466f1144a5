//! Typed expressions
//!
//! Every expression carries the type the checker resolved for it; the code
//! generator reads these to choose between scaled and plain arithmetic and
//! between signed and unsigned comparisons.

use serde::Serialize;
use std::fmt;
use wlp4_common::Type;

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        };
        f.write_str(symbol)
    }
}

/// Typed expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// Integer literal
    Num(i32),

    /// `NULL`
    Null,

    /// Variable reference
    Var(String),

    /// `( expr )`
    Paren(Box<Expr>),

    /// `&lvalue`
    AddressOf(Box<LValue>),

    /// `*factor`
    Deref(Box<Expr>),

    /// `new int[size]`
    New(Box<Expr>),

    /// Procedure call
    Call {
        callee: String,
        args: Vec<Expr>,
    },

    /// `getchar()`
    Getchar,

    /// Arithmetic on two operands; the operand types select the instruction
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Self { kind, ty }
    }

    pub fn num(value: i32) -> Self {
        Self::new(ExprKind::Num(value), Type::Int)
    }

    pub fn null() -> Self {
        Self::new(ExprKind::Null, Type::IntPtr)
    }

    pub fn var(name: &str, ty: Type) -> Self {
        Self::new(ExprKind::Var(name.to_string()), ty)
    }
}

/// Assignable locations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LValue {
    /// Plain variable
    Var { name: String, ty: Type },

    /// `*factor`: the pointer value is the address
    Deref(Expr),

    /// `( lvalue )`
    Paren(Box<LValue>),
}

impl LValue {
    /// Strip any number of enclosing parentheses
    pub fn peel(&self) -> &LValue {
        let mut current = self;
        while let LValue::Paren(inner) = current {
            current = inner;
        }
        current
    }
}
