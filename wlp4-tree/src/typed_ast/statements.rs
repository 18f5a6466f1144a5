//! Typed statements
//!
//! Statements carry no type of their own; the expressions inside them do.

use super::expressions::{Expr, LValue};
use serde::Serialize;
use std::fmt;

/// Relational operators usable in `if` and `while` tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        };
        f.write_str(symbol)
    }
}

/// `left op right`; both operands have the same type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Test {
    pub op: RelOp,
    pub left: Expr,
    pub right: Expr,
}

impl Test {
    /// Pointers compare as unsigned addresses
    pub fn is_unsigned(&self) -> bool {
        self.left.ty.is_pointer() || self.right.ty.is_pointer()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// `lvalue = expr;`
    Assign { target: LValue, value: Expr },

    /// `if (test) { .. } else { .. }`; both branches always present
    If {
        test: Test,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },

    /// `while (test) { .. }`
    While { test: Test, body: Vec<Statement> },

    /// `println(expr);`
    Println(Expr),

    /// `putchar(expr);`
    Putchar(Expr),

    /// `delete [] expr;`
    Delete(Expr),
}
