//! Procedures and whole programs

use super::expressions::Expr;
use super::statements::Statement;
use serde::Serialize;
use wlp4_common::Type;

/// Name of the entry procedure
pub const ENTRY_NAME: &str = "wain";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProcedureKind {
    /// `wain`: arguments arrive in `$1`/`$2` from the runtime
    Entry,
    /// Arguments are pushed by the caller
    Ordinary,
}

/// A named, typed variable declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub ty: Type,
}

impl Declaration {
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

/// Constant initial value of a local
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Initializer {
    Num(i32),
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalDecl {
    pub decl: Declaration,
    pub init: Initializer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureDef {
    pub kind: ProcedureKind,
    pub name: String,
    /// In declaration order
    pub params: Vec<Declaration>,
    /// In declaration order
    pub locals: Vec<LocalDecl>,
    pub body: Vec<Statement>,
    pub ret: Expr,
}

impl ProcedureDef {
    pub fn is_entry(&self) -> bool {
        self.kind == ProcedureKind::Entry
    }
}

/// A complete program: ordinary procedures in source order, then `wain`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub procedures: Vec<ProcedureDef>,
    pub main: ProcedureDef,
}

impl Program {
    /// Every procedure, entry first
    pub fn all_procedures(&self) -> impl Iterator<Item = &ProcedureDef> {
        std::iter::once(&self.main).chain(self.procedures.iter())
    }
}
