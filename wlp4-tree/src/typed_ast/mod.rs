//! Typed AST representation
//!
//! A structured view of the annotated tree. Grammar-level list encodings are
//! flattened, every expression carries its resolved type, and the code
//! generator matches on closed enums instead of production text.

mod conversion;
mod expressions;
mod program;
mod statements;


pub use conversion::build_program;
pub use expressions::{BinaryOp, Expr, ExprKind, LValue};
pub use program::{Declaration, Initializer, LocalDecl, ProcedureDef, ProcedureKind, Program, ENTRY_NAME};
pub use statements::{RelOp, Statement, Test};
