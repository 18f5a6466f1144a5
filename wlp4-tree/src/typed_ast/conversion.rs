//! Annotated tree to typed AST conversion
//!
//! The tree has already passed the upstream type checker, so conversion only
//! restructures it. Shapes that cannot come out of a valid parse are reported
//! as malformed input rather than skipped.
//!
//! Lists are flattened with loops. Expressions are converted recursively, so
//! stack use grows with the length of an operator chain such as `a+a+...+a`;
//! the backend's expression lowering and the drop of the finished [`Expr`]
//! have the same bound.

use super::expressions::{BinaryOp, Expr, ExprKind, LValue};
use super::program::{Declaration, Initializer, LocalDecl, ProcedureDef, ProcedureKind, Program, ENTRY_NAME};
use super::statements::{RelOp, Statement, Test};
use crate::errors::TreeError;
use crate::node::{AnnotatedNode, Production, Terminal};
use crate::rule::Rule;
use crate::token::TokenKind;
use log::debug;
use wlp4_common::Type;

/// Convert a complete `start` tree into a [`Program`]
pub fn build_program(root: &AnnotatedNode) -> Result<Program, TreeError> {
    let start = expect_production(root, "start")?;
    let mut node = match (start.rule, start.children.as_slice()) {
        (Rule::Start, [_, procedures, _]) => procedures,
        _ => return Err(shape("start BOF procedures EOF", start)),
    };

    let mut procedures = Vec::new();
    let main = loop {
        let p = expect_production(node, "procedures")?;
        match (p.rule, p.children.as_slice()) {
            (Rule::ProceduresCons, [procedure, rest]) => {
                procedures.push(build_procedure(procedure)?);
                node = rest;
            }
            (Rule::ProceduresMain, [main]) => break build_main(main)?,
            _ => return Err(shape("procedures", p)),
        }
    };

    debug!(
        "Converted program: {} procedure(s) plus {}",
        procedures.len(),
        ENTRY_NAME
    );
    Ok(Program { procedures, main })
}

fn build_procedure(node: &AnnotatedNode) -> Result<ProcedureDef, TreeError> {
    let p = expect_production(node, "procedure")?;
    match (p.rule, p.children.as_slice()) {
        (Rule::Procedure, [_, id, _, params, _, _, dcls, statements, _, ret, _, _]) => Ok(ProcedureDef {
            kind: ProcedureKind::Ordinary,
            name: expect_terminal(id, TokenKind::Id)?.lexeme.clone(),
            params: build_params(params)?,
            locals: build_dcls(dcls)?,
            body: build_statements(statements)?,
            ret: build_expr(ret)?,
        }),
        _ => Err(shape("procedure", p)),
    }
}

fn build_main(node: &AnnotatedNode) -> Result<ProcedureDef, TreeError> {
    let p = expect_production(node, "main")?;
    match (p.rule, p.children.as_slice()) {
        (Rule::Main, [_, _, _, first, _, second, _, _, dcls, statements, _, ret, _, _]) => Ok(ProcedureDef {
            kind: ProcedureKind::Entry,
            name: ENTRY_NAME.to_string(),
            params: vec![build_dcl(first)?, build_dcl(second)?],
            locals: build_dcls(dcls)?,
            body: build_statements(statements)?,
            ret: build_expr(ret)?,
        }),
        _ => Err(shape("main", p)),
    }
}

fn build_params(node: &AnnotatedNode) -> Result<Vec<Declaration>, TreeError> {
    let p = expect_production(node, "params")?;
    let mut node = match (p.rule, p.children.as_slice()) {
        (Rule::ParamsEmpty, []) => return Ok(Vec::new()),
        (Rule::ParamsList, [list]) => list,
        _ => return Err(shape("params", p)),
    };

    let mut params = Vec::new();
    loop {
        let p = expect_production(node, "paramlist")?;
        match (p.rule, p.children.as_slice()) {
            (Rule::ParamlistOne, [dcl]) => {
                params.push(build_dcl(dcl)?);
                return Ok(params);
            }
            (Rule::ParamlistCons, [dcl, _, rest]) => {
                params.push(build_dcl(dcl)?);
                node = rest;
            }
            _ => return Err(shape("paramlist", p)),
        }
    }
}

fn build_dcl(node: &AnnotatedNode) -> Result<Declaration, TreeError> {
    let p = expect_production(node, "dcl")?;
    let (ty_node, id) = match (p.rule, p.children.as_slice()) {
        (Rule::Dcl, [ty_node, id]) => (ty_node, id),
        _ => return Err(shape("dcl type ID", p)),
    };
    let ty_prod = expect_production(ty_node, "type")?;
    let ty = match ty_prod.rule {
        Rule::TypeInt => Type::Int,
        Rule::TypeIntStar => Type::IntPtr,
        _ => return Err(shape("type", ty_prod)),
    };
    Ok(Declaration::new(&expect_terminal(id, TokenKind::Id)?.lexeme, ty))
}

/// `dcls` is left-recursive: the innermost node holds the first declaration
fn build_dcls(node: &AnnotatedNode) -> Result<Vec<LocalDecl>, TreeError> {
    let mut locals = Vec::new();
    let mut node = node;
    loop {
        let p = expect_production(node, "dcls")?;
        let (rest, dcl, value) = match (p.rule, p.children.as_slice()) {
            (Rule::DclsEmpty, []) => break,
            (Rule::DclsNum, [rest, dcl, _, value, _]) | (Rule::DclsNull, [rest, dcl, _, value, _]) => {
                (rest, dcl, value)
            }
            _ => return Err(shape("dcls", p)),
        };
        let init = match p.rule {
            Rule::DclsNum => Initializer::Num(parse_num(expect_terminal(value, TokenKind::Num)?)?),
            _ => {
                expect_terminal(value, TokenKind::Null)?;
                Initializer::Null
            }
        };
        locals.push(LocalDecl {
            decl: build_dcl(dcl)?,
            init,
        });
        node = rest;
    }
    locals.reverse();
    Ok(locals)
}

/// `statements` is left-recursive like `dcls`
fn build_statements(node: &AnnotatedNode) -> Result<Vec<Statement>, TreeError> {
    let mut statements = Vec::new();
    let mut node = node;
    loop {
        let p = expect_production(node, "statements")?;
        match (p.rule, p.children.as_slice()) {
            (Rule::StatementsEmpty, []) => break,
            (Rule::StatementsCons, [rest, statement]) => {
                statements.push(build_statement(statement)?);
                node = rest;
            }
            _ => return Err(shape("statements", p)),
        }
    }
    statements.reverse();
    Ok(statements)
}

fn build_statement(node: &AnnotatedNode) -> Result<Statement, TreeError> {
    let p = expect_production(node, "statement")?;
    let statement = match (p.rule, p.children.as_slice()) {
        (Rule::StatementAssign, [target, _, value, _]) => Statement::Assign {
            target: build_lvalue(target)?,
            value: build_expr(value)?,
        },
        (Rule::StatementIf, [_, _, test, _, _, then_branch, _, _, _, else_branch, _]) => Statement::If {
            test: build_test(test)?,
            then_branch: build_statements(then_branch)?,
            else_branch: build_statements(else_branch)?,
        },
        (Rule::StatementWhile, [_, _, test, _, _, body, _]) => Statement::While {
            test: build_test(test)?,
            body: build_statements(body)?,
        },
        (Rule::StatementPrintln, [_, _, value, _, _]) => Statement::Println(build_expr(value)?),
        (Rule::StatementPutchar, [_, _, value, _, _]) => Statement::Putchar(build_expr(value)?),
        (Rule::StatementDelete, [_, _, _, value, _]) => Statement::Delete(build_expr(value)?),
        _ => return Err(shape("statement", p)),
    };
    Ok(statement)
}

fn build_test(node: &AnnotatedNode) -> Result<Test, TreeError> {
    let p = expect_production(node, "test")?;
    let (left, right) = match p.children.as_slice() {
        [left, _, right] => (left, right),
        _ => return Err(shape("test expr OP expr", p)),
    };
    let op = match p.rule {
        Rule::TestEq => RelOp::Eq,
        Rule::TestNe => RelOp::Ne,
        Rule::TestLt => RelOp::Lt,
        Rule::TestLe => RelOp::Le,
        Rule::TestGt => RelOp::Gt,
        Rule::TestGe => RelOp::Ge,
        _ => return Err(shape("test", p)),
    };
    Ok(Test {
        op,
        left: build_expr(left)?,
        right: build_expr(right)?,
    })
}

/// Convert any `expr`, `term` or `factor` node
fn build_expr(node: &AnnotatedNode) -> Result<Expr, TreeError> {
    let p = expect_production(node, "expr")?;
    let ty = expect_type(p)?;
    let kind = match (p.rule, p.children.as_slice()) {
        (Rule::ExprTerm, [inner]) | (Rule::TermFactor, [inner]) => return build_expr(inner),

        (Rule::ExprPlus, [left, _, right]) => binary(BinaryOp::Add, left, right)?,
        (Rule::ExprMinus, [left, _, right]) => binary(BinaryOp::Sub, left, right)?,
        (Rule::TermStar, [left, _, right]) => binary(BinaryOp::Mul, left, right)?,
        (Rule::TermSlash, [left, _, right]) => binary(BinaryOp::Div, left, right)?,
        (Rule::TermPct, [left, _, right]) => binary(BinaryOp::Mod, left, right)?,

        (Rule::FactorId, [id]) => ExprKind::Var(expect_terminal(id, TokenKind::Id)?.lexeme.clone()),
        (Rule::FactorNum, [num]) => ExprKind::Num(parse_num(expect_terminal(num, TokenKind::Num)?)?),
        (Rule::FactorNull, [_]) => ExprKind::Null,
        (Rule::FactorParen, [_, inner, _]) => ExprKind::Paren(Box::new(build_expr(inner)?)),
        (Rule::FactorAmp, [_, target]) => ExprKind::AddressOf(Box::new(build_lvalue(target)?)),
        (Rule::FactorStar, [_, inner]) => ExprKind::Deref(Box::new(build_expr(inner)?)),
        (Rule::FactorNew, [_, _, _, size, _]) => ExprKind::New(Box::new(build_expr(size)?)),
        (Rule::FactorCall, [id, _, _]) => ExprKind::Call {
            callee: expect_terminal(id, TokenKind::Id)?.lexeme.clone(),
            args: Vec::new(),
        },
        (Rule::FactorCallArgs, [id, _, args, _]) => ExprKind::Call {
            callee: expect_terminal(id, TokenKind::Id)?.lexeme.clone(),
            args: build_args(args)?,
        },
        (Rule::FactorGetchar, [_, _, _]) => ExprKind::Getchar,

        _ => return Err(shape("an expression", p)),
    };
    Ok(Expr::new(kind, ty))
}

fn binary(op: BinaryOp, left: &AnnotatedNode, right: &AnnotatedNode) -> Result<ExprKind, TreeError> {
    Ok(ExprKind::Binary {
        op,
        left: Box::new(build_expr(left)?),
        right: Box::new(build_expr(right)?),
    })
}

fn build_args(node: &AnnotatedNode) -> Result<Vec<Expr>, TreeError> {
    let mut args = Vec::new();
    let mut node = node;
    loop {
        let p = expect_production(node, "arglist")?;
        match (p.rule, p.children.as_slice()) {
            (Rule::ArglistOne, [arg]) => {
                args.push(build_expr(arg)?);
                return Ok(args);
            }
            (Rule::ArglistCons, [arg, _, rest]) => {
                args.push(build_expr(arg)?);
                node = rest;
            }
            _ => return Err(shape("arglist", p)),
        }
    }
}

fn build_lvalue(node: &AnnotatedNode) -> Result<LValue, TreeError> {
    let p = expect_production(node, "lvalue")?;
    let ty = expect_type(p)?;
    match (p.rule, p.children.as_slice()) {
        (Rule::LvalueId, [id]) => Ok(LValue::Var {
            name: expect_terminal(id, TokenKind::Id)?.lexeme.clone(),
            ty,
        }),
        (Rule::LvalueStar, [_, inner]) => Ok(LValue::Deref(build_expr(inner)?)),
        (Rule::LvalueParen, [_, inner, _]) => Ok(LValue::Paren(Box::new(build_lvalue(inner)?))),
        _ => Err(shape("lvalue", p)),
    }
}

fn expect_production<'a>(node: &'a AnnotatedNode, expected: &str) -> Result<&'a Production, TreeError> {
    match node {
        AnnotatedNode::Production(p) => Ok(p),
        AnnotatedNode::Terminal(t) => Err(TreeError::UnexpectedShape {
            expected: format!("{expected} production, found terminal {}", t.kind),
            location: t.location,
        }),
    }
}

fn expect_terminal(node: &AnnotatedNode, kind: TokenKind) -> Result<&Terminal, TreeError> {
    match node {
        AnnotatedNode::Terminal(t) if t.kind == kind => Ok(t),
        other => Err(TreeError::UnexpectedSymbol {
            expected: kind.name().to_string(),
            found: other.symbol().to_string(),
            location: other.location(),
        }),
    }
}

fn expect_type(p: &Production) -> Result<Type, TreeError> {
    p.ty.ok_or_else(|| TreeError::MissingType {
        rule: p.rule.to_string(),
        location: p.location,
    })
}

/// Literals must fit a signed word; they carry no sign of their own
fn parse_num(t: &Terminal) -> Result<i32, TreeError> {
    t.lexeme
        .parse::<i32>()
        .ok()
        .filter(|value| *value >= 0)
        .ok_or_else(|| TreeError::InvalidNumber {
            lexeme: t.lexeme.clone(),
            location: t.location,
        })
}

fn shape(expected: &str, p: &Production) -> TreeError {
    TreeError::UnexpectedShape {
        expected: format!("{expected}, found '{}'", p.rule),
        location: p.location,
    }
}
