//! Annotated syntax tree
//!
//! Nodes as produced by the upstream type checker: terminals carry a token
//! kind and lexeme, productions carry their grammar rule and own their
//! children. Expression-category nodes also carry a resolved [`Type`].

use crate::rule::Rule;
use crate::token::TokenKind;
use std::fmt;
use wlp4_common::{SourceLocation, Type};

/// A leaf of the annotated tree
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    pub kind: TokenKind,
    pub lexeme: String,
    pub ty: Option<Type>,
    pub location: SourceLocation,
}

/// An interior node of the annotated tree
#[derive(Debug, Clone, PartialEq)]
pub struct Production {
    pub rule: Rule,
    pub children: Vec<AnnotatedNode>,
    pub ty: Option<Type>,
    pub location: SourceLocation,
}

/// Annotated tree node
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotatedNode {
    Terminal(Terminal),
    Production(Production),
}

impl AnnotatedNode {
    /// The grammar symbol this node stands for (token kind or rule LHS)
    pub fn symbol(&self) -> &'static str {
        match self {
            AnnotatedNode::Terminal(t) => t.kind.name(),
            AnnotatedNode::Production(p) => p.rule.lhs(),
        }
    }

    pub fn ty(&self) -> Option<Type> {
        match self {
            AnnotatedNode::Terminal(t) => t.ty,
            AnnotatedNode::Production(p) => p.ty,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            AnnotatedNode::Terminal(t) => t.location,
            AnnotatedNode::Production(p) => p.location,
        }
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            if let AnnotatedNode::Production(p) = node {
                pending.extend(p.children.iter());
            }
        }
        count
    }
}

// Statement and declaration lists are left-recursive, so a long program is a
// very deep tree. Tear it down with an explicit stack.
impl Drop for Production {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let AnnotatedNode::Production(mut p) = node {
                pending.append(&mut p.children);
            }
        }
    }
}

fn write_type(f: &mut fmt::Formatter<'_>, ty: Option<Type>) -> fmt::Result {
    match ty {
        Some(ty) => write!(f, " : {ty}"),
        None => Ok(()),
    }
}

/// Serializes the subtree back into the line-oriented input format
impl fmt::Display for AnnotatedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                AnnotatedNode::Terminal(t) => {
                    write!(f, "{} {}", t.kind, t.lexeme)?;
                    write_type(f, t.ty)?;
                }
                AnnotatedNode::Production(p) => {
                    write!(f, "{}", p.rule)?;
                    write_type(f, p.ty)?;
                    pending.extend(p.children.iter().rev());
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
