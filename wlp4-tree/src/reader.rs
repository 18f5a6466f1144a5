//! Reader for the line-oriented annotated tree serialization
//!
//! One node per line, depth-first:
//!
//! ```text
//! factor NUM : int
//! NUM 42 : int
//! ```
//!
//! A production line names its children, so the reader knows how many lines
//! belong to each node. Nodes are assembled with an explicit stack so input
//! size never grows the call stack.

use crate::errors::TreeError;
use crate::node::{AnnotatedNode, Production, Terminal};
use crate::rule::{is_nonterminal, Rule};
use crate::token::TokenKind;
use log::{debug, trace};
use wlp4_common::{SourceLocation, Type};

const TYPE_SEPARATOR: &str = " : ";

/// A production that is still collecting its children
struct PendingProduction {
    production: Production,
    expected: Vec<&'static str>,
}

impl PendingProduction {
    fn next_expected(&self) -> Option<&'static str> {
        self.expected.get(self.production.children.len()).copied()
    }

    fn is_complete(&self) -> bool {
        self.production.children.len() == self.expected.len()
    }
}

/// Read a whole annotated tree from its serialization
pub fn read_tree(input: &str) -> Result<AnnotatedNode, TreeError> {
    let mut stack: Vec<PendingProduction> = Vec::new();
    let mut root: Option<AnnotatedNode> = None;
    let mut last_line = 0;

    for (index, raw) in input.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let location = SourceLocation::new(index as u32 + 1);
        last_line = location.line;

        if root.is_some() {
            return Err(TreeError::TrailingInput { location });
        }

        let node = parse_line(raw, location)?;
        trace!("{location}: {}", node.symbol());

        if let Some(parent) = stack.last() {
            if let Some(expected) = parent.next_expected() {
                if expected != node.symbol() {
                    return Err(TreeError::UnexpectedSymbol {
                        expected: expected.to_string(),
                        found: node.symbol().to_string(),
                        location,
                    });
                }
            }
        }

        let mut finished = match node {
            AnnotatedNode::Production(production) if production.rule.arity() > 0 => {
                let expected = production.rule.rhs();
                stack.push(PendingProduction { production, expected });
                continue;
            }
            leaf => leaf,
        };

        // Attach the finished node and close every parent it completes
        loop {
            match stack.last_mut() {
                None => {
                    root = Some(finished);
                    break;
                }
                Some(parent) => {
                    parent.production.children.push(finished);
                    if !parent.is_complete() {
                        break;
                    }
                    match stack.pop() {
                        Some(done) => finished = AnnotatedNode::Production(done.production),
                        None => break,
                    }
                }
            }
        }
    }

    match root {
        Some(tree) if stack.is_empty() => {
            debug!("Read annotated tree with {} nodes", tree.node_count());
            Ok(tree)
        }
        _ if last_line == 0 => Err(TreeError::EmptyInput),
        _ => Err(TreeError::UnexpectedEof {
            location: SourceLocation::new(last_line + 1),
        }),
    }
}

/// Parse one line into a childless node
fn parse_line(raw: &str, location: SourceLocation) -> Result<AnnotatedNode, TreeError> {
    let (body, ty) = match raw.rsplit_once(TYPE_SEPARATOR) {
        Some((body, annotation)) => {
            let ty = annotation.parse::<Type>().map_err(|_| TreeError::BadType {
                text: annotation.trim().to_string(),
                location,
            })?;
            (body, Some(ty))
        }
        None => (raw, None),
    };

    let mut symbols = body.split_whitespace();
    let first = symbols.next().ok_or(TreeError::UnexpectedShape {
        expected: "a grammar symbol".to_string(),
        location,
    })?;

    if is_nonterminal(first) {
        let rhs: Vec<&str> = symbols.collect();
        let rule = Rule::from_symbols(first, rhs.iter().copied()).ok_or_else(|| TreeError::UnknownRule {
            text: body.trim().to_string(),
            location,
        })?;
        return Ok(AnnotatedNode::Production(Production {
            rule,
            children: Vec::new(),
            ty,
            location,
        }));
    }

    let kind = first.parse::<TokenKind>().map_err(|_| TreeError::UnknownSymbol {
        symbol: first.to_string(),
        location,
    })?;
    let lexeme = match body.trim_start().split_once(char::is_whitespace) {
        Some((_, rest)) if !rest.trim().is_empty() => rest.trim().to_string(),
        _ if kind.is_sentinel() => kind.name().to_string(),
        _ => {
            return Err(TreeError::MissingLexeme {
                kind: kind.name().to_string(),
                location,
            })
        }
    };

    Ok(AnnotatedNode::Terminal(Terminal {
        kind,
        lexeme,
        ty,
        location,
    }))
}
