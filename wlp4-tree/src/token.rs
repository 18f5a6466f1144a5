//! Terminal symbol definitions
//!
//! Token kinds exactly as the upstream scanner names them in the tree
//! serialization (`ID`, `NUM`, `LPAREN`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// WLP4 terminal kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Sentinels
    Bof,
    Eof,

    // Literals and names
    Num,
    Id,

    // Keywords
    Int,
    Wain,
    Return,
    If,
    Else,
    While,
    Println,
    Putchar,
    Getchar,
    New,
    Delete,
    Null,

    // Operators
    Becomes,    // =
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Pct,        // %
    Amp,        // &
    Eq,         // ==
    Ne,         // !=
    Lt,         // <
    Le,         // <=
    Gt,         // >
    Ge,         // >=

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBrack,
    RBrack,
    Comma,
    Semi,
}

impl TokenKind {
    /// Every terminal kind, in serialization-name order of the grammar
    pub const ALL: [TokenKind; 37] = [
        TokenKind::Bof, TokenKind::Eof, TokenKind::Num, TokenKind::Id,
        TokenKind::Int, TokenKind::Wain, TokenKind::Return, TokenKind::If,
        TokenKind::Else, TokenKind::While, TokenKind::Println, TokenKind::Putchar,
        TokenKind::Getchar, TokenKind::New, TokenKind::Delete, TokenKind::Null,
        TokenKind::Becomes, TokenKind::Plus, TokenKind::Minus, TokenKind::Star,
        TokenKind::Slash, TokenKind::Pct, TokenKind::Amp, TokenKind::Eq,
        TokenKind::Ne, TokenKind::Lt, TokenKind::Le, TokenKind::Gt,
        TokenKind::Ge, TokenKind::LParen, TokenKind::RParen, TokenKind::LBrace,
        TokenKind::RBrace, TokenKind::LBrack, TokenKind::RBrack, TokenKind::Comma,
        TokenKind::Semi,
    ];

    /// The name used in the tree serialization
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Bof => "BOF",
            TokenKind::Eof => "EOF",
            TokenKind::Num => "NUM",
            TokenKind::Id => "ID",
            TokenKind::Int => "INT",
            TokenKind::Wain => "WAIN",
            TokenKind::Return => "RETURN",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Println => "PRINTLN",
            TokenKind::Putchar => "PUTCHAR",
            TokenKind::Getchar => "GETCHAR",
            TokenKind::New => "NEW",
            TokenKind::Delete => "DELETE",
            TokenKind::Null => "NULL",
            TokenKind::Becomes => "BECOMES",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Pct => "PCT",
            TokenKind::Amp => "AMP",
            TokenKind::Eq => "EQ",
            TokenKind::Ne => "NE",
            TokenKind::Lt => "LT",
            TokenKind::Le => "LE",
            TokenKind::Gt => "GT",
            TokenKind::Ge => "GE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBrack => "LBRACK",
            TokenKind::RBrack => "RBRACK",
            TokenKind::Comma => "COMMA",
            TokenKind::Semi => "SEMI",
        }
    }

    /// `BOF`/`EOF` may be serialized without a lexeme
    pub fn is_sentinel(&self) -> bool {
        matches!(self, TokenKind::Bof | TokenKind::Eof)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TokenKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown token kind '{s}'"))
    }
}
