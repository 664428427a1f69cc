use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    LParen,
    RParen,
    Plus,
    Comma,
    Colon,
    Minus,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::LParen,
        Operator::RParen,
        Operator::Plus,
        Operator::Comma,
        Operator::Colon,
        Operator::Minus,
    ];

    pub fn symbol(self) -> char {
        match self {
            Operator::LParen => '(',
            Operator::RParen => ')',
            Operator::Plus => '+',
            Operator::Comma => ',',
            Operator::Colon => ':',
            Operator::Minus => '-',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == c)
    }

    /// `+` and `-` are the only operators allowed between an address base and its displacement.
    pub fn is_sign(self) -> bool {
        matches!(self, Operator::Plus | Operator::Minus)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Operator(Operator),
    Identifier(String),
    Number(i32),
}

/// One lexical token of a source line. `column` is the byte offset of its first character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub column: usize,
}

impl Token {
    pub fn op(op: Operator, column: usize) -> Self {
        Self { kind: TokenKind::Operator(op), column }
    }

    pub fn ident(name: impl Into<String>, column: usize) -> Self {
        Self { kind: TokenKind::Identifier(name.into()), column }
    }

    pub fn number(value: i32, column: usize) -> Self {
        Self { kind: TokenKind::Number(value), column }
    }

    pub fn operator(&self) -> Option<Operator> {
        match self.kind {
            TokenKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn is_op(&self, op: Operator) -> bool {
        self.operator() == Some(op)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Operator(op) => write!(f, "OPERATOR {op}"),
            TokenKind::Identifier(name) => write!(f, "IDENTIFIER {name}"),
            TokenKind::Number(n) => write!(f, "NUMBER {n}"),
        }
    }
}
