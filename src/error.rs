use crate::classify::Mnemonic;
use crate::token::Operator;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("unidentifiable character {ch:?} at column {column}")]
    Unexpected { ch: char, column: usize },
    #[error("malformed number {text:?} at column {column}")]
    BadNumber { text: String, column: usize },
    #[error("number {text:?} at column {column} does not fit in 32 bits")]
    NumberOutOfRange { text: String, column: usize },
}

impl TokenError {
    pub fn column(&self) -> usize {
        match self {
            TokenError::Unexpected { column, .. }
            | TokenError::BadNumber { column, .. }
            | TokenError::NumberOutOfRange { column, .. } => *column,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("empty statement")]
    Empty,
    #[error("statement must start with a mnemonic")]
    ExpectedMnemonic,
    #[error("unknown operand `{0}`")]
    UnknownOperand(String),
    #[error("unexpected operator `{0}`")]
    UnexpectedOperator(Operator),
    #[error("unmatched `(`")]
    UnclosedParen,
    #[error("expected `,` between operands")]
    ExpectedComma,
    #[error("`,` not followed by an operand")]
    DanglingComma,
    #[error("empty address")]
    EmptyAddress,
    #[error("`{0}` cannot be used inside an address")]
    IllegalAddressBase(String),
    #[error("address must be `(n)`, `(base)` or `(base+d)`")]
    MalformedAddress,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at column {column}: {kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, column: usize) -> Self {
        Self { kind, column }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("no encoding of {mnemonic} for these operands")]
    IllegalOperands { mnemonic: Mnemonic, column: usize },
    #[error("immediate {value} out of range for {mnemonic}")]
    OutOfRange { mnemonic: Mnemonic, value: i32, column: usize },
    #[error("bit index {value} is not in 0..=7")]
    BadBitIndex { value: i32, column: usize },
    #[error("restart vector {value:#x} is not a multiple of 8 in 0x00..=0x38")]
    BadRestart { value: i32, column: usize },
    #[error("interrupt mode {value} is not 0, 1 or 2")]
    BadInterruptMode { value: i32, column: usize },
}

impl EvalError {
    pub fn column(&self) -> usize {
        match self {
            EvalError::IllegalOperands { column, .. }
            | EvalError::OutOfRange { column, .. }
            | EvalError::BadBitIndex { column, .. }
            | EvalError::BadRestart { column, .. }
            | EvalError::BadInterruptMode { column, .. } => *column,
        }
    }
}

/// Any fatal failure of one source statement.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl AsmError {
    pub fn column(&self) -> usize {
        match self {
            AsmError::Token(e) => e.column(),
            AsmError::Syntax(e) => e.column,
            AsmError::Eval(e) => e.column(),
        }
    }
}
