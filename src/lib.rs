pub mod address;
pub mod classify;
pub mod diag;
pub mod encode;
pub mod error;
pub mod lexer;
pub mod line;
pub mod parser;
pub mod token;
pub mod tree;

pub use address::{Base, MemRef, NormalizedAddress};
pub use classify::{classify_address_base, classify_operand, Mnemonic, Vocab, Word};
pub use diag::{Diagnostic, DiagnosticKind, DiagnosticSink, LineContext, Severity, TracingSink};
pub use encode::{evaluate, Encoder, Width, Z80Encoder};
pub use error::{AsmError, EvalError, SyntaxError, SyntaxErrorKind, TokenError};
pub use lexer::tokenize;
pub use line::{encode_line, parse_line, Encoded, LineAssembler};
pub use parser::derive;
pub use token::{Operator, Token, TokenKind};
pub use tree::{Instruction, Node, NodeKind};
