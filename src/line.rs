//! One source line through lex, parse and encode.

use serde::Serialize;
use tracing::debug;

use crate::diag::{Diagnostic, DiagnosticSink, LineContext};
use crate::encode::{Encoder, Z80Encoder};
use crate::error::AsmError;
use crate::lexer::tokenize;
use crate::parser::derive;
use crate::tree::Instruction;

/// Lex and parse `text`. Blank and comment-only lines are `Ok(None)`.
pub fn parse_line(text: &str) -> Result<Option<Instruction>, AsmError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    Ok(Some(derive(&tokens)?))
}

/// Reusable per-line driver owning the output buffer.
#[derive(Debug, Default)]
pub struct LineAssembler<E: Encoder = Z80Encoder> {
    encoder: E,
    buf: Vec<u8>,
}

impl LineAssembler<Z80Encoder> {
    pub fn new() -> Self {
        Self::with_encoder(Z80Encoder)
    }
}

impl<E: Encoder> LineAssembler<E> {
    pub fn with_encoder(encoder: E) -> Self {
        Self { encoder, buf: Vec::with_capacity(4) }
    }

    /// Assemble `text` as line number `line`. The buffer is cleared first and stays empty on error.
    pub fn assemble(&mut self, line: usize, text: &str, sink: &mut dyn DiagnosticSink) -> Result<&[u8], AsmError> {
        self.buf.clear();
        let Some(inst) = parse_line(text)? else {
            return Ok(&self.buf);
        };
        debug!(line, tree = ?inst, "parsed");

        let mut ctx = LineContext::new(line, sink);
        self.encoder.encode(&inst, &mut ctx, &mut self.buf)?;
        Ok(&self.buf)
    }

    /// Bytes of the last successful line.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Bytes of a single line plus the overflow warnings raised while encoding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub warnings: Vec<Diagnostic>,
}

/// Assemble a lone line (numbered 1) with a fresh assembler.
pub fn encode_line(text: &str) -> Result<Encoded, AsmError> {
    let mut warnings: Vec<Diagnostic> = Vec::new();
    let bytes = LineAssembler::new().assemble(1, text, &mut warnings)?.to_vec();
    Ok(Encoded { bytes, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;

    #[test]
    fn comment_only_line_is_empty() {
        let enc = encode_line("   ; nothing here").unwrap();
        assert!(enc.bytes.is_empty());
        assert!(enc.warnings.is_empty());
    }

    #[test]
    fn buffer_is_reset_between_lines() {
        let mut asm = LineAssembler::new();
        let mut sink: Vec<Diagnostic> = Vec::new();
        assert_eq!(asm.assemble(1, "LD BC, 0x1234", &mut sink).unwrap(), &[0x01, 0x34, 0x12]);
        let err = asm.assemble(2, "PUSH SP", &mut sink).unwrap_err();
        assert!(matches!(err, AsmError::Eval(EvalError::IllegalOperands { .. })));
        assert!(asm.bytes().is_empty());
        assert_eq!(asm.assemble(3, "nop", &mut sink).unwrap(), &[0x00]);
    }

    #[test]
    fn warnings_carry_line_number() {
        let mut asm = LineAssembler::new();
        let mut sink: Vec<Diagnostic> = Vec::new();
        asm.assemble(7, "JR 200", &mut sink).unwrap();
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].line, 7);
        assert_eq!(sink[0].column, 3);
    }
}
