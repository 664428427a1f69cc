use serde::Serialize;
use std::fmt;

use crate::error::AsmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    Token,
    Syntax,
    Evaluation,
    Overflow,
}

/// A structured report about one source line. Presentation is up to the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn overflow(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { kind: DiagnosticKind::Overflow, severity: Severity::Warning, line, column, message: message.into() }
    }

    pub fn from_error(line: usize, err: &AsmError) -> Self {
        let kind = match err {
            AsmError::Token(_) => DiagnosticKind::Token,
            AsmError::Syntax(_) => DiagnosticKind::Syntax,
            AsmError::Eval(_) => DiagnosticKind::Evaluation,
        };
        Self { kind, severity: Severity::Error, line, column: err.column(), message: err.to_string() }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sev = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{sev} at {}:{}: {}", self.line, self.column, self.message)
    }
}

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards every diagnostic to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, d: Diagnostic) {
        match d.severity {
            Severity::Warning => tracing::warn!(line = d.line, column = d.column, kind = ?d.kind, "{}", d.message),
            Severity::Error => tracing::error!(line = d.line, column = d.column, kind = ?d.kind, "{}", d.message),
        }
    }
}

/// Per-statement state threaded through encoding: where we are and who hears about warnings.
pub struct LineContext<'s> {
    pub line: usize,
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s> LineContext<'s> {
    pub fn new(line: usize, sink: &'s mut dyn DiagnosticSink) -> Self {
        Self { line, sink }
    }

    pub fn warn_overflow(&mut self, column: usize, message: impl Into<String>) {
        let d = Diagnostic::overflow(self.line, column, message);
        self.sink.report(d);
    }
}
