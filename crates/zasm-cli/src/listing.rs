use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use zasm_rs::{Diagnostic, LineAssembler, Severity};

/// What to do with the rest of the file once a line fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    Stop,
    KeepGoing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub line: usize,
    /// Running byte offset from the start of the file.
    pub address: u32,
    pub bytes: Vec<u8>,
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Listing {
    pub entries: Vec<ListingEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Listing {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// All emitted bytes back to back.
    pub fn image(&self) -> Vec<u8> {
        self.entries.iter().flat_map(|e| e.bytes.iter().copied()).collect()
    }

    pub fn render(&self, show_bytes: bool) -> String {
        let mut buf = String::new();
        for e in &self.entries {
            let _ = write!(buf, "{:04X}  ", e.address);
            if show_bytes {
                let hex: Vec<String> = e.bytes.iter().map(|b| format!("{b:02X}")).collect();
                let _ = write!(buf, "{:<12} ", hex.join(" "));
            }
            let _ = writeln!(buf, "{}", e.source.trim_end());
        }
        buf
    }
}

/// Assemble every line of `source`. Line numbers start at 1.
pub fn assemble_source(source: &str, policy: ErrorPolicy) -> Listing {
    let mut asm = LineAssembler::new();
    let mut listing = Listing::default();
    let mut address = 0u32;

    for (idx, text) in source.lines().enumerate() {
        let line = idx + 1;
        let result = asm.assemble(line, text, &mut listing.diagnostics).map(<[u8]>::to_vec);
        match result {
            Ok(bytes) => {
                let len = bytes.len() as u32;
                listing.entries.push(ListingEntry { line, address, bytes, source: text.to_string() });
                address = address.wrapping_add(len);
            }
            Err(err) => {
                listing.diagnostics.push(Diagnostic::from_error(line, &err));
                if policy == ErrorPolicy::Stop {
                    break;
                }
            }
        }
    }
    listing
}

pub fn assemble_file(path: &Path, policy: ErrorPolicy) -> Result<Listing> {
    let source = std::fs::read_to_string(path)?;
    Ok(assemble_source(&source, policy))
}
