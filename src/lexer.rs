use crate::error::TokenError;
use crate::token::{Operator, Token};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Split one source line into tokens. A `;` starts a comment that runs to end of line.
pub fn tokenize(line: &str) -> Result<Vec<Token>, TokenError> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if c == ';' {
            break;
        }

        let start = i;
        if is_ident_start(c) {
            while i < bytes.len() && is_ident_char(bytes[i] as char) {
                i += 1;
            }
            // AF' is the one identifier with a quote in it
            if i < bytes.len() && bytes[i] == b'\'' && line[start..i].eq_ignore_ascii_case("AF") {
                i += 1;
            }
            tokens.push(Token::ident(&line[start..i], start));
        } else if c.is_ascii_digit() {
            while i < bytes.len() && is_ident_char(bytes[i] as char) {
                i += 1;
            }
            let text = &line[start..i];
            tokens.push(Token::number(parse_number(text, start)?, start));
        } else if let Some(op) = Operator::from_symbol(c) {
            tokens.push(Token::op(op, start));
            i += 1;
        } else {
            let ch = line[start..].chars().next().unwrap_or(c);
            return Err(TokenError::Unexpected { ch, column: start });
        }
    }

    Ok(tokens)
}

fn parse_number(text: &str, column: usize) -> Result<i32, TokenError> {
    let (digits, radix) = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(oct) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        (oct, 8)
    } else {
        (text, 10)
    };

    let bad = || TokenError::BadNumber { text: text.to_string(), column };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(bad());
    }
    // digits are validated, so the only failure left is overflow
    i32::from_str_radix(digits, radix).map_err(|_| TokenError::NumberOutOfRange { text: text.to_string(), column })
}
