//! Token stream to syntax tree, one statement at a time.
//!
//! Fail-fast: the first problem ends the statement with a [`SyntaxError`].

use tracing::trace;

use crate::classify::{classify_address_base, classify_operand, Mnemonic};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::token::{Operator, Token, TokenKind};
use crate::tree::{Instruction, Node, NodeKind};

/// Build the instruction tree for one statement.
pub fn derive(tokens: &[Token]) -> Result<Instruction, SyntaxError> {
    let Some(first) = tokens.first() else {
        return Err(SyntaxError::new(SyntaxErrorKind::Empty, 0));
    };
    let mnemonic = match &first.kind {
        TokenKind::Identifier(name) => Mnemonic::lookup(&name.to_ascii_uppercase()),
        _ => None,
    }
    .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::ExpectedMnemonic, first.column))?;

    let mut inst = Instruction::new(mnemonic, first.column);
    let mut i = 1;
    while i < tokens.len() {
        let (node, next) = operand(tokens, i)?;
        inst.push(node);
        i = next;

        if i < tokens.len() {
            let sep = &tokens[i];
            if !sep.is_op(Operator::Comma) {
                return Err(SyntaxError::new(SyntaxErrorKind::ExpectedComma, sep.column));
            }
            i += 1;
            if i >= tokens.len() {
                return Err(SyntaxError::new(SyntaxErrorKind::DanglingComma, sep.column));
            }
        }
    }

    trace!(mnemonic = %inst.mnemonic(), operands = inst.operands().len(), "derived");
    Ok(inst)
}

/// Parse the operand starting at `tokens[i]`; returns it with the index just past it.
fn operand(tokens: &[Token], i: usize) -> Result<(Node, usize), SyntaxError> {
    let tok = &tokens[i];
    match &tok.kind {
        TokenKind::Identifier(name) => {
            let word = classify_operand(name)
                .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::UnknownOperand(name.clone()), tok.column))?;
            Ok((Node::new(word.into(), tok.column), i + 1))
        }
        TokenKind::Number(n) => Ok((Node::new(NodeKind::Immediate(*n), tok.column), i + 1)),
        TokenKind::Operator(Operator::LParen) => {
            let close = tokens[i + 1..]
                .iter()
                .position(|t| t.is_op(Operator::RParen))
                .map(|p| i + 1 + p)
                .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::UnclosedParen, tok.column))?;
            let children = address(&tokens[i + 1..close], tok.column)?;
            Ok((Node::new(NodeKind::Address(children), tok.column), close + 1))
        }
        // a sign directly before a number is part of the immediate
        TokenKind::Operator(op @ (Operator::Minus | Operator::Plus)) => match tokens.get(i + 1).map(|t| &t.kind) {
            Some(TokenKind::Number(n)) => {
                let value = if *op == Operator::Minus { n.wrapping_neg() } else { *n };
                Ok((Node::new(NodeKind::Immediate(value), tok.column), i + 2))
            }
            _ => Err(SyntaxError::new(SyntaxErrorKind::UnexpectedOperator(*op), tok.column)),
        },
        TokenKind::Operator(op) => Err(SyntaxError::new(SyntaxErrorKind::UnexpectedOperator(*op), tok.column)),
    }
}

/// Children of an address operand from the tokens strictly between the parentheses.
fn address(inner: &[Token], open_column: usize) -> Result<Vec<Node>, SyntaxError> {
    let base = |tok: &Token| -> Result<Node, SyntaxError> {
        match &tok.kind {
            TokenKind::Identifier(name) => classify_address_base(name)
                .map(|word| Node::new(word.into(), tok.column))
                .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::IllegalAddressBase(name.clone()), tok.column)),
            _ => Err(SyntaxError::new(SyntaxErrorKind::MalformedAddress, tok.column)),
        }
    };

    match inner {
        [] => Err(SyntaxError::new(SyntaxErrorKind::EmptyAddress, open_column)),
        [tok @ Token { kind: TokenKind::Number(n), .. }] => Ok(vec![Node::new(NodeKind::Immediate(*n), tok.column)]),
        [tok] => Ok(vec![base(tok)?]),
        [head, sign, disp] => {
            let head = base(head)?;
            let op = sign
                .operator()
                .filter(|op| op.is_sign())
                .ok_or_else(|| SyntaxError::new(SyntaxErrorKind::MalformedAddress, sign.column))?;
            let TokenKind::Number(n) = &disp.kind else {
                return Err(SyntaxError::new(SyntaxErrorKind::MalformedAddress, disp.column));
            };
            Ok(vec![
                head,
                Node::new(NodeKind::Operator(op), sign.column),
                Node::new(NodeKind::Immediate(*n), disp.column),
            ])
        }
        [_, extra, ..] => Err(SyntaxError::new(SyntaxErrorKind::MalformedAddress, extra.column)),
    }
}
