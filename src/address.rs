use serde::Serialize;

use crate::classify::{IndexPair, NormalPair, Register};
use crate::token::Operator;
use crate::tree::{Node, NodeKind};

/// What a parenthesized operand is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Base {
    Immediate(i32),
    Register(Register),
    NormalPair(NormalPair),
    IndexPair(IndexPair),
}

/// An address operand with its optional `+d`/`-d` folded into a signed displacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedAddress {
    pub base: Base,
    pub has_displacement: bool,
    pub displacement: i32,
}

/// The two memory operands the 8-bit instruction groups share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemRef {
    /// `(HL)`
    Hl,
    /// `(IX+d)` / `(IY+d)`; a bare `(IX)` has `d = 0`.
    Indexed(IndexPair, i32),
}

impl NormalizedAddress {
    /// Fold an address node's children.
    ///
    /// # Panics
    /// On any child shape the parser never builds.
    pub fn from_children(children: &[Node]) -> Self {
        let base = match children.first().map(|n| &n.kind) {
            Some(NodeKind::Immediate(n)) => Base::Immediate(*n),
            Some(NodeKind::Register(r)) => Base::Register(*r),
            Some(NodeKind::NormalPair(p)) => Base::NormalPair(*p),
            Some(NodeKind::IndexPair(p)) => Base::IndexPair(*p),
            other => panic!("address base must be an immediate, register or pair, got {other:?}"),
        };

        match children {
            [_] => Self { base, has_displacement: false, displacement: 0 },
            [_, sign, disp] => {
                assert!(!matches!(base, Base::Immediate(_)), "immediate address with displacement");
                let (NodeKind::Operator(op), NodeKind::Immediate(n)) = (&sign.kind, &disp.kind) else {
                    panic!("displacement must be operator then immediate, got {sign:?}, {disp:?}");
                };
                let displacement = match op {
                    Operator::Plus => *n,
                    Operator::Minus => n.wrapping_neg(),
                    other => panic!("displacement operator must be + or -, got {other}"),
                };
                Self { base, has_displacement: true, displacement }
            }
            _ => panic!("address must have 1 or 3 children, got {}", children.len()),
        }
    }

    /// `(HL)` or an indexed reference, the only addresses the 8-bit ALU, INC/DEC, LD and CB groups accept.
    pub fn mem_ref(&self) -> Option<MemRef> {
        match self.base {
            Base::NormalPair(NormalPair::Hl) if !self.has_displacement => Some(MemRef::Hl),
            Base::IndexPair(ix) => Some(MemRef::Indexed(ix, self.displacement)),
            _ => None,
        }
    }

    /// Address is exactly `(pair)` with no displacement.
    pub fn is_pair(&self, pair: NormalPair) -> bool {
        self.base == Base::NormalPair(pair) && !self.has_displacement
    }

    pub fn immediate(&self) -> Option<i32> {
        match self.base {
            Base::Immediate(n) => Some(n),
            _ => None,
        }
    }
}

impl Node {
    /// Normalized form of an `Address` node; `None` for every other kind.
    pub fn address(&self) -> Option<NormalizedAddress> {
        match &self.kind {
            NodeKind::Address(children) => Some(NormalizedAddress::from_children(children)),
            _ => None,
        }
    }
}
