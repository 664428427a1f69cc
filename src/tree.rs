use serde::Serialize;
use std::fmt::Write as _;

use crate::classify::{
    Condition, IndexHalf, IndexPair, Mnemonic, NormalPair, Register, SpecialPair, SpecialRegister, Word,
};
use crate::token::Operator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Mnemonic(Mnemonic),
    Register(Register),
    SpecialRegister(SpecialRegister),
    IndexHalf(IndexHalf),
    NormalPair(NormalPair),
    SpecialPair(SpecialPair),
    IndexPair(IndexPair),
    Condition(Condition),
    Immediate(i32),
    Operator(Operator),
    /// Parenthesized operand. Children are `[Immediate]`, `[base]` or
    /// `[base, Operator(+|-), Immediate]`, in that order.
    Address(Vec<Node>),
}

/// A syntax node plus the column of the token it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub column: usize,
}

impl Node {
    pub fn new(kind: NodeKind, column: usize) -> Self {
        Self { kind, column }
    }

    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Address(children) => children,
            _ => &[],
        }
    }
}

impl From<Word> for NodeKind {
    fn from(word: Word) -> Self {
        match word {
            Word::Register(r) => NodeKind::Register(r),
            Word::SpecialRegister(r) => NodeKind::SpecialRegister(r),
            Word::IndexHalf(h) => NodeKind::IndexHalf(h),
            Word::NormalPair(p) => NodeKind::NormalPair(p),
            Word::SpecialPair(p) => NodeKind::SpecialPair(p),
            Word::IndexPair(p) => NodeKind::IndexPair(p),
            Word::Condition(c) => NodeKind::Condition(c),
        }
    }
}

/// Root of one statement: the mnemonic followed by its operands in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    mnemonic: Node,
    operands: Vec<Node>,
}

impl Instruction {
    pub fn new(mnemonic: Mnemonic, column: usize) -> Self {
        Self { mnemonic: Node::new(NodeKind::Mnemonic(mnemonic), column), operands: Vec::new() }
    }

    pub fn push(&mut self, operand: Node) {
        self.operands.push(operand);
    }

    pub fn mnemonic(&self) -> Mnemonic {
        match self.mnemonic.kind {
            NodeKind::Mnemonic(m) => m,
            _ => unreachable!("instruction root always starts with a mnemonic"),
        }
    }

    pub fn column(&self) -> usize {
        self.mnemonic.column
    }

    pub fn operands(&self) -> &[Node] {
        &self.operands
    }

    /// All children in order; the first is always the mnemonic.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        std::iter::once(&self.mnemonic).chain(self.operands.iter())
    }

    /// Indented dump of the tree, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::from("(INSTRUCTION) {\n");
        for child in self.children() {
            render_node(child, 4, &mut out);
        }
        out.push_str("}\n");
        out
    }
}

fn render_node(node: &Node, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    let _ = match &node.kind {
        NodeKind::Mnemonic(m) => writeln!(out, "{pad}(MNEMONIC) {{ {m} }}"),
        NodeKind::Register(r) => writeln!(out, "{pad}(REGISTER) {{ {r} }}"),
        NodeKind::SpecialRegister(r) => writeln!(out, "{pad}(SPECREG) {{ {r} }}"),
        NodeKind::IndexHalf(h) => writeln!(out, "{pad}(IREG) {{ {h} }}"),
        NodeKind::NormalPair(p) => writeln!(out, "{pad}(NORMPAIR) {{ {p} }}"),
        NodeKind::SpecialPair(p) => writeln!(out, "{pad}(SPECPAIR) {{ {p} }}"),
        NodeKind::IndexPair(p) => writeln!(out, "{pad}(IPAIR) {{ {p} }}"),
        NodeKind::Condition(c) => writeln!(out, "{pad}(CONDITION) {{ {c} }}"),
        NodeKind::Immediate(n) => writeln!(out, "{pad}(IMM) {{ {n} }}"),
        NodeKind::Operator(op) => writeln!(out, "{pad}(OPERATOR) {{ {op} }}"),
        NodeKind::Address(children) => {
            let _ = writeln!(out, "{pad}(ADR) {{");
            for child in children {
                render_node(child, indent + 4, out);
            }
            writeln!(out, "{pad}}}")
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_nests_address_children() {
        let mut inst = Instruction::new(Mnemonic::Add, 0);
        inst.push(Node::new(NodeKind::Register(Register::A), 4));
        inst.push(Node::new(
            NodeKind::Address(vec![
                Node::new(NodeKind::IndexPair(IndexPair::Ix), 8),
                Node::new(NodeKind::Operator(Operator::Plus), 11),
                Node::new(NodeKind::Immediate(20), 13),
            ]),
            7,
        ));
        let expected = "\
(INSTRUCTION) {
    (MNEMONIC) { ADD }
    (REGISTER) { A }
    (ADR) {
        (IPAIR) { IX }
        (OPERATOR) { + }
        (IMM) { 20 }
    }
}
";
        assert_eq!(inst.render(), expected);
        assert_eq!(inst.children().count(), 3);
    }
}
