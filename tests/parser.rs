use pretty_assertions::assert_eq;

use zasm_rs::classify::{Condition, IndexPair, NormalPair, Register};
use zasm_rs::{derive, tokenize, AsmError, Base, Instruction, NodeKind, NormalizedAddress, SyntaxErrorKind};

fn parse(src: &str) -> Instruction {
    derive(&tokenize(src).unwrap()).unwrap_or_else(|e| panic!("{src}: {e}"))
}

fn syntax_error(src: &str) -> SyntaxErrorKind {
    match derive(&tokenize(src).unwrap()) {
        Ok(inst) => panic!("{src}: parsed as {inst:?}"),
        Err(e) => e.kind,
    }
}

fn operand_kinds(src: &str) -> Vec<NodeKind> {
    parse(src).operands().iter().map(|n| n.kind.clone()).collect()
}

#[test]
fn c_is_a_register_in_operand_position() {
    assert_eq!(operand_kinds("RET C"), vec![NodeKind::Register(Register::C)]);
    assert_eq!(
        operand_kinds("JP C, 0x10"),
        vec![NodeKind::Register(Register::C), NodeKind::Immediate(0x10)]
    );
    assert_eq!(operand_kinds("RET NC"), vec![NodeKind::Condition(Condition::Nc)]);
}

#[test]
fn c_as_condition_only_in_the_condition_slot() {
    // as a condition it encodes; as a plain register operand elsewhere it stays a register
    assert_eq!(zasm_rs::encode_line("RET C").unwrap().bytes, vec![0xD8]);
    assert_eq!(zasm_rs::encode_line("INC C").unwrap().bytes, vec![0x0C]);
    assert!(matches!(zasm_rs::encode_line("RET B"), Err(AsmError::Eval(_))));
    assert!(matches!(zasm_rs::encode_line("JP Z, C"), Err(AsmError::Eval(_))));
}

#[test]
fn three_address_shapes() {
    let bare_imm = parse("LD A, (0x1234)");
    assert_eq!(
        bare_imm.operands()[1].address(),
        Some(NormalizedAddress { base: Base::Immediate(0x1234), has_displacement: false, displacement: 0 })
    );

    let bare_base = parse("LD A, (HL)");
    assert_eq!(
        bare_base.operands()[1].address(),
        Some(NormalizedAddress { base: Base::NormalPair(NormalPair::Hl), has_displacement: false, displacement: 0 })
    );

    let displaced = parse("LD A, (IY - 7)");
    assert_eq!(
        displaced.operands()[1].address(),
        Some(NormalizedAddress { base: Base::IndexPair(IndexPair::Iy), has_displacement: true, displacement: -7 })
    );

    let port = parse("IN A, (C)");
    assert_eq!(port.operands()[1].address().map(|a| a.base), Some(Base::Register(Register::C)));
}

#[test]
fn malformed_addresses_are_rejected() {
    assert_eq!(syntax_error("LD A, ()"), SyntaxErrorKind::EmptyAddress);
    assert_eq!(syntax_error("LD A, (IX+)"), SyntaxErrorKind::MalformedAddress);
    assert_eq!(syntax_error("LD A, (IX+1+2)"), SyntaxErrorKind::MalformedAddress);
    assert_eq!(syntax_error("LD A, (IX,1)"), SyntaxErrorKind::MalformedAddress);
    assert_eq!(syntax_error("LD A, (1+IX)"), SyntaxErrorKind::MalformedAddress);
    assert_eq!(syntax_error("LD A, (IX 1)"), SyntaxErrorKind::MalformedAddress);
    assert_eq!(syntax_error("JP (NZ)"), SyntaxErrorKind::IllegalAddressBase("NZ".into()));
    assert_eq!(syntax_error("LD A, (AF)"), SyntaxErrorKind::IllegalAddressBase("AF".into()));
    assert_eq!(syntax_error("LD A, (IXH)"), SyntaxErrorKind::IllegalAddressBase("IXH".into()));
    assert_eq!(syntax_error("LD A, (HL"), SyntaxErrorKind::UnclosedParen);
}

#[test]
fn operand_list_errors() {
    assert_eq!(syntax_error("LD A,"), SyntaxErrorKind::DanglingComma);
    assert_eq!(syntax_error("LD A B"), SyntaxErrorKind::ExpectedComma);
    assert_eq!(syntax_error("LD A, FOO"), SyntaxErrorKind::UnknownOperand("FOO".into()));
    assert_eq!(syntax_error("A, B"), SyntaxErrorKind::ExpectedMnemonic);
    assert_eq!(syntax_error("0x10"), SyntaxErrorKind::ExpectedMnemonic);
    assert_eq!(syntax_error("LD , A"), SyntaxErrorKind::UnexpectedOperator(zasm_rs::Operator::Comma));
    assert_eq!(syntax_error("LD A, :"), SyntaxErrorKind::UnexpectedOperator(zasm_rs::Operator::Colon));
}

#[test]
fn errors_point_at_offending_token() {
    let err = derive(&tokenize("LD A, B C").unwrap()).unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::ExpectedComma);
    assert_eq!(err.column, 8);
}

#[test]
fn mnemonic_is_first_child_and_operands_keep_order() {
    let inst = parse("SET 0, (IX+1), C");
    let kinds: Vec<&NodeKind> = inst.children().map(|n| &n.kind).collect();
    assert!(matches!(kinds[0], NodeKind::Mnemonic(zasm_rs::Mnemonic::Set)));
    assert_eq!(kinds.len(), 4);
    assert!(matches!(kinds[2], NodeKind::Address(_)));
    assert_eq!(kinds[3], &NodeKind::Register(Register::C));
}

#[test]
fn tree_dump_of_indexed_add() {
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
    assert_eq!(parse("add a, (ix+20)").render(), expected);
}

#[test]
fn tree_serializes_with_columns() {
    let v = serde_json::to_value(parse("PUSH IX")).unwrap();
    assert_eq!(
        v,
        serde_json::json!({
            "mnemonic": { "kind": { "Mnemonic": "Push" }, "column": 0 },
            "operands": [ { "kind": { "IndexPair": "Ix" }, "column": 5 } ]
        })
    );
}
