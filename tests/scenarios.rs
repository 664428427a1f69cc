use pretty_assertions::assert_eq;

use zasm_rs::{
    encode_line, evaluate, parse_line, AsmError, Diagnostic, DiagnosticKind, Encoder, EvalError, Instruction,
    LineAssembler, LineContext, Mnemonic, Severity, Z80Encoder,
};

fn bytes(src: &str) -> Vec<u8> {
    encode_line(src).unwrap_or_else(|e| panic!("{src}: {e}")).bytes
}

fn eval_error(src: &str) -> EvalError {
    match encode_line(src) {
        Err(AsmError::Eval(e)) => e,
        other => panic!("{src}: expected evaluation error, got {other:?}"),
    }
}

#[test]
fn end_to_end_lines() {
    assert_eq!(bytes("NOP"), vec![0x00]);
    assert_eq!(bytes("LD A, 0x10"), vec![0x3E, 0x10]);
    assert_eq!(bytes("ADD A, (IX+20)"), vec![0xDD, 0x86, 0x14]);
    assert_eq!(bytes("PUSH HL"), vec![0xE5]);
    assert_eq!(bytes("BIT 3, (HL)"), vec![0xCB, 0x5E]);
    assert_eq!(bytes("JR NZ, -2"), vec![0x20, 0xFE]);
}

#[test]
fn pair_arithmetic_needs_a_pair() {
    assert_eq!(eval_error("ADD HL, A"), EvalError::IllegalOperands { mnemonic: Mnemonic::Add, column: 0 });
}

#[test]
fn overflowing_alu_immediate_warns_and_truncates() {
    let enc = encode_line("ADD A, 300").unwrap();
    assert_eq!(enc.bytes, vec![0xC6, 0x2C]);
    assert_eq!(enc.warnings.len(), 1);
    let w = &enc.warnings[0];
    assert_eq!((w.kind, w.severity, w.line, w.column), (DiagnosticKind::Overflow, Severity::Warning, 1, 7));
}

#[test]
fn truncation_is_idempotent() {
    let cases = [
        ("ADD A, 300", "ADD A, 44"),
        ("LD (IX+200), B", "LD (IX-56), B"),
        ("JR -129", "JR 127"),
        ("LD BC, 0x12345", "LD BC, 0x2345"),
        ("JP -32769", "JP 0x7FFF"),
        ("OUT (0x1FE), A", "OUT (0xFE), A"),
        ("LD (HL), 257", "LD (HL), 1"),
    ];
    for (wide, narrow) in cases {
        let a = encode_line(wide).unwrap();
        let b = encode_line(narrow).unwrap();
        assert_eq!(a.bytes, b.bytes, "{wide} vs {narrow}");
        assert_eq!(a.warnings.len(), 1, "{wide} should warn");
        assert!(b.warnings.is_empty(), "{narrow} should not warn");
    }
}

#[test]
fn boundary_values_do_not_warn() {
    for src in ["ADD A, 255", "ADD A, -128", "JR 127", "JR -128", "LD HL, 65535", "LD HL, -32768"] {
        assert!(encode_line(src).unwrap().warnings.is_empty(), "{src}");
    }
}

#[test]
fn register_immediate_load_is_range_checked() {
    assert_eq!(
        eval_error("LD A, 256"),
        EvalError::OutOfRange { mnemonic: Mnemonic::Ld, value: 256, column: 6 }
    );
    assert!(matches!(eval_error("LD B, -129"), EvalError::OutOfRange { value: -129, .. }));
    assert_eq!(bytes("LD B, -128"), vec![0x06, 0x80]);
}

#[test]
fn numeric_constraints() {
    assert_eq!(eval_error("BIT 8, A"), EvalError::BadBitIndex { value: 8, column: 4 });
    assert!(matches!(eval_error("SET -1, (HL)"), EvalError::BadBitIndex { value: -1, .. }));
    assert_eq!(eval_error("RST 0x09"), EvalError::BadRestart { value: 9, column: 4 });
    assert!(matches!(eval_error("RST 0x40"), EvalError::BadRestart { .. }));
    assert_eq!(eval_error("IM 3"), EvalError::BadInterruptMode { value: 3, column: 3 });
}

#[test]
fn illegal_combinations() {
    let cases = [
        "NOP A",
        "LD A",
        "LD (HL), (HL)",
        "LD B, (BC)",
        "LD (DE), B",
        "LD H, IXL",
        "LD IXH, IYL",
        "LD IXL, (IX+1)",
        "LD I, B",
        "LD (HL+1), A",
        "LD (C), A",
        "PUSH SP",
        "POP AF'",
        "EX HL, DE",
        "EX (HL), IX",
        "ADD IX, HL",
        "ADD IX, IY",
        "ADD B, C",
        "ADC IX, BC",
        "SBC A",
        "SUB HL",
        "INC AF",
        "INC (BC)",
        "RLC (0x10)",
        "SRL IX",
        "BIT A, 3",
        "BIT 3",
        "RES 1, (HL), B",
        "JP (BC)",
        "JP (IX+2)",
        "JR PO, 2",
        "JR (HL)",
        "DJNZ NZ, 1",
        "CALL (HL)",
        "RET NZ, 1",
        "RST A",
        "IM A",
        "IN B, (0xFE)",
        "IN A, (HL)",
        "OUT (C), 1",
        "OUT (C+1), A",
    ];
    for src in cases {
        assert!(matches!(eval_error(src), EvalError::IllegalOperands { .. }), "{src}");
    }
}

#[test]
fn failure_leaves_no_partial_bytes() {
    let mut asm = LineAssembler::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    asm.assemble(1, "LD IX, 0x1234", &mut sink).unwrap();
    assert!(asm.assemble(2, "LD (IX+1), (HL)", &mut sink).is_err());
    assert!(asm.bytes().is_empty());
    assert!(asm.assemble(3, "BIT 9, (IX+1)", &mut sink).is_err());
    assert!(asm.bytes().is_empty());
    assert!(sink.is_empty());
}

#[test]
fn warnings_of_failed_lines_are_dropped() {
    let mut asm = LineAssembler::new();
    let mut sink: Vec<Diagnostic> = Vec::new();
    assert!(asm.assemble(1, "JR PO, 300", &mut sink).is_err());
    assert!(sink.is_empty());
}

#[test]
fn syntax_and_token_errors_surface_as_asm_errors() {
    assert!(matches!(encode_line("LD A, #1"), Err(AsmError::Token(_))));
    assert!(matches!(encode_line("LD A, (IX+"), Err(AsmError::Syntax(_))));
    let err = encode_line("LD A, (IX+").unwrap_err();
    let d = Diagnostic::from_error(4, &err);
    assert_eq!((d.kind, d.severity, d.line), (DiagnosticKind::Syntax, Severity::Error, 4));
}

struct NopPadded;

impl Encoder for NopPadded {
    fn encode(&self, inst: &Instruction, ctx: &mut LineContext<'_>, out: &mut Vec<u8>) -> Result<(), EvalError> {
        Z80Encoder.encode(inst, ctx, out)?;
        out.push(0x00);
        Ok(())
    }
}

#[test]
fn custom_encoder_plugs_into_line_assembler() {
    let mut asm = LineAssembler::with_encoder(NopPadded);
    let mut sink: Vec<Diagnostic> = Vec::new();
    assert_eq!(asm.assemble(1, "EX DE, HL", &mut sink).unwrap(), &[0xEB, 0x00]);
    assert!(asm.assemble(2, "EX HL, DE", &mut sink).is_err());
}

#[test]
fn evaluate_reports_through_context() {
    let inst = parse_line("LD BC, 70000").unwrap().unwrap();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let mut ctx = LineContext::new(12, &mut sink);
    assert_eq!(evaluate(&inst, &mut ctx).unwrap(), vec![0x01, 0x70, 0x11]);
    assert_eq!(sink.len(), 1);
    assert_eq!((sink[0].line, sink[0].column), (12, 7));
}
