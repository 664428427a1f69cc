//! Syntax tree to Z80 machine code.
//!
//! Dispatch is on the mnemonic first, then on the operand-kind pattern, using
//! slice patterns over [`Arg`]. Anything a mnemonic's table does not list is an
//! [`EvalError`], and the output buffer is left empty.

use std::fmt;
use std::ops::RangeInclusive;

use tracing::{debug, trace};

use crate::address::{MemRef, NormalizedAddress};
use crate::classify::{
    Condition, IndexHalf, IndexPair, Mnemonic, NormalPair, Register, SpecialPair, SpecialRegister,
};
use crate::diag::LineContext;
use crate::error::EvalError;
use crate::tree::{Instruction, Node, NodeKind};

mod arith;
mod bits;
mod flow;
mod io;
mod load;

/// Pluggable instruction encoder. `out` is cleared first and is empty again on error.
pub trait Encoder {
    fn encode(&self, inst: &Instruction, ctx: &mut LineContext<'_>, out: &mut Vec<u8>) -> Result<(), EvalError>;
}

/// Encoder for the documented Z80 instruction set plus the IXH/IXL/IYH/IYL forms.
#[derive(Debug, Default, Clone, Copy)]
pub struct Z80Encoder;

impl Z80Encoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for Z80Encoder {
    fn encode(&self, inst: &Instruction, ctx: &mut LineContext<'_>, out: &mut Vec<u8>) -> Result<(), EvalError> {
        out.clear();
        let mut e = Emitter::new(inst, out);
        let args = match inst.operands().iter().map(Arg::from_node).collect::<Option<Vec<_>>>() {
            Some(args) => args,
            None => return Err(e.illegal()),
        };

        if let Err(err) = dispatch(&mut e, &args) {
            debug!(line = ctx.line, mnemonic = %inst.mnemonic(), error = %err, "encode failed");
            e.out.clear();
            return Err(err);
        }

        trace!(line = ctx.line, mnemonic = %inst.mnemonic(), bytes = ?e.out, "encoded");
        // warnings only surface once the whole instruction encoded
        for (column, message) in e.warnings {
            ctx.warn_overflow(column, message);
        }
        Ok(())
    }
}

/// Encode into a fresh buffer.
pub fn evaluate(inst: &Instruction, ctx: &mut LineContext<'_>) -> Result<Vec<u8>, EvalError> {
    let mut out = Vec::with_capacity(4);
    Z80Encoder.encode(inst, ctx, &mut out)?;
    Ok(out)
}

/// Declared range of an immediate field. Values outside warn, then get truncated to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// 8-bit data; negatives down to -128 are accepted as two's complement.
    U8,
    /// Displacements and relative jumps.
    S8,
    /// Addresses and 16-bit data, little-endian.
    W16,
}

impl Width {
    pub fn range(self) -> RangeInclusive<i32> {
        match self {
            Width::U8 => -0x80..=0xFF,
            Width::S8 => -0x80..=0x7F,
            Width::W16 => -0x8000..=0xFFFF,
        }
    }

    pub fn fits(self, value: i32) -> bool {
        self.range().contains(&value)
    }

    /// Field bytes for `value`, low byte first.
    pub fn truncate(self, value: i32) -> Vec<u8> {
        match self {
            Width::U8 | Width::S8 => vec![value as u8],
            Width::W16 => (value as u16).to_le_bytes().to_vec(),
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Width::U8 => "8-bit immediate",
            Width::S8 => "signed 8-bit offset",
            Width::W16 => "16-bit immediate",
        })
    }
}

/// Operand view the encoding tables match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arg {
    Reg(Register),
    Special(SpecialRegister),
    Half(IndexHalf),
    Pair(NormalPair),
    SpecialPair(SpecialPair),
    Index(IndexPair),
    Cond(Condition),
    Imm(i32),
    Addr(NormalizedAddress),
}

impl Arg {
    fn from_node(node: &Node) -> Option<Self> {
        Some(match &node.kind {
            NodeKind::Register(r) => Arg::Reg(*r),
            NodeKind::SpecialRegister(r) => Arg::Special(*r),
            NodeKind::IndexHalf(h) => Arg::Half(*h),
            NodeKind::NormalPair(p) => Arg::Pair(*p),
            NodeKind::SpecialPair(p) => Arg::SpecialPair(*p),
            NodeKind::IndexPair(p) => Arg::Index(*p),
            NodeKind::Condition(c) => Arg::Cond(*c),
            NodeKind::Immediate(n) => Arg::Imm(*n),
            NodeKind::Address(_) => Arg::Addr(node.address()?),
            NodeKind::Mnemonic(_) | NodeKind::Operator(_) => return None,
        })
    }

    /// Condition slot of JP/JR/CALL/RET. `C` reaches here as a register.
    fn condition(self) -> Option<Condition> {
        match self {
            Arg::Cond(c) => Some(c),
            Arg::Reg(Register::C) => Some(Condition::C),
            _ => None,
        }
    }
}

type Enc = Result<(), EvalError>;

struct Emitter<'a> {
    out: &'a mut Vec<u8>,
    mnemonic: Mnemonic,
    column: usize,
    columns: Vec<usize>,
    warnings: Vec<(usize, String)>,
}

impl<'a> Emitter<'a> {
    fn new(inst: &Instruction, out: &'a mut Vec<u8>) -> Self {
        Self {
            out,
            mnemonic: inst.mnemonic(),
            column: inst.column(),
            columns: inst.operands().iter().map(|n| n.column).collect(),
            warnings: Vec::new(),
        }
    }

    fn col(&self, operand: usize) -> usize {
        self.columns.get(operand).copied().unwrap_or(self.column)
    }

    fn illegal(&self) -> EvalError {
        EvalError::IllegalOperands { mnemonic: self.mnemonic, column: self.column }
    }

    fn out_of_range(&self, value: i32, operand: usize) -> EvalError {
        EvalError::OutOfRange { mnemonic: self.mnemonic, value, column: self.col(operand) }
    }

    fn byte(&mut self, b: u8) {
        self.out.push(b);
    }

    fn bytes(&mut self, bs: &[u8]) {
        self.out.extend_from_slice(bs);
    }

    /// Emit `value` as a `width` field taken from operand `operand`.
    fn imm(&mut self, value: i32, width: Width, operand: usize) {
        if !width.fits(value) {
            let message = format!("{value} overflows {width} of {}", self.mnemonic);
            self.warnings.push((self.col(operand), message));
        }
        self.out.extend(width.truncate(value));
    }

    fn disp(&mut self, d: i32, operand: usize) {
        self.imm(d, Width::S8, operand);
    }

    fn word(&mut self, nn: i32, operand: usize) {
        self.imm(nn, Width::W16, operand);
    }

    /// Operand-less opcode.
    fn fixed(&mut self, args: &[Arg], code: &[u8]) -> Enc {
        if !args.is_empty() {
            return Err(self.illegal());
        }
        self.bytes(code);
        Ok(())
    }

    /// `op` on `(HL)`, or `prefix op d` on `(IX+d)`.
    fn mem(&mut self, m: MemRef, op: u8, operand: usize) {
        match m {
            MemRef::Hl => self.byte(op),
            MemRef::Indexed(ix, d) => {
                self.bytes(&[ix.prefix(), op]);
                self.disp(d, operand);
            }
        }
    }

    /// CB page on memory. The indexed form puts the displacement before the opcode.
    fn cb_mem(&mut self, m: MemRef, op: u8, operand: usize) {
        match m {
            MemRef::Hl => self.bytes(&[0xCB, op]),
            MemRef::Indexed(ix, d) => self.cb_indexed(ix, d, op, operand),
        }
    }

    fn cb_indexed(&mut self, ix: IndexPair, d: i32, op: u8, operand: usize) {
        self.bytes(&[ix.prefix(), 0xCB]);
        self.disp(d, operand);
        self.byte(op);
    }

    fn mem_ref(&self, adr: &NormalizedAddress) -> Result<MemRef, EvalError> {
        adr.mem_ref().ok_or_else(|| self.illegal())
    }
}

fn dispatch(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    use Mnemonic::*;
    match e.mnemonic {
        Nop => e.fixed(args, &[0x00]),
        Halt => e.fixed(args, &[0x76]),
        Daa => e.fixed(args, &[0x27]),
        Cpl => e.fixed(args, &[0x2F]),
        Ccf => e.fixed(args, &[0x3F]),
        Scf => e.fixed(args, &[0x37]),
        Di => e.fixed(args, &[0xF3]),
        Ei => e.fixed(args, &[0xFB]),
        Exx => e.fixed(args, &[0xD9]),
        Rlca => e.fixed(args, &[0x07]),
        Rrca => e.fixed(args, &[0x0F]),
        Rla => e.fixed(args, &[0x17]),
        Rra => e.fixed(args, &[0x1F]),

        Neg => e.fixed(args, &[0xED, 0x44]),
        Retn => e.fixed(args, &[0xED, 0x45]),
        Reti => e.fixed(args, &[0xED, 0x4D]),
        Rrd => e.fixed(args, &[0xED, 0x67]),
        Rld => e.fixed(args, &[0xED, 0x6F]),
        Ldi => e.fixed(args, &[0xED, 0xA0]),
        Cpi => e.fixed(args, &[0xED, 0xA1]),
        Ini => e.fixed(args, &[0xED, 0xA2]),
        Outi => e.fixed(args, &[0xED, 0xA3]),
        Ldd => e.fixed(args, &[0xED, 0xA8]),
        Cpd => e.fixed(args, &[0xED, 0xA9]),
        Ind => e.fixed(args, &[0xED, 0xAA]),
        Outd => e.fixed(args, &[0xED, 0xAB]),
        Ldir => e.fixed(args, &[0xED, 0xB0]),
        Cpir => e.fixed(args, &[0xED, 0xB1]),
        Inir => e.fixed(args, &[0xED, 0xB2]),
        Outir => e.fixed(args, &[0xED, 0xB3]),
        Lddr => e.fixed(args, &[0xED, 0xB8]),
        Cpdr => e.fixed(args, &[0xED, 0xB9]),
        Indr => e.fixed(args, &[0xED, 0xBA]),
        Outdr => e.fixed(args, &[0xED, 0xBB]),

        Ld => load::ld(e, args),
        Push => load::push_pop(e, args, 0xC5),
        Pop => load::push_pop(e, args, 0xC1),
        Ex => load::ex(e, args),

        Add => arith::add(e, args),
        Adc => arith::with_carry(e, args, 0x88, 0x4A),
        Sbc => arith::with_carry(e, args, 0x98, 0x42),
        Sub => arith::alu(e, args, 0x90),
        And => arith::alu(e, args, 0xA0),
        Xor => arith::alu(e, args, 0xA8),
        Or => arith::alu(e, args, 0xB0),
        Cp => arith::alu(e, args, 0xB8),
        Inc => arith::inc_dec(e, args, 0x04, 0x03),
        Dec => arith::inc_dec(e, args, 0x05, 0x0B),

        Rlc => bits::rotate(e, args, 0x00),
        Rrc => bits::rotate(e, args, 0x08),
        Rl => bits::rotate(e, args, 0x10),
        Rr => bits::rotate(e, args, 0x18),
        Sla => bits::rotate(e, args, 0x20),
        Sra => bits::rotate(e, args, 0x28),
        Srl => bits::rotate(e, args, 0x38),
        Bit => bits::bit(e, args, 0x40),
        Res => bits::bit(e, args, 0x80),
        Set => bits::bit(e, args, 0xC0),

        Jp => flow::jp(e, args),
        Jr => flow::jr(e, args),
        Djnz => flow::djnz(e, args),
        Call => flow::call(e, args),
        Ret => flow::ret(e, args),
        Rst => flow::rst(e, args),

        Im => io::im(e, args),
        In => io::input(e, args),
        Out => io::output(e, args),
    }
}
