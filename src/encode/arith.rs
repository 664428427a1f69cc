use super::{Arg, Emitter, Enc, Width};
use crate::classify::{NormalPair, Register};

/// 8-bit ALU source operand; `base` is the `op A,B` opcode.
fn alu8(e: &mut Emitter<'_>, src: Arg, operand: usize, base: u8) -> Enc {
    match src {
        Arg::Reg(r) => e.byte(base | r.code()),
        Arg::Half(h) => e.bytes(&[h.pair().prefix(), base | h.field()]),
        Arg::Addr(adr) => {
            let m = e.mem_ref(&adr)?;
            e.mem(m, base | 0x06, operand);
        }
        Arg::Imm(n) => {
            e.byte(base | 0x46);
            e.imm(n, Width::U8, operand);
        }
        _ => return Err(e.illegal()),
    }
    Ok(())
}

pub(super) fn add(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    match *args {
        [Arg::Reg(Register::A), src] => return alu8(e, src, 1, 0x80),
        [Arg::Pair(NormalPair::Hl), Arg::Pair(p)] => e.byte(0x09 | p.code() << 4),
        // HL is not addressable next to IX/IY; its slot means the index pair itself
        [Arg::Index(ix), Arg::Pair(p)] if p != NormalPair::Hl => e.bytes(&[ix.prefix(), 0x09 | p.code() << 4]),
        [Arg::Index(ix), Arg::Index(other)] if ix == other => e.bytes(&[ix.prefix(), 0x29]),
        _ => return Err(e.illegal()),
    }
    Ok(())
}

/// ADC/SBC: the 8-bit group plus `HL,ss` on the ED page.
pub(super) fn with_carry(e: &mut Emitter<'_>, args: &[Arg], base: u8, pair_base: u8) -> Enc {
    match *args {
        [Arg::Reg(Register::A), src] => alu8(e, src, 1, base),
        [Arg::Pair(NormalPair::Hl), Arg::Pair(p)] => {
            e.bytes(&[0xED, pair_base | p.code() << 4]);
            Ok(())
        }
        _ => Err(e.illegal()),
    }
}

/// SUB/AND/XOR/OR/CP take `op x` or `op A,x`.
pub(super) fn alu(e: &mut Emitter<'_>, args: &[Arg], base: u8) -> Enc {
    match *args {
        [src] => alu8(e, src, 0, base),
        [Arg::Reg(Register::A), src] => alu8(e, src, 1, base),
        _ => Err(e.illegal()),
    }
}

pub(super) fn inc_dec(e: &mut Emitter<'_>, args: &[Arg], reg_base: u8, pair_base: u8) -> Enc {
    match *args {
        [Arg::Reg(r)] => e.byte(reg_base | r.code() << 3),
        [Arg::Pair(p)] => e.byte(pair_base | p.code() << 4),
        [Arg::Index(ix)] => e.bytes(&[ix.prefix(), pair_base | 0x20]),
        [Arg::Half(h)] => e.bytes(&[h.pair().prefix(), reg_base | h.field() << 3]),
        [Arg::Addr(adr)] => {
            let m = e.mem_ref(&adr)?;
            e.mem(m, reg_base | 0x30, 0);
        }
        _ => return Err(e.illegal()),
    }
    Ok(())
}
