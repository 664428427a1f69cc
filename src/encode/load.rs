use super::{Arg, Emitter, Enc, Width};
use crate::address::{MemRef, NormalizedAddress};
use crate::classify::{NormalPair, Register, SpecialPair, SpecialRegister};

fn is_hl_half(r: Register) -> bool {
    matches!(r, Register::H | Register::L)
}

pub(super) fn ld(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    use Arg::*;
    match *args {
        [Reg(dst), Reg(src)] => e.byte(0x40 | dst.code() << 3 | src.code()),
        [Reg(dst), Imm(n)] => {
            // the one immediate that is range-checked instead of truncated
            if !Width::U8.fits(n) {
                return Err(e.out_of_range(n, 1));
            }
            e.byte(0x06 | dst.code() << 3);
            e.imm(n, Width::U8, 1);
        }
        [Reg(dst), Addr(adr)] => load_reg(e, dst, &adr)?,
        [Reg(dst), Half(h)] if !is_hl_half(dst) => e.bytes(&[h.pair().prefix(), 0x40 | dst.code() << 3 | h.field()]),
        [Reg(Register::A), Special(sr)] => e.bytes(&[0xED, if sr == SpecialRegister::I { 0x57 } else { 0x5F }]),
        [Special(sr), Reg(Register::A)] => e.bytes(&[0xED, if sr == SpecialRegister::I { 0x47 } else { 0x4F }]),

        [Half(h), Imm(n)] => {
            e.bytes(&[h.pair().prefix(), 0x06 | h.field() << 3]);
            e.imm(n, Width::U8, 1);
        }
        [Half(h), Reg(src)] if !is_hl_half(src) => e.bytes(&[h.pair().prefix(), 0x40 | h.field() << 3 | src.code()]),
        [Half(dst), Half(src)] if dst.pair() == src.pair() => {
            e.bytes(&[dst.pair().prefix(), 0x40 | dst.field() << 3 | src.field()])
        }

        [Addr(adr), Reg(src)] => store_reg(e, &adr, src)?,
        [Addr(adr), Imm(n)] => match e.mem_ref(&adr)? {
            MemRef::Hl => {
                e.byte(0x36);
                e.imm(n, Width::U8, 1);
            }
            MemRef::Indexed(ix, d) => {
                e.bytes(&[ix.prefix(), 0x36]);
                e.disp(d, 0);
                e.imm(n, Width::U8, 1);
            }
        },
        [Addr(adr), Pair(p)] => {
            let nn = adr.immediate().ok_or_else(|| e.illegal())?;
            match p {
                NormalPair::Hl => e.byte(0x22),
                _ => e.bytes(&[0xED, 0x43 | p.code() << 4]),
            }
            e.word(nn, 0);
        }
        [Addr(adr), Index(ix)] => {
            let nn = adr.immediate().ok_or_else(|| e.illegal())?;
            e.bytes(&[ix.prefix(), 0x22]);
            e.word(nn, 0);
        }

        [Pair(p), Imm(nn)] => {
            e.byte(0x01 | p.code() << 4);
            e.word(nn, 1);
        }
        [Pair(p), Addr(adr)] => {
            let nn = adr.immediate().ok_or_else(|| e.illegal())?;
            match p {
                NormalPair::Hl => e.byte(0x2A),
                _ => e.bytes(&[0xED, 0x4B | p.code() << 4]),
            }
            e.word(nn, 1);
        }
        [Pair(NormalPair::Sp), Pair(NormalPair::Hl)] => e.byte(0xF9),
        [Pair(NormalPair::Sp), Index(ix)] => e.bytes(&[ix.prefix(), 0xF9]),

        [Index(ix), Imm(nn)] => {
            e.bytes(&[ix.prefix(), 0x21]);
            e.word(nn, 1);
        }
        [Index(ix), Addr(adr)] => {
            let nn = adr.immediate().ok_or_else(|| e.illegal())?;
            e.bytes(&[ix.prefix(), 0x2A]);
            e.word(nn, 1);
        }
        _ => return Err(e.illegal()),
    }
    Ok(())
}

/// `LD r,(adr)`
fn load_reg(e: &mut Emitter<'_>, dst: Register, adr: &NormalizedAddress) -> Enc {
    if let Some(m) = adr.mem_ref() {
        e.mem(m, 0x46 | dst.code() << 3, 1);
        return Ok(());
    }
    if dst != Register::A {
        return Err(e.illegal());
    }
    if adr.is_pair(NormalPair::Bc) {
        e.byte(0x0A);
    } else if adr.is_pair(NormalPair::De) {
        e.byte(0x1A);
    } else if let Some(nn) = adr.immediate() {
        e.byte(0x3A);
        e.word(nn, 1);
    } else {
        return Err(e.illegal());
    }
    Ok(())
}

/// `LD (adr),r`
fn store_reg(e: &mut Emitter<'_>, adr: &NormalizedAddress, src: Register) -> Enc {
    if let Some(m) = adr.mem_ref() {
        e.mem(m, 0x70 | src.code(), 0);
        return Ok(());
    }
    if src != Register::A {
        return Err(e.illegal());
    }
    if adr.is_pair(NormalPair::Bc) {
        e.byte(0x02);
    } else if adr.is_pair(NormalPair::De) {
        e.byte(0x12);
    } else if let Some(nn) = adr.immediate() {
        e.byte(0x32);
        e.word(nn, 0);
    } else {
        return Err(e.illegal());
    }
    Ok(())
}

/// PUSH/POP share one layout; `base` is the BC opcode.
pub(super) fn push_pop(e: &mut Emitter<'_>, args: &[Arg], base: u8) -> Enc {
    match *args {
        [Arg::Pair(p)] if p != NormalPair::Sp => e.byte(base | p.code() << 4),
        [Arg::SpecialPair(SpecialPair::Af)] => e.byte(base | 0x30),
        [Arg::Index(ix)] => e.bytes(&[ix.prefix(), base | 0x20]),
        _ => return Err(e.illegal()),
    }
    Ok(())
}

pub(super) fn ex(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    match *args {
        [Arg::SpecialPair(SpecialPair::Af), Arg::SpecialPair(SpecialPair::AfShadow)] => e.byte(0x08),
        [Arg::Pair(NormalPair::De), Arg::Pair(NormalPair::Hl)] => e.byte(0xEB),
        [Arg::Addr(adr), Arg::Pair(NormalPair::Hl)] if adr.is_pair(NormalPair::Sp) => e.byte(0xE3),
        [Arg::Addr(adr), Arg::Index(ix)] if adr.is_pair(NormalPair::Sp) => e.bytes(&[ix.prefix(), 0xE3]),
        _ => return Err(e.illegal()),
    }
    Ok(())
}
