use super::{Arg, Emitter, Enc, Width};
use crate::address::Base;
use crate::classify::{Condition, NormalPair};
use crate::error::EvalError;

fn condition(e: &Emitter<'_>, arg: Arg) -> Result<Condition, EvalError> {
    arg.condition().ok_or_else(|| e.illegal())
}

pub(super) fn jp(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    match *args {
        [Arg::Imm(nn)] => {
            e.byte(0xC3);
            e.word(nn, 0);
        }
        [Arg::Addr(adr)] if !adr.has_displacement => match adr.base {
            Base::NormalPair(NormalPair::Hl) => e.byte(0xE9),
            Base::IndexPair(ix) => e.bytes(&[ix.prefix(), 0xE9]),
            _ => return Err(e.illegal()),
        },
        [cc, Arg::Imm(nn)] => {
            let cc = condition(e, cc)?;
            e.byte(0xC2 | cc.code() << 3);
            e.word(nn, 1);
        }
        _ => return Err(e.illegal()),
    }
    Ok(())
}

/// Offsets are taken as written, relative to the byte after the instruction.
pub(super) fn jr(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    match *args {
        [Arg::Imm(d)] => {
            e.byte(0x18);
            e.imm(d, Width::S8, 0);
        }
        [cc, Arg::Imm(d)] => {
            let cc = condition(e, cc)?;
            if cc.code() > Condition::C.code() {
                return Err(e.illegal());
            }
            e.byte(0x20 | cc.code() << 3);
            e.imm(d, Width::S8, 1);
        }
        _ => return Err(e.illegal()),
    }
    Ok(())
}

pub(super) fn djnz(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    let [Arg::Imm(d)] = *args else {
        return Err(e.illegal());
    };
    e.byte(0x10);
    e.imm(d, Width::S8, 0);
    Ok(())
}

pub(super) fn call(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    match *args {
        [Arg::Imm(nn)] => {
            e.byte(0xCD);
            e.word(nn, 0);
        }
        [cc, Arg::Imm(nn)] => {
            let cc = condition(e, cc)?;
            e.byte(0xC4 | cc.code() << 3);
            e.word(nn, 1);
        }
        _ => return Err(e.illegal()),
    }
    Ok(())
}

pub(super) fn ret(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    match *args {
        [] => e.byte(0xC9),
        [cc] => {
            let cc = condition(e, cc)?;
            e.byte(0xC0 | cc.code() << 3);
        }
        _ => return Err(e.illegal()),
    }
    Ok(())
}

pub(super) fn rst(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    let [Arg::Imm(n)] = *args else {
        return Err(e.illegal());
    };
    if n & !0x38 != 0 {
        return Err(EvalError::BadRestart { value: n, column: e.col(0) });
    }
    e.byte(0xC7 | n as u8);
    Ok(())
}
