use super::{Arg, Emitter, Enc, Width};
use crate::address::{Base, NormalizedAddress};
use crate::classify::Register;
use crate::error::EvalError;

enum Port {
    Immediate(i32),
    C,
}

fn port(adr: &NormalizedAddress) -> Option<Port> {
    match adr.base {
        _ if adr.has_displacement => None,
        Base::Immediate(n) => Some(Port::Immediate(n)),
        Base::Register(Register::C) => Some(Port::C),
        _ => None,
    }
}

pub(super) fn im(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    let [Arg::Imm(mode)] = *args else {
        return Err(e.illegal());
    };
    let op = match mode {
        0 => 0x46,
        1 => 0x56,
        2 => 0x5E,
        _ => return Err(EvalError::BadInterruptMode { value: mode, column: e.col(0) }),
    };
    e.bytes(&[0xED, op]);
    Ok(())
}

pub(super) fn input(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    match *args {
        // flags only, result discarded
        [Arg::Addr(adr)] if matches!(port(&adr), Some(Port::C)) => e.bytes(&[0xED, 0x70]),
        [Arg::Reg(r), Arg::Addr(adr)] => match port(&adr) {
            Some(Port::Immediate(n)) if r == Register::A => {
                e.byte(0xDB);
                e.imm(n, Width::U8, 1);
            }
            Some(Port::C) => e.bytes(&[0xED, 0x40 | r.code() << 3]),
            _ => return Err(e.illegal()),
        },
        _ => return Err(e.illegal()),
    }
    Ok(())
}

pub(super) fn output(e: &mut Emitter<'_>, args: &[Arg]) -> Enc {
    match *args {
        [Arg::Addr(adr), Arg::Reg(r)] => match port(&adr) {
            Some(Port::Immediate(n)) if r == Register::A => {
                e.byte(0xD3);
                e.imm(n, Width::U8, 0);
            }
            Some(Port::C) => e.bytes(&[0xED, 0x41 | r.code() << 3]),
            _ => return Err(e.illegal()),
        },
        [Arg::Addr(adr), Arg::Imm(0)] if matches!(port(&adr), Some(Port::C)) => e.bytes(&[0xED, 0x71]),
        _ => return Err(e.illegal()),
    }
    Ok(())
}
