//! The CB page: rotates, shifts and single-bit operations.

use super::{Arg, Emitter, Enc};
use crate::address::MemRef;
use crate::error::EvalError;

/// `op` is the B-register form; the target's field is ORed in. `target` starts at operand `first`.
fn cb_target(e: &mut Emitter<'_>, target: &[Arg], op: u8, first: usize) -> Enc {
    match *target {
        [Arg::Reg(r)] => e.bytes(&[0xCB, op | r.code()]),
        [Arg::Addr(adr)] => {
            let m = e.mem_ref(&adr)?;
            e.cb_mem(m, op | 0x06, first);
        }
        // undocumented copy of the indexed result into a register
        [Arg::Addr(adr), Arg::Reg(r)] => match adr.mem_ref() {
            Some(MemRef::Indexed(ix, d)) => e.cb_indexed(ix, d, op | r.code(), first),
            _ => return Err(e.illegal()),
        },
        _ => return Err(e.illegal()),
    }
    Ok(())
}

pub(super) fn rotate(e: &mut Emitter<'_>, args: &[Arg], base: u8) -> Enc {
    cb_target(e, args, base, 0)
}

/// BIT/RES/SET `b, target`.
pub(super) fn bit(e: &mut Emitter<'_>, args: &[Arg], base: u8) -> Enc {
    let Some((&Arg::Imm(b), target)) = args.split_first() else {
        return Err(e.illegal());
    };
    if !(0..=7).contains(&b) {
        return Err(EvalError::BadBitIndex { value: b, column: e.col(0) });
    }
    cb_target(e, target, base | (b as u8) << 3, 1)
}
