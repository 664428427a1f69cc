//! Closed operand vocabularies and position-dependent classification.
//!
//! Every table is matched against the upper-cased spelling of an identifier.
//! A word may belong to several vocabularies at once (`C` is both a register
//! and a condition); which one wins depends on where the word appears.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:expr => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Exact lookup of an already upper-cased word.
            pub fn parse(word: &str) -> Option<Self> {
                match word {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Value of the CPU encoding field this operand fills.
            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

vocabulary! {
    /// 8-bit registers. `A` is 7; 6 is the `(HL)` slot of the r field.
    Register {
        B = 0 => "B",
        C = 1 => "C",
        D = 2 => "D",
        E = 3 => "E",
        H = 4 => "H",
        L = 5 => "L",
        A = 7 => "A",
    }
}

vocabulary! {
    SpecialRegister {
        I = 0 => "I",
        R = 1 => "R",
    }
}

vocabulary! {
    IndexHalf {
        Ixl = 0 => "IXL",
        Ixh = 1 => "IXH",
        Iyl = 2 => "IYL",
        Iyh = 3 => "IYH",
    }
}

vocabulary! {
    NormalPair {
        Bc = 0 => "BC",
        De = 1 => "DE",
        Hl = 2 => "HL",
        Sp = 3 => "SP",
    }
}

vocabulary! {
    SpecialPair {
        Af = 0 => "AF",
        AfShadow = 1 => "AF'",
    }
}

vocabulary! {
    IndexPair {
        Ix = 0 => "IX",
        Iy = 1 => "IY",
    }
}

vocabulary! {
    Condition {
        Nz = 0 => "NZ",
        Z = 1 => "Z",
        Nc = 2 => "NC",
        C = 3 => "C",
        Po = 4 => "PO",
        Pe = 5 => "PE",
        P = 6 => "P",
        M = 7 => "M",
    }
}

vocabulary! {
    Mnemonic {
        Ld = 0 => "LD",
        Push = 1 => "PUSH",
        Pop = 2 => "POP",
        Ex = 3 => "EX",
        Exx = 4 => "EXX",
        Ldi = 5 => "LDI",
        Ldir = 6 => "LDIR",
        Ldd = 7 => "LDD",
        Lddr = 8 => "LDDR",
        Cpi = 9 => "CPI",
        Cpir = 10 => "CPIR",
        Cpd = 11 => "CPD",
        Cpdr = 12 => "CPDR",
        Add = 13 => "ADD",
        Adc = 14 => "ADC",
        Sub = 15 => "SUB",
        Sbc = 16 => "SBC",
        And = 17 => "AND",
        Or = 18 => "OR",
        Xor = 19 => "XOR",
        Inc = 20 => "INC",
        Dec = 21 => "DEC",
        Daa = 22 => "DAA",
        Cpl = 23 => "CPL",
        Neg = 24 => "NEG",
        Ccf = 25 => "CCF",
        Scf = 26 => "SCF",
        Nop = 27 => "NOP",
        Halt = 28 => "HALT",
        Di = 29 => "DI",
        Ei = 30 => "EI",
        Im = 31 => "IM",
        Rlca = 32 => "RLCA",
        Rla = 33 => "RLA",
        Rrca = 34 => "RRCA",
        Rra = 35 => "RRA",
        Rlc = 36 => "RLC",
        Rl = 37 => "RL",
        Rrc = 38 => "RRC",
        Rr = 39 => "RR",
        Sla = 40 => "SLA",
        Sra = 41 => "SRA",
        Srl = 42 => "SRL",
        Rld = 43 => "RLD",
        Rrd = 44 => "RRD",
        Bit = 45 => "BIT",
        Set = 46 => "SET",
        Res = 47 => "RES",
        Jp = 48 => "JP",
        Jr = 49 => "JR",
        Djnz = 50 => "DJNZ",
        Call = 51 => "CALL",
        Ret = 52 => "RET",
        Reti = 53 => "RETI",
        Retn = 54 => "RETN",
        Rst = 55 => "RST",
        In = 56 => "IN",
        Ini = 57 => "INI",
        Inir = 58 => "INIR",
        Ind = 59 => "IND",
        Indr = 60 => "INDR",
        Out = 61 => "OUT",
        Outi = 62 => "OUTI",
        Outir = 63 => "OUTIR",
        Outd = 64 => "OUTD",
        Outdr = 65 => "OUTDR",
        Cp = 66 => "CP",
    }
}

impl Mnemonic {
    /// Table lookup plus the canonical `OTIR`/`OTDR` spellings.
    pub fn lookup(word: &str) -> Option<Self> {
        Self::parse(word).or(match word {
            "OTIR" => Some(Mnemonic::Outir),
            "OTDR" => Some(Mnemonic::Outdr),
            _ => None,
        })
    }
}

impl IndexPair {
    /// Prefix byte selecting IX (`DD`) or IY (`FD`) in place of HL.
    pub fn prefix(self) -> u8 {
        match self {
            IndexPair::Ix => 0xDD,
            IndexPair::Iy => 0xFD,
        }
    }
}

impl IndexHalf {
    pub fn pair(self) -> IndexPair {
        match self {
            IndexHalf::Ixl | IndexHalf::Ixh => IndexPair::Ix,
            IndexHalf::Iyl | IndexHalf::Iyh => IndexPair::Iy,
        }
    }

    /// The r-field value the half replaces once prefixed: H (4) or L (5).
    pub fn field(self) -> u8 {
        match self {
            IndexHalf::Ixh | IndexHalf::Iyh => Register::H.code(),
            IndexHalf::Ixl | IndexHalf::Iyl => Register::L.code(),
        }
    }
}

bitflags! {
    /// Set of vocabularies a word belongs to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Vocab: u8 {
        const REGISTER = 1 << 0;
        const SPECIAL_REGISTER = 1 << 1;
        const INDEX_HALF = 1 << 2;
        const NORMAL_PAIR = 1 << 3;
        const SPECIAL_PAIR = 1 << 4;
        const INDEX_PAIR = 1 << 5;
        const CONDITION = 1 << 6;
        const MNEMONIC = 1 << 7;
    }
}

impl Vocab {
    pub fn of(word: &str) -> Self {
        let word = word.to_ascii_uppercase();
        let mut set = Vocab::empty();
        set.set(Vocab::REGISTER, Register::parse(&word).is_some());
        set.set(Vocab::SPECIAL_REGISTER, SpecialRegister::parse(&word).is_some());
        set.set(Vocab::INDEX_HALF, IndexHalf::parse(&word).is_some());
        set.set(Vocab::NORMAL_PAIR, NormalPair::parse(&word).is_some());
        set.set(Vocab::SPECIAL_PAIR, SpecialPair::parse(&word).is_some());
        set.set(Vocab::INDEX_PAIR, IndexPair::parse(&word).is_some());
        set.set(Vocab::CONDITION, Condition::parse(&word).is_some());
        set.set(Vocab::MNEMONIC, Mnemonic::lookup(&word).is_some());
        set
    }
}

/// Precedence for a direct operand of an instruction.
pub const OPERAND_PRECEDENCE: [Vocab; 7] = [
    Vocab::REGISTER,
    Vocab::NORMAL_PAIR,
    Vocab::SPECIAL_PAIR,
    Vocab::CONDITION,
    Vocab::SPECIAL_REGISTER,
    Vocab::INDEX_HALF,
    Vocab::INDEX_PAIR,
];

/// Precedence for the base of a parenthesized address. Anything else is illegal there.
pub const ADDRESS_PRECEDENCE: [Vocab; 3] = [Vocab::NORMAL_PAIR, Vocab::INDEX_PAIR, Vocab::REGISTER];

/// A classified operand word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Word {
    Register(Register),
    SpecialRegister(SpecialRegister),
    IndexHalf(IndexHalf),
    NormalPair(NormalPair),
    SpecialPair(SpecialPair),
    IndexPair(IndexPair),
    Condition(Condition),
}

/// Classify `word` by trying the vocabularies of `order` in turn; first match wins.
pub fn classify(word: &str, order: &[Vocab]) -> Option<Word> {
    let word = word.to_ascii_uppercase();
    order.iter().find_map(|&vocab| lookup_in(vocab, &word))
}

pub fn classify_operand(word: &str) -> Option<Word> {
    classify(word, &OPERAND_PRECEDENCE)
}

pub fn classify_address_base(word: &str) -> Option<Word> {
    classify(word, &ADDRESS_PRECEDENCE)
}

fn lookup_in(vocab: Vocab, word: &str) -> Option<Word> {
    if vocab == Vocab::REGISTER {
        Register::parse(word).map(Word::Register)
    } else if vocab == Vocab::SPECIAL_REGISTER {
        SpecialRegister::parse(word).map(Word::SpecialRegister)
    } else if vocab == Vocab::INDEX_HALF {
        IndexHalf::parse(word).map(Word::IndexHalf)
    } else if vocab == Vocab::NORMAL_PAIR {
        NormalPair::parse(word).map(Word::NormalPair)
    } else if vocab == Vocab::SPECIAL_PAIR {
        SpecialPair::parse(word).map(Word::SpecialPair)
    } else if vocab == Vocab::INDEX_PAIR {
        IndexPair::parse(word).map(Word::IndexPair)
    } else if vocab == Vocab::CONDITION {
        Condition::parse(word).map(Word::Condition)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_numbering_skips_six() {
        let codes: Vec<u8> = Register::ALL.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5, 7]);
    }

    #[test]
    fn mnemonic_table_has_67_entries() {
        assert_eq!(Mnemonic::ALL.len(), 67);
        for (i, m) in Mnemonic::ALL.iter().enumerate() {
            assert_eq!(m.code() as usize, i);
            assert_eq!(Mnemonic::parse(m.name()), Some(*m));
        }
        assert_eq!(Mnemonic::lookup("OTIR"), Some(Mnemonic::Outir));
        assert_eq!(Mnemonic::lookup("OTDR"), Some(Mnemonic::Outdr));
    }

    #[test]
    fn vocab_reports_ambiguity() {
        assert_eq!(Vocab::of("c"), Vocab::REGISTER | Vocab::CONDITION);
        assert_eq!(Vocab::of("AF'"), Vocab::SPECIAL_PAIR);
        assert_eq!(Vocab::of("ld"), Vocab::MNEMONIC);
        assert!(Vocab::of("label").is_empty());
    }

    #[test]
    fn operand_position_prefers_register_over_condition() {
        assert_eq!(classify_operand("c"), Some(Word::Register(Register::C)));
        assert_eq!(classify_operand("NZ"), Some(Word::Condition(Condition::Nz)));
        assert_eq!(classify_operand("af'"), Some(Word::SpecialPair(SpecialPair::AfShadow)));
        assert_eq!(classify_operand("ixh"), Some(Word::IndexHalf(IndexHalf::Ixh)));
        assert_eq!(classify_operand("r"), Some(Word::SpecialRegister(SpecialRegister::R)));
        assert_eq!(classify_operand("nop"), None);
    }

    #[test]
    fn address_position_rejects_non_bases() {
        assert_eq!(classify_address_base("hl"), Some(Word::NormalPair(NormalPair::Hl)));
        assert_eq!(classify_address_base("IY"), Some(Word::IndexPair(IndexPair::Iy)));
        assert_eq!(classify_address_base("C"), Some(Word::Register(Register::C)));
        assert_eq!(classify_address_base("NZ"), None);
        assert_eq!(classify_address_base("AF"), None);
        assert_eq!(classify_address_base("I"), None);
        assert_eq!(classify_address_base("IXL"), None);
    }

    #[test]
    fn index_half_fields() {
        assert_eq!(IndexHalf::Ixh.field(), 4);
        assert_eq!(IndexHalf::Iyl.field(), 5);
        assert_eq!(IndexHalf::Iyh.pair().prefix(), 0xFD);
    }
}
