// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Decoy instruction set and type definitions.
//!
//! This is the single authoritative table for the language: mnemonic names,
//! 1-byte opcodes, type names, wire type codes, and storage sizes. The lexer
//! keyword table, parser dispatch, semantic checks, and code generator all
//! derive from these enums.

use std::fmt;

/// A Decoy instruction mnemonic.
///
/// The discriminants are the wire opcodes emitted by the code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mnemonic {
    /// Create variable: `cv name type`
    Cv = 0,
    /// Assign variable: `av name value`
    Av = 1,
    /// Add-assign: `aav name value`
    Aav = 2,
    /// Subtract-assign: `sav name value`
    Sav = 3,
    /// Multiply-assign: `mav name value`
    Mav = 4,
    /// Divide-assign: `dav name value`
    Dav = 5,
    /// Modulus-assign: `moav name value`
    Moav = 6,
    /// Increment by one: `inc name`
    Inc = 7,
    /// Decrement by one: `dec name`
    Dec = 8,
    /// Print operands: `p "text" name ...`
    P = 9,
    /// Print operands then a newline: `pl "text" name ...`
    Pl = 10,
    /// Press a key code: `pk value`
    Pk = 11,
    /// Release a key code: `rk value`
    Rk = 12,
    /// Is-key-down test into a ui8 variable: `ikd key result`
    Ikd = 13,
    /// Move the mouse by X and Y: `mvm value value`
    Mvm = 14,
    /// Define a jump position: `dfp label`
    Dfp = 15,
    /// Unconditional jump: `jmp label`
    Jmp = 16,
    /// Jump on equality: `cejmp a b true false`
    Cejmp = 17,
    /// Jump on greater-than: `cgjmp a b true false`
    Cgjmp = 18,
    /// Jump on less-than: `cljmp a b true false`
    Cljmp = 19,
    /// Jump on greater-or-equal: `cegjmp a b true false`
    Cegjmp = 20,
    /// Jump on less-or-equal: `celjmp a b true false`
    Celjmp = 21,
    /// Delay in milliseconds: `dl value`
    Dl = 22,
    /// No operation: `nop`
    Nop = 255,
}

impl Mnemonic {
    /// Every mnemonic, in opcode order.
    pub const ALL: [Mnemonic; 24] = [
        Mnemonic::Cv,
        Mnemonic::Av,
        Mnemonic::Aav,
        Mnemonic::Sav,
        Mnemonic::Mav,
        Mnemonic::Dav,
        Mnemonic::Moav,
        Mnemonic::Inc,
        Mnemonic::Dec,
        Mnemonic::P,
        Mnemonic::Pl,
        Mnemonic::Pk,
        Mnemonic::Rk,
        Mnemonic::Ikd,
        Mnemonic::Mvm,
        Mnemonic::Dfp,
        Mnemonic::Jmp,
        Mnemonic::Cejmp,
        Mnemonic::Cgjmp,
        Mnemonic::Cljmp,
        Mnemonic::Cegjmp,
        Mnemonic::Celjmp,
        Mnemonic::Dl,
        Mnemonic::Nop,
    ];

    /// The 1-byte opcode emitted for this mnemonic.
    #[must_use]
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Look up a reserved instruction name. Matching is case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Mnemonic> {
        let mnemonic = match name {
            "cv" => Mnemonic::Cv,
            "av" => Mnemonic::Av,
            "aav" => Mnemonic::Aav,
            "sav" => Mnemonic::Sav,
            "mav" => Mnemonic::Mav,
            "dav" => Mnemonic::Dav,
            "moav" => Mnemonic::Moav,
            "inc" => Mnemonic::Inc,
            "dec" => Mnemonic::Dec,
            "p" => Mnemonic::P,
            "pl" => Mnemonic::Pl,
            "pk" => Mnemonic::Pk,
            "rk" => Mnemonic::Rk,
            "ikd" => Mnemonic::Ikd,
            "mvm" => Mnemonic::Mvm,
            "dfp" => Mnemonic::Dfp,
            "jmp" => Mnemonic::Jmp,
            "cejmp" => Mnemonic::Cejmp,
            "cgjmp" => Mnemonic::Cgjmp,
            "cljmp" => Mnemonic::Cljmp,
            "cegjmp" => Mnemonic::Cegjmp,
            "celjmp" => Mnemonic::Celjmp,
            "dl" => Mnemonic::Dl,
            "nop" => Mnemonic::Nop,
            _ => return None,
        };
        Some(mnemonic)
    }

    /// The source-level name of this mnemonic.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Cv => "cv",
            Mnemonic::Av => "av",
            Mnemonic::Aav => "aav",
            Mnemonic::Sav => "sav",
            Mnemonic::Mav => "mav",
            Mnemonic::Dav => "dav",
            Mnemonic::Moav => "moav",
            Mnemonic::Inc => "inc",
            Mnemonic::Dec => "dec",
            Mnemonic::P => "p",
            Mnemonic::Pl => "pl",
            Mnemonic::Pk => "pk",
            Mnemonic::Rk => "rk",
            Mnemonic::Ikd => "ikd",
            Mnemonic::Mvm => "mvm",
            Mnemonic::Dfp => "dfp",
            Mnemonic::Jmp => "jmp",
            Mnemonic::Cejmp => "cejmp",
            Mnemonic::Cgjmp => "cgjmp",
            Mnemonic::Cljmp => "cljmp",
            Mnemonic::Cegjmp => "cegjmp",
            Mnemonic::Celjmp => "celjmp",
            Mnemonic::Dl => "dl",
            Mnemonic::Nop => "nop",
        }
    }

    /// True for `av` and the arithmetic assignment forms.
    #[must_use]
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Mnemonic::Av
                | Mnemonic::Aav
                | Mnemonic::Sav
                | Mnemonic::Mav
                | Mnemonic::Dav
                | Mnemonic::Moav
        )
    }

    /// True for the four-operand conditional jump forms.
    #[must_use]
    pub fn is_conditional_jump(self) -> bool {
        matches!(
            self,
            Mnemonic::Cejmp
                | Mnemonic::Cgjmp
                | Mnemonic::Cljmp
                | Mnemonic::Cegjmp
                | Mnemonic::Celjmp
        )
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Decoy value type.
///
/// The discriminants are the wire type codes used for `cv` type tags and
/// literal payload tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    Nt = 0,
    I8 = 1,
    Ui8 = 2,
    I16 = 3,
    Ui16 = 4,
    I32 = 5,
    Ui32 = 6,
    F32 = 7,
    Str = 8,
}

impl ValueType {
    /// The 1-byte wire code for this type.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a reserved type name. Matching is case-sensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<ValueType> {
        let ty = match name {
            "nt" => ValueType::Nt,
            "i8" => ValueType::I8,
            "ui8" => ValueType::Ui8,
            "i16" => ValueType::I16,
            "ui16" => ValueType::Ui16,
            "i32" => ValueType::I32,
            "ui32" => ValueType::Ui32,
            "f32" => ValueType::F32,
            "str" => ValueType::Str,
            _ => return None,
        };
        Some(ty)
    }

    /// The source-level name of this type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Nt => "nt",
            ValueType::I8 => "i8",
            ValueType::Ui8 => "ui8",
            ValueType::I16 => "i16",
            ValueType::Ui16 => "ui16",
            ValueType::I32 => "i32",
            ValueType::Ui32 => "ui32",
            ValueType::F32 => "f32",
            ValueType::Str => "str",
        }
    }

    /// Storage size in bytes for a variable of this type.
    ///
    /// `nt` and `str` occupy no variable memory.
    #[must_use]
    pub fn size(self) -> u32 {
        match self {
            ValueType::Nt | ValueType::Str => 0,
            ValueType::I8 | ValueType::Ui8 => 1,
            ValueType::I16 | ValueType::Ui16 => 2,
            ValueType::I32 | ValueType::Ui32 | ValueType::F32 => 4,
        }
    }

    /// True for the types a variable may be declared with.
    #[must_use]
    pub fn is_storable(self) -> bool {
        !matches!(self, ValueType::Nt | ValueType::Str)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::{Mnemonic, ValueType};

    #[test]
    fn opcodes_match_wire_table() {
        let expected: [(Mnemonic, u8); 24] = [
            (Mnemonic::Cv, 0),
            (Mnemonic::Av, 1),
            (Mnemonic::Aav, 2),
            (Mnemonic::Sav, 3),
            (Mnemonic::Mav, 4),
            (Mnemonic::Dav, 5),
            (Mnemonic::Moav, 6),
            (Mnemonic::Inc, 7),
            (Mnemonic::Dec, 8),
            (Mnemonic::P, 9),
            (Mnemonic::Pl, 10),
            (Mnemonic::Pk, 11),
            (Mnemonic::Rk, 12),
            (Mnemonic::Ikd, 13),
            (Mnemonic::Mvm, 14),
            (Mnemonic::Dfp, 15),
            (Mnemonic::Jmp, 16),
            (Mnemonic::Cejmp, 17),
            (Mnemonic::Cgjmp, 18),
            (Mnemonic::Cljmp, 19),
            (Mnemonic::Cegjmp, 20),
            (Mnemonic::Celjmp, 21),
            (Mnemonic::Dl, 22),
            (Mnemonic::Nop, 255),
        ];
        for (mnemonic, opcode) in expected {
            assert_eq!(mnemonic.opcode(), opcode, "opcode for {mnemonic}");
        }
    }

    #[test]
    fn opcode_map_is_injective() {
        for (i, a) in Mnemonic::ALL.iter().enumerate() {
            for b in &Mnemonic::ALL[i + 1..] {
                assert_ne!(a.opcode(), b.opcode(), "{a} and {b} share an opcode");
            }
        }
    }

    #[test]
    fn mnemonic_names_round_trip() {
        for mnemonic in Mnemonic::ALL {
            assert_eq!(Mnemonic::from_name(mnemonic.name()), Some(mnemonic));
        }
        assert_eq!(Mnemonic::from_name("CV"), None);
        assert_eq!(Mnemonic::from_name("mov"), None);
    }

    #[test]
    fn type_codes_match_wire_table() {
        let expected: [(ValueType, u8); 9] = [
            (ValueType::Nt, 0),
            (ValueType::I8, 1),
            (ValueType::Ui8, 2),
            (ValueType::I16, 3),
            (ValueType::Ui16, 4),
            (ValueType::I32, 5),
            (ValueType::Ui32, 6),
            (ValueType::F32, 7),
            (ValueType::Str, 8),
        ];
        for (ty, code) in expected {
            assert_eq!(ty.code(), code, "code for {ty}");
            assert_eq!(ValueType::from_name(ty.name()), Some(ty));
        }
    }

    #[test]
    fn type_sizes() {
        assert_eq!(ValueType::Nt.size(), 0);
        assert_eq!(ValueType::I8.size(), 1);
        assert_eq!(ValueType::Ui8.size(), 1);
        assert_eq!(ValueType::I16.size(), 2);
        assert_eq!(ValueType::Ui16.size(), 2);
        assert_eq!(ValueType::I32.size(), 4);
        assert_eq!(ValueType::Ui32.size(), 4);
        assert_eq!(ValueType::F32.size(), 4);
        assert_eq!(ValueType::Str.size(), 0);
    }
}
