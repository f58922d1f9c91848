//! The instruction table: opcodes, their encoded sizes and operand shapes.

use num_derive::{FromPrimitive, ToPrimitive};

/// The static shape an operand slot accepts, used by the parser to
/// type-check an operand against the mnemonic that wants it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandKindTag {
    /// `R` — a register, `S0`..`S7`.
    Register,
    /// `C` — a two-digit hex constant.
    Constant,
    /// `L` — a label, or a constant used as a raw address.
    LabelOrConstant,
    /// `I` — the input port token (`I`).
    Input,
    /// `O` — the output port token (`Q`).
    Output,
}

/// The 18 opcodes of the mcu8 instruction set. `Halt` is numeric value 0,
/// so zeroed memory executed as instructions halts the processor.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, FromPrimitive, ToPrimitive)]
pub enum Opcode {
    Halt,
    Movi,
    Mov,
    Add,
    Sub,
    And,
    Eor,
    Inc,
    Dec,
    In,
    Out,
    Jp,
    Jz,
    Jnz,
    Rcall,
    Ret,
    Shl,
    Shr,
}

/// A static description of one opcode: its mnemonic, arity, encoded size
/// in bytes, and the operand kind expected at each position.
#[derive(Clone, Copy, Debug)]
pub struct InstructionSpec {
    pub opcode: Opcode,
    pub mnemonic: &'static str,
    pub arity: usize,
    pub size_bytes: usize,
    pub operand_kinds: &'static [OperandKindTag],
}

use OperandKindTag::{Constant, Input, LabelOrConstant, Output, Register};

const TABLE: &[InstructionSpec] = &[
    InstructionSpec { opcode: Opcode::Halt, mnemonic: "HALT", arity: 0, size_bytes: 1, operand_kinds: &[] },
    InstructionSpec { opcode: Opcode::Movi, mnemonic: "MOVI", arity: 2, size_bytes: 3, operand_kinds: &[Register, Constant] },
    InstructionSpec { opcode: Opcode::Mov, mnemonic: "MOV", arity: 2, size_bytes: 3, operand_kinds: &[Register, Register] },
    InstructionSpec { opcode: Opcode::Add, mnemonic: "ADD", arity: 2, size_bytes: 3, operand_kinds: &[Register, Register] },
    InstructionSpec { opcode: Opcode::Sub, mnemonic: "SUB", arity: 2, size_bytes: 3, operand_kinds: &[Register, Register] },
    InstructionSpec { opcode: Opcode::And, mnemonic: "AND", arity: 2, size_bytes: 3, operand_kinds: &[Register, Register] },
    InstructionSpec { opcode: Opcode::Eor, mnemonic: "EOR", arity: 2, size_bytes: 3, operand_kinds: &[Register, Register] },
    InstructionSpec { opcode: Opcode::Inc, mnemonic: "INC", arity: 1, size_bytes: 2, operand_kinds: &[Register] },
    InstructionSpec { opcode: Opcode::Dec, mnemonic: "DEC", arity: 1, size_bytes: 2, operand_kinds: &[Register] },
    InstructionSpec { opcode: Opcode::In, mnemonic: "IN", arity: 2, size_bytes: 2, operand_kinds: &[Register, Input] },
    InstructionSpec { opcode: Opcode::Out, mnemonic: "OUT", arity: 2, size_bytes: 2, operand_kinds: &[Output, Register] },
    InstructionSpec { opcode: Opcode::Jp, mnemonic: "JP", arity: 1, size_bytes: 2, operand_kinds: &[LabelOrConstant] },
    InstructionSpec { opcode: Opcode::Jz, mnemonic: "JZ", arity: 1, size_bytes: 2, operand_kinds: &[LabelOrConstant] },
    InstructionSpec { opcode: Opcode::Jnz, mnemonic: "JNZ", arity: 1, size_bytes: 2, operand_kinds: &[LabelOrConstant] },
    InstructionSpec { opcode: Opcode::Rcall, mnemonic: "RCALL", arity: 1, size_bytes: 2, operand_kinds: &[LabelOrConstant] },
    InstructionSpec { opcode: Opcode::Ret, mnemonic: "RET", arity: 0, size_bytes: 1, operand_kinds: &[] },
    InstructionSpec { opcode: Opcode::Shl, mnemonic: "SHL", arity: 1, size_bytes: 2, operand_kinds: &[Register] },
    InstructionSpec { opcode: Opcode::Shr, mnemonic: "SHR", arity: 1, size_bytes: 2, operand_kinds: &[Register] },
];

/// Looks up the static spec for an opcode. Every `Opcode` variant has an
/// entry, so this never fails.
pub fn spec_for(opcode: Opcode) -> InstructionSpec {
    TABLE
        .iter()
        .find(|spec| spec.opcode == opcode)
        .copied()
        .expect("every Opcode variant has a table entry")
}

/// Looks up the static spec for a mnemonic, case-insensitively.
pub fn spec_for_mnemonic(mnemonic: &str) -> Option<InstructionSpec> {
    TABLE
        .iter()
        .find(|spec| spec.mnemonic.eq_ignore_ascii_case(mnemonic))
        .copied()
}

/// `IN` and `OUT` only ever emit one of their two declared operands (see
/// the assembler's special-cased encoding), so their encoded size is
/// smaller than a naive `1 + arity` would suggest; it is listed directly
/// in the table instead of derived.
pub fn is_port_instruction(opcode: Opcode) -> bool {
    matches!(opcode, Opcode::In | Opcode::Out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn halt_is_zero() {
        use num_traits::ToPrimitive;
        assert_eq!(Opcode::Halt.to_u8(), Some(0));
    }

    #[test]
    fn every_opcode_has_a_spec() {
        for mnemonic in &[
            "HALT", "MOVI", "MOV", "ADD", "SUB", "AND", "EOR", "INC", "DEC", "IN", "OUT", "JP",
            "JZ", "JNZ", "RCALL", "RET", "SHL", "SHR",
        ] {
            assert!(spec_for_mnemonic(mnemonic).is_some(), "missing spec for {}", mnemonic);
        }
    }

    #[test]
    fn mnemonic_lookup_is_case_insensitive() {
        assert_eq!(spec_for_mnemonic("movi").unwrap().opcode, Opcode::Movi);
        assert_eq!(spec_for_mnemonic("MoVi").unwrap().opcode, Opcode::Movi);
    }

    #[test]
    fn unknown_mnemonic_is_none() {
        assert!(spec_for_mnemonic("NOPE").is_none());
    }

    #[test]
    fn in_out_are_port_instructions() {
        assert!(is_port_instruction(Opcode::In));
        assert!(is_port_instruction(Opcode::Out));
        assert!(!is_port_instruction(Opcode::Mov));
    }
}
