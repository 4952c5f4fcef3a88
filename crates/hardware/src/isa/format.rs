//! Instruction Format Classification.
//!
//! Maps a major opcode to its encoding format (R, I, S, B, U, J). The lookup is a
//! two-level multiplexer: the high opcode pair `opch` selects one of four sub-tables,
//! and the low triple `opcl` selects the format inside it. Opcodes this model does not
//! execute classify as [`InstrFormat::Other`].

use std::fmt;

use crate::isa::rv32i::opcodes::Opcode;

/// Encoding format of a 32-bit instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InstrFormat {
    /// Not yet classified.
    #[default]
    Undef,
    /// Register-register (`funct7 | rs2 | rs1 | funct3 | rd | opcode`).
    R,
    /// Register-immediate (`imm[11:0] | rs1 | funct3 | rd | opcode`).
    I,
    /// Store (`imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`).
    S,
    /// Branch (`imm[12|10:5] | rs2 | rs1 | funct3 | imm[4:1|11] | opcode`).
    B,
    /// Upper immediate (`imm[31:12] | rd | opcode`).
    U,
    /// Jump (`imm[20|10:1|11|19:12] | rd | opcode`).
    J,
    /// Any format outside the executed RV32I subset.
    Other,
}

impl InstrFormat {
    /// Returns the diagnostic name of the format (e.g., `"R_TYPE"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Undef => "UNDEF_TYPE",
            Self::R => "R_TYPE",
            Self::I => "I_TYPE",
            Self::S => "S_TYPE",
            Self::B => "B_TYPE",
            Self::U => "U_TYPE",
            Self::J => "J_TYPE",
            Self::Other => "OTHER_TYPE",
        }
    }
}

impl fmt::Display for InstrFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifies a major opcode into its encoding format.
pub const fn classify(opcode: Opcode) -> InstrFormat {
    let opcl = opcode.low();
    match opcode.high() {
        0b00 => subtype_00(opcl),
        0b01 => subtype_01(opcl),
        0b10 => InstrFormat::Other,
        _ => subtype_11(opcl),
    }
}

/// LOAD .. RV48_0
const fn subtype_00(opcl: u32) -> InstrFormat {
    match opcl {
        0b000 | 0b100 => InstrFormat::I,
        0b101 => InstrFormat::U,
        _ => InstrFormat::Other,
    }
}

/// STORE .. RV_64
const fn subtype_01(opcl: u32) -> InstrFormat {
    match opcl {
        0b000 => InstrFormat::S,
        0b100 => InstrFormat::R,
        0b101 => InstrFormat::U,
        _ => InstrFormat::Other,
    }
}

/// BRANCH .. RV_80
const fn subtype_11(opcl: u32) -> InstrFormat {
    match opcl {
        0b000 => InstrFormat::B,
        0b001 => InstrFormat::I,
        0b011 => InstrFormat::J,
        _ => InstrFormat::Other,
    }
}
