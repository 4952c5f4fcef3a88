//! RISC-V Major Opcode Map.
//!
//! Instruction bits 1-0 are `0b11` for every 32-bit encoding, so the major opcode
//! is carried by bits 6-2. Those five bits split into a high pair (`opch`, bits 6-5)
//! and a low triple (`opcl`, bits 4-2); the table below is laid out the same way as
//! the base opcode map in the unprivileged ISA manual.

use std::fmt;

/// Number of bits in the major opcode.
pub const OPCODE_BITS: u32 = 5;

/// The 32 RISC-V major opcodes (instruction bits 6-2).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Integer loads (LB, LH, LW, LBU, LHU).
    Load = 0b00000,
    /// Floating-point loads.
    LoadFp = 0b00001,
    /// Custom-0 extension space.
    Custom0 = 0b00010,
    /// FENCE and FENCE.I.
    MiscMem = 0b00011,
    /// Register-immediate arithmetic (ADDI, SLTI, ...).
    OpImm = 0b00100,
    /// Add upper immediate to PC.
    Auipc = 0b00101,
    /// RV64 32-bit register-immediate arithmetic.
    OpImm32 = 0b00110,
    /// 48-bit instruction space.
    Rv48_0 = 0b00111,
    /// Integer stores (SB, SH, SW).
    Store = 0b01000,
    /// Floating-point stores.
    StoreFp = 0b01001,
    /// Custom-1 extension space.
    Custom1 = 0b01010,
    /// Atomic memory operations.
    Amo = 0b01011,
    /// Register-register arithmetic (ADD, SUB, ...).
    Op = 0b01100,
    /// Load upper immediate.
    Lui = 0b01101,
    /// RV64 32-bit register-register arithmetic.
    Op32 = 0b01110,
    /// 64-bit instruction space.
    Rv64 = 0b01111,
    /// Fused multiply-add.
    Madd = 0b10000,
    /// Fused multiply-subtract.
    Msub = 0b10001,
    /// Negated fused multiply-subtract.
    Nmsub = 0b10010,
    /// Negated fused multiply-add.
    Nmadd = 0b10011,
    /// Floating-point arithmetic.
    OpFp = 0b10100,
    /// Reserved.
    Rsvd0 = 0b10101,
    /// Custom-2 / RV128 space.
    Custom2Rv128 = 0b10110,
    /// 48-bit instruction space.
    Rv48_1 = 0b10111,
    /// Conditional branches.
    Branch = 0b11000,
    /// Jump and link register.
    Jalr = 0b11001,
    /// Reserved.
    Rsvd1 = 0b11010,
    /// Jump and link.
    Jal = 0b11011,
    /// ECALL, EBREAK, CSR access.
    System = 0b11100,
    /// Reserved.
    Rsvd2 = 0b11101,
    /// Custom-3 / RV128 space.
    Custom3Rv128 = 0b11110,
    /// 80-bit and longer instruction space.
    Rv80 = 0b11111,
}

const OPCODE_TABLE: [Opcode; 32] = [
    Opcode::Load,
    Opcode::LoadFp,
    Opcode::Custom0,
    Opcode::MiscMem,
    Opcode::OpImm,
    Opcode::Auipc,
    Opcode::OpImm32,
    Opcode::Rv48_0,
    Opcode::Store,
    Opcode::StoreFp,
    Opcode::Custom1,
    Opcode::Amo,
    Opcode::Op,
    Opcode::Lui,
    Opcode::Op32,
    Opcode::Rv64,
    Opcode::Madd,
    Opcode::Msub,
    Opcode::Nmsub,
    Opcode::Nmadd,
    Opcode::OpFp,
    Opcode::Rsvd0,
    Opcode::Custom2Rv128,
    Opcode::Rv48_1,
    Opcode::Branch,
    Opcode::Jalr,
    Opcode::Rsvd1,
    Opcode::Jal,
    Opcode::System,
    Opcode::Rsvd2,
    Opcode::Custom3Rv128,
    Opcode::Rv80,
];

impl Opcode {
    /// Maps a 5-bit major opcode to its enum value. Only the low five bits are used.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        OPCODE_TABLE[(bits & 0x1F) as usize]
    }

    /// Returns the 5-bit encoding of this opcode.
    #[inline]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Returns the upper two opcode bits (`opch`).
    #[inline]
    pub const fn high(self) -> u32 {
        self.bits() >> 3
    }

    /// Returns the lower three opcode bits (`opcl`).
    #[inline]
    pub const fn low(self) -> u32 {
        self.bits() & 0b111
    }

    /// Returns the upper-case symbolic name used in logs and diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Load => "LOAD",
            Self::LoadFp => "LOAD_FP",
            Self::Custom0 => "CUSTOM_0",
            Self::MiscMem => "MISC_MEM",
            Self::OpImm => "OP_IMM",
            Self::Auipc => "AUIPC",
            Self::OpImm32 => "OP_IMM_32",
            Self::Rv48_0 => "RV48_0",
            Self::Store => "STORE",
            Self::StoreFp => "STORE_FP",
            Self::Custom1 => "CUSTOM_1",
            Self::Amo => "AMO",
            Self::Op => "OP",
            Self::Lui => "LUI",
            Self::Op32 => "OP_32",
            Self::Rv64 => "RV_64",
            Self::Madd => "MADD",
            Self::Msub => "MSUB",
            Self::Nmsub => "NMSUB",
            Self::Nmadd => "NMADD",
            Self::OpFp => "OP_FP",
            Self::Rsvd0 => "RSVD_0",
            Self::Custom2Rv128 => "CUSTOM_2_RV128",
            Self::Rv48_1 => "RV48_1",
            Self::Branch => "BRANCH",
            Self::Jalr => "JALR",
            Self::Rsvd1 => "RSVD_1",
            Self::Jal => "JAL",
            Self::System => "SYSTEM",
            Self::Rsvd2 => "RSVD_2",
            Self::Custom3Rv128 => "CUSTOM_3_RV128",
            Self::Rv80 => "RV_80",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
