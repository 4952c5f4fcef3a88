//! Opcode table and format classification tests.

use rstest::rstest;

use riscv_vp_core::isa::format::{InstrFormat, classify};
use riscv_vp_core::isa::rv32i::opcodes::Opcode;

#[rstest]
#[case(Opcode::Load, InstrFormat::I)]
#[case(Opcode::OpImm, InstrFormat::I)]
#[case(Opcode::Jalr, InstrFormat::I)]
#[case(Opcode::Auipc, InstrFormat::U)]
#[case(Opcode::Lui, InstrFormat::U)]
#[case(Opcode::Store, InstrFormat::S)]
#[case(Opcode::Op, InstrFormat::R)]
#[case(Opcode::Branch, InstrFormat::B)]
#[case(Opcode::Jal, InstrFormat::J)]
#[case(Opcode::System, InstrFormat::Other)]
#[case(Opcode::MiscMem, InstrFormat::Other)]
#[case(Opcode::Amo, InstrFormat::Other)]
#[case(Opcode::OpFp, InstrFormat::Other)]
fn test_classify(#[case] op: Opcode, #[case] expected: InstrFormat) {
    assert_eq!(classify(op), expected);
}

#[test]
fn test_opcode_bits_roundtrip_all_32() {
    for bits in 0..32 {
        assert_eq!(Opcode::from_bits(bits).bits(), bits);
    }
}

#[test]
fn test_opcode_halves() {
    assert_eq!(Opcode::Branch.high(), 0b11);
    assert_eq!(Opcode::Branch.low(), 0b000);
    assert_eq!(Opcode::Lui.high(), 0b01);
    assert_eq!(Opcode::Lui.low(), 0b101);
}

#[test]
fn test_opcode_names() {
    assert_eq!(Opcode::OpImm.name(), "OP_IMM");
    assert_eq!(Opcode::Custom3Rv128.name(), "CUSTOM_3_RV128");
    assert_eq!(InstrFormat::B.to_string(), "B_TYPE");
}
