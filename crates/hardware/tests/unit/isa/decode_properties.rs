//! Instruction Decode Properties.
//!
//! Verifies that `decode()` extracts the opcode, register fields, function
//! codes, and sign-extended immediates of every RV32I format, and that
//! immediates survive an encode/decode pass for their full range.

use proptest::prelude::*;
use rstest::rstest;

use riscv_vp_core::isa::decode::decode;
use riscv_vp_core::isa::format::InstrFormat;
use riscv_vp_core::isa::instruction::InstructionBits;
use riscv_vp_core::isa::rv32i::opcodes::Opcode;

use crate::common::builder::instruction::InstructionBuilder;

// ──────────────────────────────────────────────────────────
// Field extraction
// ──────────────────────────────────────────────────────────

#[test]
fn test_r_type_fields() {
    let inst = InstructionBuilder::new().sub(5, 6, 7).build();
    let d = decode(inst);
    assert_eq!(d.opcode, Opcode::Op);
    assert_eq!(d.format, InstrFormat::R);
    assert_eq!((d.rd, d.rs1, d.rs2), (5, 6, 7));
    assert_eq!(d.funct3, 0);
    assert_eq!(d.funct7, 0b0100000);
    assert_eq!(d.imm, 0);
}

#[test]
fn test_field_accessors_on_raw_word() {
    // addi a0, a1, -1
    let inst: u32 = 0xFFF5_8513;
    assert_eq!(inst.major_opcode(), Opcode::OpImm.bits());
    assert_eq!(inst.rd(), 10);
    assert_eq!(inst.rs1(), 11);
    assert_eq!(inst.funct3(), 0);
    assert_eq!(decode(inst).imm, -1);
}

#[rstest]
#[case::addi_max(InstructionBuilder::new().addi(1, 2, 2047).build(), 2047)]
#[case::addi_min(InstructionBuilder::new().addi(1, 2, -2048).build(), -2048)]
#[case::lw_neg(InstructionBuilder::new().lw(1, 2, -4).build(), -4)]
#[case::sw_pos(InstructionBuilder::new().sw(2, 1, 100).build(), 100)]
#[case::sw_neg(InstructionBuilder::new().sw(2, 1, -100).build(), -100)]
#[case::beq_back(InstructionBuilder::new().beq(1, 2, -8).build(), -8)]
#[case::beq_max(InstructionBuilder::new().beq(1, 2, 4094).build(), 4094)]
#[case::jal_fwd(InstructionBuilder::new().jal(1, 2048).build(), 2048)]
#[case::jal_min(InstructionBuilder::new().jal(0, -1_048_576).build(), -1_048_576)]
#[case::lui(InstructionBuilder::new().lui(3, 0x12345).build(), 0x1234_5000)]
#[case::lui_neg(InstructionBuilder::new().lui(3, 0xFFFFF).build(), 0xFFFF_F000_u32 as i32)]
fn test_immediates(#[case] inst: u32, #[case] expected: i32) {
    assert_eq!(decode(inst).imm, expected);
}

#[test]
fn test_u_type_keeps_low_bits_clear() {
    let d = decode(InstructionBuilder::new().auipc(7, 0xABCDE).build());
    assert_eq!(d.format, InstrFormat::U);
    assert_eq!(d.imm as u32 & 0xFFF, 0);
    assert_eq!(d.rd, 7);
}

#[test]
fn test_other_formats_have_zero_immediate() {
    // ecall
    let d = decode(0x0000_0073);
    assert_eq!(d.opcode, Opcode::System);
    assert_eq!(d.format, InstrFormat::Other);
    assert_eq!(d.imm, 0);
}

// ──────────────────────────────────────────────────────────
// Properties
// ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_i_type_immediate(imm in -2048i32..2048, rd in 0u32..32, rs1 in 0u32..32) {
        let d = decode(InstructionBuilder::new().addi(rd, rs1, imm).build());
        prop_assert_eq!(d.imm, imm);
        prop_assert_eq!(d.rd, rd as usize);
        prop_assert_eq!(d.rs1, rs1 as usize);
    }

    #[test]
    fn prop_s_type_immediate(imm in -2048i32..2048, rs1 in 0u32..32, rs2 in 0u32..32) {
        let d = decode(InstructionBuilder::new().sw(rs1, rs2, imm).build());
        prop_assert_eq!(d.format, InstrFormat::S);
        prop_assert_eq!(d.imm, imm);
        prop_assert_eq!(d.rs2, rs2 as usize);
    }

    #[test]
    fn prop_b_type_immediate_is_even(half in -2048i32..2048) {
        let imm = half * 2;
        let d = decode(InstructionBuilder::new().bne(1, 2, imm).build());
        prop_assert_eq!(d.imm, imm);
        prop_assert_eq!(d.imm & 1, 0);
    }

    #[test]
    fn prop_j_type_immediate_is_even(half in -524_288i32..524_288) {
        let imm = half * 2;
        let d = decode(InstructionBuilder::new().jal(1, imm).build());
        prop_assert_eq!(d.imm, imm);
    }

    #[test]
    fn prop_decode_never_panics(inst in any::<u32>()) {
        let d = decode(inst);
        prop_assert_eq!(d.raw, inst);
        prop_assert!(d.rd < 32 && d.rs1 < 32 && d.rs2 < 32);
    }
}
