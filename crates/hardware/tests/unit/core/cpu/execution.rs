//! # CPU Execution Tests
//!
//! Tests for RV32I instruction semantics, trap recording, and the run loop.

use std::sync::Arc;

use rstest::rstest;

use riscv_vp_core::common::CpuError;
use riscv_vp_core::common::constants::{
    MCAUSE_ILLEGAL_INSTRUCTION, MCAUSE_INSTRUCTION_ACCESS_FAULT, NOP_INSTR, RET_INSTR,
};
use riscv_vp_core::core::cpu::execution::{RunExit, StepOutcome};
use riscv_vp_core::core::events::EventClass;

use crate::common::builder::instruction::InstructionBuilder;
use crate::common::harness::TestContext;

fn b() -> InstructionBuilder {
    InstructionBuilder::new()
}

#[test]
fn test_addi_and_counters() {
    let mut tc = TestContext::new().load_program(0, &[b().addi(5, 0, 42).build()]);
    assert_eq!(tc.step().unwrap(), StepOutcome::Continue);
    assert_eq!(tc.get_reg(5), 42);
    assert_eq!(tc.cpu.pc, 4);
    assert_eq!(tc.cpu.get_cycle_count(), 1);
    assert_eq!(tc.cpu.get_step_count(), 1);
    assert_eq!(tc.cpu.stats.instructions_retired, 1);
}

#[test]
fn test_x0_stays_zero() {
    let mut tc = TestContext::new().load_program(0, &[b().addi(0, 0, 7).build()]);
    tc.step_n(1);
    assert_eq!(tc.get_reg(0), 0);
}

#[rstest]
#[case::add(b().add(3, 1, 2).build(), 7, 5, 12)]
#[case::add_wraps(b().add(3, 1, 2).build(), 0xFFFF_FFFF, 2, 1)]
#[case::sub(b().sub(3, 1, 2).build(), 5, 7, 0xFFFF_FFFE)]
#[case::slt_signed(b().slt(3, 1, 2).build(), 0xFFFF_FFFF, 1, 1)]
#[case::sltu_unsigned(b().sltu(3, 1, 2).build(), 0xFFFF_FFFF, 1, 0)]
#[case::or(b().or(3, 1, 2).build(), 0xF0, 0x0F, 0xFF)]
#[case::and(b().and(3, 1, 2).build(), 0xF0, 0x3C, 0x30)]
#[case::xor(b().xor(3, 1, 2).build(), 0xFF, 0x0F, 0xF0)]
#[case::sra(b().sra(3, 1, 2).build(), 0x8000_0000, 4, 0xF800_0000)]
fn test_op(#[case] inst: u32, #[case] rs1: u32, #[case] rs2: u32, #[case] expected: u32) {
    let mut tc = TestContext::new().load_program(0, &[inst]);
    tc.set_reg(1, rs1);
    tc.set_reg(2, rs2);
    tc.step_n(1);
    assert_eq!(tc.get_reg(3), expected);
}

#[rstest]
#[case::slti(b().slti(3, 1, -1).build(), 0xFFFF_FFFE, 1)]
#[case::slli(b().slli(3, 1, 4).build(), 0x1, 0x10)]
#[case::srai(b().srai(3, 1, 1).build(), 0x8000_0000, 0xC000_0000)]
#[case::addi_neg(b().addi(3, 1, -1).build(), 0, 0xFFFF_FFFF)]
fn test_op_imm(#[case] inst: u32, #[case] rs1: u32, #[case] expected: u32) {
    let mut tc = TestContext::new().load_program(0, &[inst]);
    tc.set_reg(1, rs1);
    tc.step_n(1);
    assert_eq!(tc.get_reg(3), expected);
}

#[test]
fn test_lui_auipc() {
    let mut tc = TestContext::new().load_program(
        0x100,
        &[b().lui(1, 0x12345).build(), b().auipc(2, 0x1).build()],
    );
    tc.step_n(2);
    assert_eq!(tc.get_reg(1), 0x1234_5000);
    assert_eq!(tc.get_reg(2), 0x104 + 0x1000);
}

#[test]
fn test_jal_links_and_jumps() {
    let mut tc = TestContext::new().load_program(0x10, &[b().jal(1, 0x20).build()]);
    tc.step_n(1);
    assert_eq!(tc.get_reg(1), 0x14);
    assert_eq!(tc.cpu.pc, 0x30);
}

#[test]
fn test_jalr_reads_rs1_before_writing_rd() {
    let mut tc = TestContext::new().load_program(0, &[b().jalr(5, 5, 3).build()]);
    tc.set_reg(5, 0x40);
    tc.step_n(1);
    // target (0x40 + 3) & !1
    assert_eq!(tc.cpu.pc, 0x42);
    assert_eq!(tc.get_reg(5), 4);
}

#[rstest]
#[case::beq_taken(b().beq(1, 2, 16).build(), 3, 3, 16)]
#[case::beq_not_taken(b().beq(1, 2, 16).build(), 3, 4, 4)]
#[case::bne_taken(b().bne(1, 2, 8).build(), 3, 4, 8)]
#[case::blt_signed(b().blt(1, 2, 8).build(), 0xFFFF_FFFF, 0, 8)]
#[case::bltu_unsigned(b().bltu(1, 2, 8).build(), 0xFFFF_FFFF, 0, 4)]
fn test_branches(#[case] inst: u32, #[case] rs1: u32, #[case] rs2: u32, #[case] next_pc: u32) {
    let mut tc = TestContext::new().load_program(0, &[inst]);
    tc.set_reg(1, rs1);
    tc.set_reg(2, rs2);
    tc.step_n(1);
    assert_eq!(tc.cpu.pc, next_pc);
}

#[test]
fn test_branch_stats() {
    let mut tc = TestContext::new().load_program(
        0,
        &[b().beq(0, 0, 8).build(), NOP_INSTR, b().bne(0, 0, 8).build()],
    );
    tc.step_n(2);
    assert_eq!(tc.cpu.stats.inst_branch, 2);
    assert_eq!(tc.cpu.stats.branches_taken, 1);
}

#[test]
fn test_ret_halts_after_executing() {
    let mut tc = TestContext::new().load_program(0, &[RET_INSTR]);
    tc.set_reg(1, 0x80);
    assert_eq!(tc.step().unwrap(), StepOutcome::Halted);
    assert_eq!(tc.cpu.pc, 0x80);
    assert_eq!(tc.cpu.get_step_count(), 1);
}

#[test]
fn test_illegal_funct7_sets_trap_csrs() {
    let bad = b().add(3, 1, 2).funct7(0b0000001).build();
    let mut tc = TestContext::new().load_program(0x20, &[bad]);
    let err = tc.step().unwrap_err();
    assert!(matches!(err, CpuError::IllegalInstruction { pc: 0x20, .. }));
    assert_eq!(tc.cpu.mcause, MCAUSE_ILLEGAL_INSTRUCTION);
    assert_eq!(tc.cpu.mepc, 0x20);
    assert_eq!(tc.cpu.pc, 0x20);
    assert_eq!(tc.cpu.get_cycle_count(), 0);
    assert_eq!(
        tc.cpu.get_pending_exception_string().as_deref(),
        Some("Pending exception: mcause=0x00000002")
    );
}

#[test]
fn test_unsupported_opcode() {
    // ecall
    let mut tc = TestContext::new().load_program(0, &[0x0000_0073]);
    let err = tc.step().unwrap_err();
    assert!(matches!(err, CpuError::UnsupportedOpcode { name: "SYSTEM", .. }));
    assert_eq!(tc.cpu.stats.exceptions, 1);
}

#[test]
fn test_fetch_outside_ram() {
    let mut tc = TestContext::new();
    tc.cpu.pc = 0xFFFF_FFF0;
    assert!(matches!(tc.step(), Err(CpuError::Memory { .. })));
    assert_eq!(tc.cpu.mcause, MCAUSE_INSTRUCTION_ACCESS_FAULT);
}

#[test]
fn test_disabled_cpu_does_not_step() {
    let mut tc = TestContext::new().load_program(0, &[NOP_INSTR]);
    assert_eq!(tc.cpu.disable_processor(), 0);
    assert_eq!(tc.step(), Err(CpuError::Disabled));
    assert_eq!(tc.cpu.pc, 0);
}

#[test]
fn test_run_until_ret() {
    // a0 = 5; loop: a0 -= 1; bnez a0, loop; ret
    let program = [
        b().addi(10, 0, 5).build(),
        b().addi(10, 10, -1).build(),
        b().bne(10, 0, -4).build(),
        RET_INSTR,
    ];
    let mut tc = TestContext::new().load_program(0, &program);
    tc.set_reg(1, 0x100);
    assert_eq!(tc.run(1000).unwrap(), RunExit::Halted);
    assert_eq!(tc.get_reg(10), 0);
    assert_eq!(tc.cpu.get_step_count(), 1 + 5 * 2 + 1);
}

#[test]
fn test_run_stops_at_step_limit() {
    // j . (infinite loop)
    let mut tc = TestContext::new().load_program(0, &[b().jal(0, 0).build()]);
    assert_eq!(tc.run(10).unwrap(), RunExit::StepLimit);
    assert_eq!(tc.cpu.get_step_count(), 10);
}

#[test]
fn test_event_callback_can_stop_run() {
    let mut tc = TestContext::new().load_program(0, &[b().jal(0, 0).build()]);
    let handle = tc.cpu.stop_handle();
    let class = Arc::new(EventClass::new("stopper").with_callback(move |_| handle.request()));
    tc.cpu.post_cycle(&class, Some("riscv_cpu0"), 3, 0).unwrap();

    assert_eq!(tc.run(100).unwrap(), RunExit::Stopped);
    assert_eq!(tc.cpu.get_cycle_count(), 3);
    assert_eq!(tc.cpu.stats.events_fired, 1);
}

#[test]
fn test_events_do_not_fire_while_stopped() {
    let mut tc = TestContext::new().load_program(0, &[NOP_INSTR, NOP_INSTR]);
    let class = Arc::new(EventClass::new("c"));
    tc.cpu.post_cycle(&class, None, 1, 0).unwrap();
    tc.step_n(1);
    assert_eq!(tc.cpu.events().len(), 1);

    tc.cpu.run();
    tc.step_n(1);
    assert!(tc.cpu.events().is_empty());
}
