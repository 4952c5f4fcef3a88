//! # Statistics Tests

use riscv_vp_core::stats::SimStats;

use crate::common::builder::instruction::InstructionBuilder;
use crate::common::harness::TestContext;

#[test]
fn test_branch_taken_rate() {
    let mut stats = SimStats::default();
    assert!(stats.branch_taken_rate().abs() < f64::EPSILON);
    stats.inst_branch = 4;
    stats.branches_taken = 1;
    assert!((stats.branch_taken_rate() - 25.0).abs() < f64::EPSILON);
}

#[test]
fn test_instruction_mix() {
    let b = InstructionBuilder::new;
    let program = [
        b().lui(1, 0x1).build(),
        b().addi(2, 0, 0x100).build(),
        b().sw(2, 1, 0).build(),
        b().lw(3, 2, 0).build(),
        b().beq(1, 3, 8).build(),
        b().addi(4, 0, 1).build(),
        b().jal(0, 4).build(),
    ];
    let mut tc = TestContext::new().load_program(0, &program);
    tc.step_n(6);

    let stats = &tc.cpu.stats;
    assert_eq!(stats.inst_upper, 1);
    assert_eq!(stats.inst_alu, 1);
    assert_eq!(stats.inst_store, 1);
    assert_eq!(stats.inst_load, 1);
    assert_eq!(stats.inst_branch, 1);
    assert_eq!(stats.branches_taken, 1);
    assert_eq!(stats.inst_jump, 1);
    assert_eq!(stats.cycles, 6);
    assert_eq!(stats.instructions_retired, 6);
}

#[test]
fn test_serializes_counters_only() {
    let mut stats = SimStats::default();
    stats.cycles = 3;
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["cycles"], 3);
    assert!(json.get("start_time").is_none());
}
