//! # Register Interface Tests

use pretty_assertions::assert_eq;
use rstest::rstest;

use riscv_vp_core::common::CpuError;
use riscv_vp_core::core::RiscvCpu;
use riscv_vp_core::core::cpu::registers::{REG_MCAUSE, REG_PC, RegInfo};

#[rstest]
#[case("x0", Some(0))]
#[case("x31", Some(31))]
#[case("a0", Some(10))]
#[case("fp", Some(8))]
#[case("pc", Some(32))]
#[case("mstatus", Some(33))]
#[case("mepc", Some(34))]
#[case("mcause", Some(35))]
#[case("mtvec", Some(36))]
#[case("x37", None)]
#[case("bogus", None)]
fn test_get_number(#[case] name: &str, #[case] expected: Option<usize>) {
    assert_eq!(RiscvCpu::new("cpu").get_number(name), expected);
}

#[test]
fn test_get_name() {
    let cpu = RiscvCpu::new("cpu");
    assert_eq!(cpu.get_name(5).as_deref(), Some("x5"));
    assert_eq!(cpu.get_name(36).as_deref(), Some("mtvec"));
    assert_eq!(cpu.get_name(37), None);
}

#[test]
fn test_read_write_roundtrip() {
    let mut cpu = RiscvCpu::new("cpu");
    cpu.write_register(7, 0xABCD).unwrap();
    cpu.write_register(REG_PC, 0x40).unwrap();
    cpu.write_register(REG_MCAUSE, 2).unwrap();
    assert_eq!(cpu.read_register(7), Ok(0xABCD));
    assert_eq!(cpu.pc, 0x40);
    assert_eq!(cpu.read_register(REG_MCAUSE), Ok(2));
}

#[test]
fn test_write_truncates_and_ignores_x0() {
    let mut cpu = RiscvCpu::new("cpu");
    cpu.write_register(0, 99).unwrap();
    cpu.write_register(1, 0x1_0000_0001).unwrap();
    assert_eq!(cpu.read_register(0), Ok(0));
    assert_eq!(cpu.read_register(1), Ok(1));
}

#[test]
fn test_invalid_register_number() {
    let mut cpu = RiscvCpu::new("cpu");
    assert_eq!(cpu.read_register(37), Err(CpuError::InvalidRegister(37)));
    assert_eq!(cpu.write_register(100, 0), Err(CpuError::InvalidRegister(100)));
}

#[test]
fn test_all_registers() {
    let mut cpu = RiscvCpu::new("cpu");
    cpu.regs.write(10, 5);
    cpu.mtvec = 0x100;
    let all = cpu.all_registers();
    assert_eq!(all.len(), 37);
    assert_eq!(all[0], ("x0".to_owned(), 0));
    assert_eq!(all[10], ("x10".to_owned(), 5));
    assert_eq!(all[36], ("mtvec".to_owned(), 0x100));
}

#[test]
fn test_register_info_catchable() {
    let cpu = RiscvCpu::new("cpu");
    assert_eq!(cpu.register_info(0, RegInfo::Catchable), Some(0));
    assert_eq!(cpu.register_info(36, RegInfo::Catchable), Some(0));
    assert_eq!(cpu.register_info(37, RegInfo::Catchable), None);
}
