//! # Command Tests
//!
//! `info`/`status` registration, `"<object>.<command>"` dispatch, and module checks.

use pretty_assertions::assert_eq;

use riscv_vp_core::common::SimError;
use riscv_vp_core::host::{AttrValue, CommandKind, Host};
use riscv_vp_core::modules::riscv_cpu;

fn host_with_cpu() -> (Host, String) {
    let mut host = Host::new();
    riscv_cpu::register(&mut host).unwrap();
    let name = riscv_cpu::create_riscv_cpu(&mut host, None).unwrap();
    (host, name)
}

#[test]
fn test_command_kind_names() {
    assert_eq!(CommandKind::from_name("info"), Some(CommandKind::Info));
    assert_eq!(CommandKind::from_name("status"), Some(CommandKind::Status));
    assert_eq!(CommandKind::from_name("describe"), None);
    assert_eq!(CommandKind::Status.name(), "status");
}

#[test]
fn test_info_has_header_only() {
    let (host, name) = host_with_cpu();
    let out = host.run_command(&format!("{name}.info")).unwrap();
    assert_eq!(
        out,
        "Information about riscv_cpu0 [class riscv_cpu]\n\
         ==============================================\n"
    );
}

#[test]
fn test_status_reports_value_attribute() {
    let (mut host, name) = host_with_cpu();
    host.set_attribute(&name, "value", AttrValue::UInt(9)).unwrap();
    let out = host.run_command(&format!("{name}.status")).unwrap();
    assert!(out.starts_with("Status of riscv_cpu0 [class riscv_cpu]\n"));
    assert!(out.ends_with("\nRegisters:\nValue : 9\n"));
}

#[test]
fn test_command_sections() {
    let (host, name) = host_with_cpu();
    assert!(host.command_sections(&name, CommandKind::Info).unwrap().is_empty());
    let status = host.command_sections(&name, CommandKind::Status).unwrap();
    assert_eq!(status[0].0, "Registers");
}

#[test]
fn test_run_command_errors_are_general() {
    let (host, name) = host_with_cpu();
    for line in [
        "nothing".to_owned(),
        format!("{name}.describe"),
        "ghost.info".to_owned(),
    ] {
        let err = host.run_command(&line).unwrap_err();
        assert!(matches!(err, SimError::General(_)), "{line}: {err:?}");
    }
    assert_eq!(
        host.run_command("ghost.status").unwrap_err().to_string(),
        "lookup error: no object named 'ghost'"
    );
}

#[test]
fn test_failing_callback_is_reported() {
    let (mut host, name) = host_with_cpu();
    host.new_info_command(riscv_cpu::CLASS_NAME, |_| {
        Err(SimError::Attribute("broken".to_owned()))
    });
    assert_eq!(
        host.run_command(&format!("{name}.info")),
        Err(SimError::General("attribute error: broken".to_owned()))
    );
}

#[test]
fn test_check_for_info_status() {
    let (mut host, _) = host_with_cpu();
    assert_eq!(host.check_for_info_status(&[riscv_cpu::MODULE_NAME]), Ok(()));
    assert!(host.check_for_info_status(&["uart"]).is_err());

    host.register_module("partial", &["widget"]);
    host.new_info_command("widget", |_| Ok(Vec::new()));
    let err = host.check_for_info_status(&["partial"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "class 'widget' in module 'partial' has no 'status' command"
    );
}
