//! # Configuration Loading Tests

use std::io::Write as _;

use riscv_vp_core::Config;
use riscv_vp_core::config::ConfigError;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.cpu.freq_hz, 100_000_000);
    assert!(config.cpu.enabled);
    assert_eq!(config.memory.ram_size, 64 * 1024);
    assert_eq!(config.memory.load_addr, 0);
    assert_eq!(config.general.start_pc, 0);
    assert_eq!(config.general.max_steps, None);
    assert!(!config.general.trace_instructions);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = Config::from_json_str(r#"{"cpu": {"freq_hz": 50000000}}"#).unwrap();
    assert_eq!(config.cpu.freq_hz, 50_000_000);
    assert!(config.cpu.enabled);
    assert_eq!(config.memory.ram_size, 64 * 1024);

    let empty = Config::from_json_str("{}").unwrap();
    assert_eq!(empty.cpu.freq_hz, 100_000_000);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        Config::from_json_str(r#"{"cpu": {"freq_hz": "fast"}}"#),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(Config::from_json_str("{"), Err(ConfigError::Parse(_))));
}

#[test]
fn test_validation() {
    assert!(matches!(
        Config::from_json_str(r#"{"cpu": {"freq_hz": 0}}"#),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        Config::from_json_str(r#"{"memory": {"ram_size": 0}}"#),
        Err(ConfigError::Invalid(_))
    ));
    let err = Config::from_json_str(r#"{"memory": {"ram_size": 256, "load_addr": 256}}"#)
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid config: memory.load_addr 0x100 is outside RAM");
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"general": {{"trace_instructions": true, "max_steps": 10}}}}"#).unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert!(config.general.trace_instructions);
    assert_eq!(config.general.max_steps, Some(10));

    assert!(matches!(
        Config::from_file("/nonexistent/config.json"),
        Err(ConfigError::Io { .. })
    ));
}
