//! Configuration system for the virtual platform.
//!
//! This module defines the configuration structures used to parameterize the CPU
//! model and the simulator. It provides:
//! 1. **Defaults:** Baseline values (100 MHz clock, 64 KiB RAM at address zero).
//! 2. **Structures:** Hierarchical config for general, CPU, and memory settings.
//! 3. **Loading:** JSON parsing from strings or files, followed by validation.
//!
//! Every field is optional in JSON; missing fields take their default.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Default configuration constants for the platform.
mod defaults {
    use crate::common::constants;

    /// Core clock frequency in Hz.
    pub const FREQ_HZ: u64 = constants::DEFAULT_FREQ_HZ;

    /// Size of the RAM in bytes.
    pub const RAM_SIZE: usize = constants::RAM_SIZE;

    /// Address the program counter starts from when no entry point is known.
    pub const START_PC: u32 = constants::RESET_ADDR;

    /// Address raw binaries are loaded at.
    pub const LOAD_ADDR: u32 = constants::RESET_ADDR;
}

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON or has fields of the wrong type.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the model cannot use.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Run-loop settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// CPU settings.
    #[serde(default)]
    pub cpu: CpuConfig,
    /// Memory settings.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks the values serde cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cpu.freq_hz == 0 {
            return Err(ConfigError::Invalid("cpu.freq_hz must be at least 1".into()));
        }
        if self.memory.ram_size == 0 || self.memory.ram_size as u64 > (1u64 << 32) {
            return Err(ConfigError::Invalid(format!(
                "memory.ram_size {} must be between 1 and 4 GiB",
                self.memory.ram_size
            )));
        }
        if self.memory.load_addr as usize >= self.memory.ram_size {
            return Err(ConfigError::Invalid(format!(
                "memory.load_addr {:#x} is outside RAM",
                self.memory.load_addr
            )));
        }
        Ok(())
    }
}

/// Run-loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Log every executed instruction at trace level.
    #[serde(default)]
    pub trace_instructions: bool,

    /// Program counter used when the program image has no entry point.
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u32,

    /// Step limit for a run; `None` runs until the program returns.
    #[serde(default)]
    pub max_steps: Option<u64>,
}

impl GeneralConfig {
    fn default_start_pc() -> u32 {
        defaults::START_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            start_pc: defaults::START_PC,
            max_steps: None,
        }
    }
}

/// CPU configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CpuConfig {
    /// Core clock frequency in Hz.
    #[serde(default = "CpuConfig::default_freq_hz")]
    pub freq_hz: u64,

    /// Whether the processor starts enabled.
    #[serde(default = "CpuConfig::default_enabled")]
    pub enabled: bool,
}

impl CpuConfig {
    fn default_freq_hz() -> u64 {
        defaults::FREQ_HZ
    }

    fn default_enabled() -> bool {
        true
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            freq_hz: defaults::FREQ_HZ,
            enabled: true,
        }
    }
}

/// Memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// RAM size in bytes.
    #[serde(default = "MemoryConfig::default_ram_size")]
    pub ram_size: usize,

    /// Address raw binaries are placed at.
    #[serde(default = "MemoryConfig::default_load_addr")]
    pub load_addr: u32,
}

impl MemoryConfig {
    fn default_ram_size() -> usize {
        defaults::RAM_SIZE
    }

    fn default_load_addr() -> u32 {
        defaults::LOAD_ADDR
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_size: defaults::RAM_SIZE,
            load_addr: defaults::LOAD_ADDR,
        }
    }
}
