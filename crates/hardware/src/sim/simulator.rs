//! Simulator: owns the host session and the CPU object living in it.
//!
//! The CPU is created through the `riscv_cpu` class factory, exactly as any other
//! host object, and reached again by name through a typed downcast.

use tracing::info;

use super::loader::{self, LoadedImage};
use crate::common::error::SimError;
use crate::config::Config;
use crate::core::RiscvCpu;
use crate::core::cpu::execution::RunExit;
use crate::host::Host;
use crate::modules::riscv_cpu;
use crate::stats::SimStats;

/// Top-level simulator: a host with the `riscv-cpu` module loaded and one CPU.
#[derive(Debug)]
pub struct Simulator {
    host: Host,
    cpu_name: String,
    config: Config,
}

impl Simulator {
    /// Creates a host, registers the `riscv-cpu` module, and creates one CPU.
    pub fn new(config: Config) -> Result<Self, SimError> {
        let mut host = Host::new();
        riscv_cpu::register_with_config(&mut host, config.clone())?;
        let cpu_name = riscv_cpu::create_riscv_cpu(&mut host, None)?;
        Ok(Self {
            host,
            cpu_name,
            config,
        })
    }

    /// Returns the host session.
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the host session for modification.
    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    /// Returns the name of the CPU object.
    pub fn cpu_name(&self) -> &str {
        &self.cpu_name
    }

    /// Returns the CPU.
    pub fn cpu(&self) -> Result<&RiscvCpu, SimError> {
        self.host.get_object_as::<RiscvCpu>(&self.cpu_name)
    }

    /// Returns the CPU for modification.
    pub fn cpu_mut(&mut self) -> Result<&mut RiscvCpu, SimError> {
        self.host.get_object_as_mut::<RiscvCpu>(&self.cpu_name)
    }

    /// Reads a program from disk, loads it, and points the PC at its entry.
    pub fn load_program(&mut self, path: &str) -> Result<LoadedImage, SimError> {
        let data = loader::load_binary(path)?;
        self.load_image(&data)
    }

    /// Loads an in-memory image and points the PC at its entry.
    pub fn load_image(&mut self, data: &[u8]) -> Result<LoadedImage, SimError> {
        let load_addr = self.config.memory.load_addr;
        let cpu = self.cpu_mut()?;
        let image = loader::load_image(cpu.memory_mut(), data, load_addr)?;
        cpu.pc = image.entry;
        info!(cpu = %cpu.name, entry = format_args!("{:#010x}", image.entry), kind = ?image.kind, "program loaded");
        Ok(image)
    }

    /// Runs until `ret`, a stop request, or the step limit.
    ///
    /// `max_steps` overrides the configured limit when given.
    pub fn run(&mut self, max_steps: Option<u64>) -> Result<RunExit, SimError> {
        let limit = max_steps.or(self.config.general.max_steps);
        let cpu = self.cpu_mut()?;
        Ok(cpu.run_until_halt(limit)?)
    }

    /// Executes a host command line such as `"riscv_cpu0.status"`.
    pub fn run_command(&self, line: &str) -> Result<String, SimError> {
        self.host.run_command(line)
    }

    /// Returns the CPU's execution statistics.
    pub fn stats(&self) -> Result<&SimStats, SimError> {
        Ok(&self.cpu()?.stats)
    }
}
