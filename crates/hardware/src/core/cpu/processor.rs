//! Processor Control, Info, and CLI.
//!
//! This module implements the processor-facing interfaces of the CPU. It provides:
//! 1. **Execute control:** `run`, `stop`, `switch_in`, `switch_out`.
//! 2. **Processor info:** Architecture, endianness, address widths, enable state, and
//!    identity address translation (there is no MMU).
//! 3. **Processor CLI:** Disassembly, register dumps, and pending-exception reporting.

use std::fmt::Write as _;

use tracing::{info, trace};

use super::{ExecuteState, RiscvCpu};
use crate::common::constants::{ALL_REGS_NUM, GP_REG_NUM, INSTR_SIZE, RAM_ADDR_WIDTH};
use crate::core::cpu::registers::{REG_MEPC, REG_MSTATUS, REG_MTVEC, REG_PC};
use crate::isa::disasm::{disassemble_word, reg_name};

/// Name used as the CPU prefix in disassembly output.
pub const CPU_PREFIX: &str = "riscv_cpu";

/// Byte order of the processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endian {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

/// Privilege mode reported to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessorMode {
    /// Supervisor mode.
    Supervisor,
    /// Hypervisor mode.
    Hypervisor,
    /// User mode.
    User,
}

/// Result of an address translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhysicalBlock {
    /// Whether the translation succeeded.
    pub valid: bool,
    /// Translated address.
    pub address: u64,
    /// First address of the translated block.
    pub block_start: u64,
    /// Last address of the translated block (inclusive).
    pub block_end: u64,
}

impl PhysicalBlock {
    /// An identity-mapped block covering one instruction word at `address`.
    pub const fn identity(address: u64) -> Self {
        Self {
            valid: true,
            address,
            block_start: address,
            block_end: address.saturating_add(INSTR_SIZE as u64 - 1),
        }
    }
}

/// Description of the physical memory attached to the CPU.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryDescriptor {
    /// Memory name.
    pub name: String,
    /// Size in bytes.
    pub size: usize,
}

fn prefix_is_valid(prefix: &str) -> bool {
    matches!(prefix.chars().next(), Some('p' | 'l' | 'v'))
}

impl RiscvCpu {
    /// Starts execution. Due events are dispatched while running.
    pub fn run(&mut self) {
        self.state = ExecuteState::Running;
    }

    /// Stops execution.
    pub fn stop(&mut self) {
        self.state = ExecuteState::Stopped;
    }

    /// Called when this CPU becomes the active one. Nothing to set up.
    pub fn switch_in(&mut self) {
        trace!(cpu = %self.name, "switch in");
    }

    /// Called when this CPU stops being the active one. Nothing to save.
    pub fn switch_out(&mut self) {
        trace!(cpu = %self.name, "switch out");
    }

    /// Returns the execute state.
    pub fn state(&self) -> ExecuteState {
        self.state
    }

    /// Returns the architecture name.
    pub fn architecture(&self) -> &'static str {
        "riscv"
    }

    /// Returns the byte order.
    pub fn get_endian(&self) -> Endian {
        Endian::Little
    }

    /// Returns the logical address width in bits.
    pub fn get_logical_address_width(&self) -> u32 {
        RAM_ADDR_WIDTH
    }

    /// Returns the physical address width in bits.
    pub fn get_physical_address_width(&self) -> u32 {
        RAM_ADDR_WIDTH
    }

    /// Translates a logical address. Without an MMU the mapping is the identity.
    pub fn logical_to_physical(&self, address: u64) -> PhysicalBlock {
        PhysicalBlock::identity(address)
    }

    /// Returns the current privilege mode.
    pub fn get_processor_mode(&self) -> ProcessorMode {
        ProcessorMode::User
    }

    /// Enables the processor.
    ///
    /// # Returns
    ///
    /// 1 if it was already enabled, 0 if the state changed.
    pub fn enable_processor(&mut self) -> i32 {
        if self.enabled {
            trace!(cpu = %self.name, "Processor already enabled");
            return 1;
        }
        info!(cpu = %self.name, "Enabling processor");
        self.enabled = true;
        0
    }

    /// Disables the processor.
    ///
    /// # Returns
    ///
    /// 1 if it was already disabled, 0 if the state changed.
    pub fn disable_processor(&mut self) -> i32 {
        if !self.enabled {
            trace!(cpu = %self.name, "Processor already disabled");
            return 1;
        }
        info!(cpu = %self.name, "Disabling processor");
        self.enabled = false;
        0
    }

    /// Returns 1 if the processor is enabled, 0 otherwise.
    pub fn get_enabled(&self) -> i32 {
        i32::from(self.enabled)
    }

    /// Returns the program counter.
    pub fn get_program_counter(&self) -> u64 {
        u64::from(self.pc)
    }

    /// Sets the program counter (truncated to 32 bits).
    pub fn set_program_counter(&mut self, pc: u64) {
        self.pc = pc as u32;
    }

    /// Describes the attached physical memory.
    pub fn get_physical_memory(&self) -> MemoryDescriptor {
        MemoryDescriptor {
            name: self.memory.name().to_owned(),
            size: self.memory.size(),
        }
    }

    /// Disassembles the instruction in `data`, located at `address`.
    ///
    /// # Returns
    ///
    /// `(length, text)`; `(0, "")` when fewer than four bytes are supplied or
    /// `address` does not fit the 32-bit address space.
    pub fn disassemble(&self, address: u64, data: &[u8]) -> (usize, String) {
        let Some(word) = data.first_chunk::<4>() else {
            trace!(
                cpu = %self.name,
                size = data.len(),
                "Invalid instruction data size at address: {address:#010x}"
            );
            return (0, String::new());
        };
        let Ok(pc) = u32::try_from(address) else {
            trace!(cpu = %self.name, "Address out of range: {address:#x}");
            return (0, String::new());
        };
        let instr = u32::from_le_bytes(*word);
        let text = disassemble_word(pc, instr);
        trace!(cpu = %self.name, "addr: {address:#010x} disassembled: {text}");
        (INSTR_SIZE as usize, text)
    }

    /// Disassembles the instruction at `address` in memory.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Address space: `p`, `l` or `v` (all equivalent); defaults to `p`.
    /// * `address` - Address of the instruction.
    /// * `print_cpu` - Prefix the text with the CPU name.
    /// * `mnemonic` - Returned verbatim with length 0 when given.
    ///
    /// # Returns
    ///
    /// `(length, text)`; text is `None` for an invalid prefix or unreadable memory.
    pub fn get_disassembly(
        &self,
        prefix: Option<&str>,
        address: u64,
        print_cpu: bool,
        mnemonic: Option<&str>,
    ) -> (usize, Option<String>) {
        let prefix = prefix.unwrap_or("p");
        if let Some(m) = mnemonic {
            return (0, Some(m.to_owned()));
        }
        if !prefix_is_valid(prefix) {
            trace!(cpu = %self.name, "Invalid address prefix: '{prefix}' at address: {address:#010x}");
            return (0, None);
        }
        let Ok(phys) = u32::try_from(address) else {
            trace!(cpu = %self.name, "Address out of range: {address:#x}");
            return (0, None);
        };
        let mut data = [0u8; INSTR_SIZE as usize];
        if let Err(e) = self.memory.read(phys, &mut data) {
            trace!(cpu = %self.name, "{e}");
            return (0, None);
        }
        let (len, text) = self.disassemble(address, &data);
        let text = if print_cpu {
            format!("{CPU_PREFIX}: {text}")
        } else {
            text
        };
        (len, Some(text))
    }

    /// Formats the general-purpose registers, one per line, as `x5 (t0) = 0x0000002A`.
    ///
    /// With `all`, `pc`, `mstatus`, `mepc` and `mtvec` follow.
    pub fn get_pregs(&self, all: bool) -> String {
        let mut out = String::new();
        for (i, val) in self.regs.iter() {
            let _ = writeln!(out, "{} ({}) = 0x{val:08X}", reg_name(i, false), reg_name(i, true));
        }
        if all {
            for reg in [REG_PC, REG_MSTATUS, REG_MEPC, REG_MTVEC] {
                if let (Some(name), Ok(val)) = (self.get_name(reg), self.read_register(reg)) {
                    let _ = writeln!(out, "{name} = 0x{val:08X}");
                }
            }
        }
        out
    }

    /// Returns the names of the registers compared between snapshots.
    ///
    /// ABI names for the general-purpose registers, then the special registers.
    pub fn get_diff_regs(&self) -> Vec<String> {
        (0..ALL_REGS_NUM)
            .filter_map(|r| {
                if r < GP_REG_NUM {
                    Some(reg_name(r, true).into_owned())
                } else {
                    self.get_name(r).map(|n| n.into_owned())
                }
            })
            .collect()
    }

    /// Describes the pending exception, if `mcause` is non-zero.
    pub fn get_pending_exception_string(&self) -> Option<String> {
        (self.mcause != 0).then(|| format!("Pending exception: mcause=0x{:08X}", self.mcause))
    }

    /// Returns the default address prefix.
    pub fn get_address_prefix(&self) -> &'static str {
        "p"
    }

    /// Translates `address` in the address space named by `prefix`.
    ///
    /// `p`, `l` and `v` map to the identity; any other prefix gives an invalid block.
    pub fn translate_to_physical(&self, prefix: &str, address: u64) -> PhysicalBlock {
        if prefix_is_valid(prefix) {
            PhysicalBlock::identity(address)
        } else {
            PhysicalBlock::default()
        }
    }
}
