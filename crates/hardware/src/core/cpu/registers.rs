//! Register Interface.
//!
//! Exposes the architectural registers by number and name. Numbers 0-31 are the
//! general-purpose registers; 32-36 are `pc`, `mstatus`, `mepc`, `mcause` and `mtvec`.

use std::borrow::Cow;

use super::RiscvCpu;
use crate::common::constants::{ALL_REGS_NUM, GP_REG_NUM};
use crate::common::error::CpuError;
use crate::isa::abi;
use crate::isa::disasm::reg_name;

/// Register number of the program counter.
pub const REG_PC: usize = 32;
/// Register number of `mstatus`.
pub const REG_MSTATUS: usize = 33;
/// Register number of `mepc`.
pub const REG_MEPC: usize = 34;
/// Register number of `mcause`.
pub const REG_MCAUSE: usize = 35;
/// Register number of `mtvec`.
pub const REG_MTVEC: usize = 36;

const SPECIAL_NAMES: [&str; ALL_REGS_NUM - GP_REG_NUM] = ["pc", "mstatus", "mepc", "mcause", "mtvec"];

/// Kinds of register metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegInfo {
    /// Whether accesses to the register can be caught by breakpoints.
    Catchable,
}

impl RiscvCpu {
    /// Looks up a register number by name.
    ///
    /// Accepts `pc`, `mstatus`, `mepc`, `mcause`, `mtvec`, numeric names (`x5`), and ABI
    /// names (`t0`).
    pub fn get_number(&self, name: &str) -> Option<usize> {
        SPECIAL_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| i + GP_REG_NUM)
            .or_else(|| abi::index_of(name))
    }

    /// Returns the name of register `reg`: `x0`-`x31` or a special register name.
    pub fn get_name(&self, reg: usize) -> Option<Cow<'static, str>> {
        match reg {
            r if r < GP_REG_NUM => Some(reg_name(r, false)),
            r if r < ALL_REGS_NUM => Some(Cow::Borrowed(SPECIAL_NAMES[r - GP_REG_NUM])),
            _ => None,
        }
    }

    /// Reads register `reg`.
    pub fn read_register(&self, reg: usize) -> Result<u64, CpuError> {
        let val = match reg {
            r if r < GP_REG_NUM => self.regs.read(r),
            REG_PC => self.pc,
            REG_MSTATUS => self.mstatus,
            REG_MEPC => self.mepc,
            REG_MCAUSE => self.mcause,
            REG_MTVEC => self.mtvec,
            _ => return Err(CpuError::InvalidRegister(reg as i64)),
        };
        Ok(u64::from(val))
    }

    /// Writes register `reg`, truncating `val` to 32 bits. Writes to `x0` are ignored.
    pub fn write_register(&mut self, reg: usize, val: u64) -> Result<(), CpuError> {
        let val = val as u32;
        match reg {
            r if r < GP_REG_NUM => self.regs.write(r, val),
            REG_PC => self.pc = val,
            REG_MSTATUS => self.mstatus = val,
            REG_MEPC => self.mepc = val,
            REG_MCAUSE => self.mcause = val,
            REG_MTVEC => self.mtvec = val,
            _ => return Err(CpuError::InvalidRegister(reg as i64)),
        }
        Ok(())
    }

    /// Returns every register as `(name, value)` in register-number order.
    pub fn all_registers(&self) -> Vec<(String, u64)> {
        (0..ALL_REGS_NUM)
            .filter_map(|r| {
                let name = self.get_name(r)?;
                let val = self.read_register(r).ok()?;
                Some((name.into_owned(), val))
            })
            .collect()
    }

    /// Returns register metadata, or `None` for an unknown register.
    ///
    /// No register is catchable, so `Catchable` reports 0 for every valid number.
    pub fn register_info(&self, reg: usize, info: RegInfo) -> Option<i32> {
        match info {
            RegInfo::Catchable if reg < ALL_REGS_NUM => Some(0),
            RegInfo::Catchable => None,
        }
    }
}
