//! RV32I General-Purpose Register File.
//!
//! This module implements the integer register file of the CPU model. It performs:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`), each 32 bits wide.
//! 2. **Invariant Enforcement:** Ensures that register `x0` is hardwired to zero.
//! 3. **Observability:** Iteration over register values for dumps and status output.

use crate::common::constants::GP_REG_NUM;

/// General-purpose register file.
///
/// Register `x0` is hardwired to zero: writes to it are dropped and reads always
/// return 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; GP_REG_NUM],
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index; only the low 5 bits are used.
    ///
    /// # Returns
    ///
    /// The 32-bit register value. Register `x0` always returns 0.
    #[inline]
    pub fn read(&self, idx: usize) -> u32 {
        let idx = idx & (GP_REG_NUM - 1);
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index; only the low 5 bits are used.
    /// * `val` - The 32-bit value to write. Writes to `x0` are ignored.
    #[inline]
    pub fn write(&mut self, idx: usize, val: u32) {
        let idx = idx & (GP_REG_NUM - 1);
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Resets every register to zero.
    pub fn clear(&mut self) {
        self.regs.fill(0);
    }

    /// Iterates over `(index, value)` pairs for `x0`-`x31`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.regs.iter().copied().enumerate()
    }
}
