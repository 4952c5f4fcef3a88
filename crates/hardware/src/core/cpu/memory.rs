//! Load and Store Execution.
//!
//! Implements the RV32I data-memory instructions on top of the physical memory seam.
//! Addresses are `rs1 + imm` with wrapping arithmetic. Accesses need not be aligned;
//! an access with any byte outside memory faults.

use tracing::trace;

use super::RiscvCpu;
use crate::common::error::CpuError;
use crate::isa::instruction::Decoded;
use crate::isa::rv32i::funct3 as f3;

impl RiscvCpu {
    /// Executes a load and writes the extended value to `rd`.
    pub(crate) fn exec_load(&mut self, d: &Decoded, rs1: u32) -> Result<(), CpuError> {
        let addr = rs1.wrapping_add(d.imm as u32);
        let pc = self.pc;
        let fault = |source| CpuError::Memory { pc, source };
        let val = match d.funct3 {
            f3::LB => self.memory.read_u8(addr).map_err(fault)? as i8 as i32 as u32,
            f3::LH => self.memory.read_u16(addr).map_err(fault)? as i16 as i32 as u32,
            f3::LW => self.memory.read_u32(addr).map_err(fault)?,
            f3::LBU => u32::from(self.memory.read_u8(addr).map_err(fault)?),
            f3::LHU => u32::from(self.memory.read_u16(addr).map_err(fault)?),
            _ => return Err(self.illegal(d, "unsupported LOAD funct3")),
        };
        trace!(cpu = %self.name, addr = format_args!("{addr:#010x}"), val, "load");
        self.regs.write(d.rd, val);
        Ok(())
    }

    /// Executes a store of the low bytes of `rs2`.
    pub(crate) fn exec_store(&mut self, d: &Decoded, rs1: u32, rs2: u32) -> Result<(), CpuError> {
        let addr = rs1.wrapping_add(d.imm as u32);
        let pc = self.pc;
        let fault = |source| CpuError::Memory { pc, source };
        match d.funct3 {
            f3::SB => self.memory.write_u8(addr, rs2 as u8).map_err(fault)?,
            f3::SH => self.memory.write_u16(addr, rs2 as u16).map_err(fault)?,
            f3::SW => self.memory.write_u32(addr, rs2).map_err(fault)?,
            _ => return Err(self.illegal(d, "unsupported STORE funct3")),
        }
        trace!(cpu = %self.name, addr = format_args!("{addr:#010x}"), val = rs2, "store");
        Ok(())
    }
}
