//! Global Model Constants.
//!
//! This module defines constants shared across the CPU model. It includes:
//! 1. **Memory Constants:** RAM address width, size, and the reset address.
//! 2. **Register Constants:** General-purpose and total register counts.
//! 3. **Instruction Constants:** Instruction size and the special encodings that
//!    drive the run loop (`ret`, `nop`).
//! 4. **Timing Constants:** Default clock frequency and picosecond scale.

/// Width of a physical RAM address in bits.
pub const RAM_ADDR_WIDTH: u32 = 16;

/// Size of the RAM in bytes (64 KiB).
pub const RAM_SIZE: usize = 1 << RAM_ADDR_WIDTH;

/// Address the program counter holds after reset.
pub const RESET_ADDR: u32 = 0;

/// Size of a standard (32-bit) RISC-V instruction in bytes.
pub const INSTR_SIZE: u32 = 4;

/// Number of RV32I general-purpose registers (`x0`-`x31`).
pub const GP_REG_NUM: usize = 32;

/// Number of registers exposed through the register interface.
///
/// The 32 GPRs followed by `pc`, `mstatus`, `mepc`, `mcause` and `mtvec`.
pub const ALL_REGS_NUM: usize = 37;

/// Encoding of `ret` (`jalr x0, 0(ra)`). The run loop halts after executing it.
pub const RET_INSTR: u32 = 0x0000_8067;

/// Encoding of the canonical `nop` (`addi x0, x0, 0`).
pub const NOP_INSTR: u32 = 0x0000_0013;

/// Default core clock frequency (100 MHz).
pub const DEFAULT_FREQ_HZ: u64 = 100_000_000;

/// One second expressed in picoseconds.
pub const ONE_SECOND_AS_PS: i128 = 1_000_000_000_000;

/// `mcause` code for an illegal instruction exception.
pub const MCAUSE_ILLEGAL_INSTRUCTION: u32 = 2;

/// `mcause` code for a load access fault.
pub const MCAUSE_LOAD_ACCESS_FAULT: u32 = 5;

/// `mcause` code for a store access fault.
pub const MCAUSE_STORE_ACCESS_FAULT: u32 = 7;

/// `mcause` code for an instruction access fault.
pub const MCAUSE_INSTRUCTION_ACCESS_FAULT: u32 = 1;
