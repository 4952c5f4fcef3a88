//! RISC-V Application Binary Interface (ABI) register names.
//!
//! Defines the standard ABI names of the 32 integer registers and the indices
//! the disassembler and the register interface treat specially.

/// ABI register names for x0-x31.
pub const REG_NAMES: [&str; 32] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Register x0 (zero register, always zero).
pub const REG_ZERO: usize = 0;
/// Register x1 (return address, ra).
pub const REG_RA: usize = 1;
/// Register x2 (stack pointer, sp).
pub const REG_SP: usize = 2;
/// Register x10 (first argument/return value, a0).
pub const REG_A0: usize = 10;

/// Returns the ABI name of an integer register, or `None` past x31.
#[inline]
pub fn abi_name(idx: usize) -> Option<&'static str> {
    REG_NAMES.get(idx).copied()
}

/// Looks up an integer register by ABI name (`"sp"`) or numeric name (`"x2"`).
pub fn index_of(name: &str) -> Option<usize> {
    if let Some(idx) = REG_NAMES.iter().position(|&n| n == name) {
        return Some(idx);
    }
    // s0 doubles as the frame pointer.
    if name == "fp" {
        return Some(8);
    }
    let idx: usize = name.strip_prefix('x')?.parse().ok()?;
    (idx < REG_NAMES.len()).then_some(idx)
}
