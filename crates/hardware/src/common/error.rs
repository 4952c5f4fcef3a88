//! Error definitions.
//!
//! This module defines the error types shared by the CPU model and the host layer. It provides:
//! 1. **Memory Errors:** Out-of-range physical accesses.
//! 2. **CPU Errors:** Illegal encodings, unsupported opcodes, and invalid register numbers.
//! 3. **Event Errors:** Rejected cycle, step, and time postings.
//! 4. **Host Errors:** The general simulation exception raised by commands and configuration.

use thiserror::Error;

/// Errors raised by physical memory accesses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The access `[addr, addr + size)` falls outside the memory.
    #[error("physical access out of range: addr={addr:#010x}, size={size}, limit={limit:#x}")]
    OutOfRange {
        /// First byte of the access.
        addr: u32,
        /// Access width in bytes.
        size: usize,
        /// Size of the backing memory in bytes.
        limit: usize,
    },
}

/// Errors raised while fetching, decoding, or executing an instruction, or while
/// accessing architectural state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CpuError {
    /// A register number outside `0..=36` was used.
    #[error("invalid register number {0}")]
    InvalidRegister(i64),

    /// The instruction encoding is not valid for its opcode (bad funct3/funct7).
    #[error("illegal instruction {instr:#010x} at pc={pc:#010x}: {reason}")]
    IllegalInstruction {
        /// Raw instruction encoding.
        instr: u32,
        /// Address of the instruction.
        pc: u32,
        /// What was wrong with the encoding.
        reason: &'static str,
    },

    /// The major opcode is not implemented by this model.
    #[error("unsupported opcode {name} ({opcode:#07b}) at pc={pc:#010x}")]
    UnsupportedOpcode {
        /// 5-bit major opcode.
        opcode: u32,
        /// Symbolic opcode name.
        name: &'static str,
        /// Address of the instruction.
        pc: u32,
    },

    /// A memory access made by the instruction failed.
    #[error("memory fault at pc={pc:#010x}: {source}")]
    Memory {
        /// Address of the faulting instruction.
        pc: u32,
        /// Underlying memory error.
        #[source]
        source: MemoryError,
    },

    /// The processor is disabled and cannot execute.
    #[error("processor is disabled")]
    Disabled,
}

/// Errors raised when posting events on the cycle, time, or step queues.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostError {
    /// The requested delay is negative.
    #[error("posting on negative time")]
    NegativeTime,

    /// Machine-sync events must go through the global time queue.
    #[error(
        "machine sync event can not be posted directly on a cpu; use post_time() or post_cycle() on the clock instead"
    )]
    MachineSync,

    /// The delay does not fit in the cycle counter.
    #[error("posting too far ahead")]
    TooFarAhead,

    /// The time value cannot be represented in simulation time.
    #[error("post_time(): posting time can not be represented in simulation time")]
    Unrepresentable,

    /// The clock has no frequency, so time cannot be converted to cycles.
    #[error("clock frequency is zero")]
    NoFrequency,
}

/// The host's simulation exceptions.
///
/// Command-line dispatch reports every failure as [`SimError::General`]. Configuration and
/// attribute access use the more specific variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// General simulation failure.
    #[error("{0}")]
    General(String),

    /// An attribute could not be read or written.
    #[error("attribute error: {0}")]
    Attribute(String),

    /// A named object or class does not exist.
    #[error("lookup error: {0}")]
    Lookup(String),
}

impl SimError {
    /// Folds any simulation error into the general exception, keeping its message.
    pub fn into_general(self) -> Self {
        match self {
            Self::General(_) => self,
            other => Self::General(other.to_string()),
        }
    }
}

impl From<CpuError> for SimError {
    fn from(err: CpuError) -> Self {
        Self::General(err.to_string())
    }
}
