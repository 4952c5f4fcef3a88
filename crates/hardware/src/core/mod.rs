//! Core processor implementation.
//!
//! This module contains the CPU model together with the pieces it is built from:
//! physical memory, the event queues, and cycle/time arithmetic.

/// CPU state, execution, and the processor-facing interfaces.
pub mod cpu;

/// Ordered event queues for cycle and step events.
pub mod events;

/// Physical memory trait and the default RAM.
pub mod memory;

/// Conversions between cycles and picoseconds.
pub mod time;

pub use self::cpu::RiscvCpu;
