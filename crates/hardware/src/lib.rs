//! RISC-V virtual platform library.
//!
//! This crate implements a single-core, in-order, non-pipelined RV32I CPU model
//! together with a small virtual-platform host:
//! 1. **Core:** Registers, fetch/decode/execute, cycle and step counters, event queues, and time.
//! 2. **ISA:** Opcode tables, format classification, decoding, and disassembly.
//! 3. **Host:** Classes, objects, attributes, configuration, and `info`/`status` commands.
//! 4. **Modules:** The `riscv-cpu` module that plugs the CPU into the host.
//! 5. **Simulation:** Program loading, configuration, and statistics collection.

/// Common types and constants (registers, errors, model geometry).
pub mod common;
/// Platform configuration (defaults and JSON loading).
pub mod config;
/// CPU core (memory, events, time, execution).
pub mod core;
/// Virtual-platform host (objects, configuration, commands).
pub mod host;
/// Instruction set (opcodes, formats, decoder, disassembler, ABI names).
pub mod isa;
/// Loadable modules registering classes with the host.
pub mod modules;
/// Program loader and simulator.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load it from JSON.
pub use crate::config::Config;
/// The CPU model; created standalone or through the `riscv_cpu` class.
pub use crate::core::RiscvCpu;
/// Host session holding classes, objects, and commands.
pub use crate::host::Host;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
