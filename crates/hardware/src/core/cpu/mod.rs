//! CPU Core Definition and Initialization.
//!
//! This module defines the central `RiscvCpu` structure, the complete state of the
//! single-core, in-order, non-pipelined RV32I model. It coordinates the following:
//! 1. **State Management:** Registers, program counter, trap CSRs, and execute state.
//! 2. **Timing:** Cycle and step counters, the clock frequency, and the time offset.
//! 3. **Events:** The cycle and step queues drained after every instruction.
//! 4. **Memory:** The physical memory the core fetches from and accesses data in.

/// Cycle interface: time queries, cycle/time posting, and frequency changes.
pub mod cycle;

/// Fetch, decode, execute, and the run loop.
pub mod execution;

/// Load and store execution.
pub mod memory;

/// Execute control, processor info, and the processor CLI.
pub mod processor;

/// Register interface (numbers, names, read/write).
pub mod registers;

/// Step interface: step counting and step events.
pub mod step;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::common::RegisterFile;
use crate::common::constants::{DEFAULT_FREQ_HZ, RESET_ADDR};
use crate::config::Config;
use crate::core::events::EventQueue;
use crate::core::memory::{PhysicalMemory, Ram};
use crate::stats::SimStats;

/// Whether the processor is currently executing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExecuteState {
    /// Not executing; pending events are not dispatched.
    #[default]
    Stopped,
    /// Executing instructions.
    Running,
}

/// Shared flag that asks a running CPU to stop after the current instruction.
///
/// Event callbacks capture a handle to stop the run loop from inside an event.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Requests a stop.
    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clears a pending request and reports whether one was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Reports whether a stop is pending without clearing it.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The RV32I CPU model.
pub struct RiscvCpu {
    /// Object name (e.g., `"riscv_cpu0"`), attached to log records.
    pub name: String,
    /// General-purpose registers.
    pub regs: RegisterFile,
    /// Program counter.
    pub pc: u32,
    /// Machine status register.
    pub mstatus: u32,
    /// Machine exception program counter.
    pub mepc: u32,
    /// Machine trap cause.
    pub mcause: u32,
    /// Machine trap vector base.
    pub mtvec: u32,
    /// Free-form value attribute reported by the `status` command.
    pub value: u64,
    /// PC loaded on reset.
    pub(crate) start_pc: u32,

    /// Execute state controlled by `run`/`stop`.
    pub(crate) state: ExecuteState,
    /// Processor enable flag.
    pub(crate) enabled: bool,
    /// Core clock frequency in Hz.
    pub(crate) freq_hz: u64,
    /// Picoseconds at cycle zero; moves when the frequency changes.
    pub(crate) time_offset: i128,
    /// Cycles elapsed since reset.
    pub(crate) current_cycle: u64,
    /// Instructions executed since reset.
    pub(crate) current_step: u64,
    /// Events keyed on steps.
    pub(crate) step_queue: EventQueue,
    /// Events keyed on cycles.
    pub(crate) cycle_queue: EventQueue,
    /// Backing physical memory.
    pub(crate) memory: Box<dyn PhysicalMemory>,
    /// Pending stop request.
    pub(crate) stop_request: StopHandle,

    /// Log every executed instruction.
    pub trace: bool,
    /// Execution statistics.
    pub stats: SimStats,
}

impl RiscvCpu {
    /// Creates a CPU with the default 64 KiB RAM.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_memory(name, Box::new(Ram::default()))
    }

    /// Creates a CPU backed by `memory`.
    ///
    /// # Arguments
    ///
    /// * `name` - Object name used in logs.
    /// * `memory` - Physical memory the CPU fetches from.
    pub fn with_memory(name: impl Into<String>, memory: Box<dyn PhysicalMemory>) -> Self {
        Self {
            name: name.into(),
            regs: RegisterFile::new(),
            pc: RESET_ADDR,
            mstatus: 0,
            mepc: 0,
            mcause: 0,
            mtvec: 0,
            value: 0,
            start_pc: RESET_ADDR,
            state: ExecuteState::Stopped,
            enabled: true,
            freq_hz: DEFAULT_FREQ_HZ,
            time_offset: 0,
            current_cycle: 0,
            current_step: 0,
            step_queue: EventQueue::new("step-queue"),
            cycle_queue: EventQueue::new("cycle-queue"),
            memory,
            stop_request: StopHandle::default(),
            trace: false,
            stats: SimStats::default(),
        }
    }

    /// Creates a CPU from a configuration.
    ///
    /// The RAM size, clock frequency, enable flag, tracing, and start PC are taken from `config`.
    pub fn from_config(name: impl Into<String>, config: &Config) -> Self {
        let mut cpu = Self::with_memory(name, Box::new(Ram::new(config.memory.ram_size)));
        cpu.freq_hz = config.cpu.freq_hz.max(1);
        cpu.enabled = config.cpu.enabled;
        cpu.trace = config.general.trace_instructions;
        cpu.start_pc = config.general.start_pc;
        cpu.pc = cpu.start_pc;
        cpu
    }

    /// Resets architectural state, counters, and queues. Memory contents are kept.
    ///
    /// The PC returns to the configured start address.
    pub fn reset(&mut self) {
        self.regs.clear();
        self.pc = self.start_pc;
        self.mstatus = 0;
        self.mepc = 0;
        self.mcause = 0;
        self.mtvec = 0;
        self.state = ExecuteState::Stopped;
        self.time_offset = 0;
        self.current_cycle = 0;
        self.current_step = 0;
        self.step_queue.clear();
        self.cycle_queue.clear();
        let _ = self.stop_request.take();
        self.stats = SimStats::default();
    }

    /// Returns the backing memory.
    pub fn memory(&self) -> &dyn PhysicalMemory {
        self.memory.as_ref()
    }

    /// Returns the backing memory for writing (program loading, test setup).
    pub fn memory_mut(&mut self) -> &mut dyn PhysicalMemory {
        self.memory.as_mut()
    }

    /// Returns a handle event callbacks can use to stop the run loop.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_request.clone()
    }
}

impl fmt::Debug for RiscvCpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiscvCpu")
            .field("name", &self.name)
            .field("pc", &format_args!("{:#010x}", self.pc))
            .field("state", &self.state)
            .field("enabled", &self.enabled)
            .field("freq_hz", &self.freq_hz)
            .field("cycle", &self.current_cycle)
            .field("step", &self.current_step)
            .field("memory", &self.memory.name())
            .finish_non_exhaustive()
    }
}
