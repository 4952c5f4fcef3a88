//! Simulation utilities and program loading.
//!
//! Provides the loader that places programs into memory and the simulator
//! that ties the host session, the CPU, and the run loop together.

/// Raw binary and ELF program loading.
pub mod loader;

/// Host session plus CPU run loop.
pub mod simulator;

pub use self::simulator::Simulator;
