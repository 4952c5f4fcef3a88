//! Common utilities and types used throughout the CPU model.
//!
//! This module provides fundamental building blocks shared by every component. It includes:
//! 1. **Constants:** Memory geometry, register counts, and special instruction encodings.
//! 2. **Error Handling:** Memory, CPU, event-posting, and host error types.
//! 3. **Register Management:** The RV32I general-purpose register file.

/// Model-wide constants.
pub mod constants;

/// Error types for memory, execution, event posting, and the host layer.
pub mod error;

/// General-purpose register file.
pub mod reg;

pub use error::{CpuError, MemoryError, PostError, SimError};
pub use reg::RegisterFile;
