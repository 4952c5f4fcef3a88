//! Loadable modules.
//!
//! Each module registers its classes and their commands with a [`Host`](crate::host::Host).

/// The `riscv-cpu` module: the `riscv_cpu` class and its introspection commands.
pub mod riscv_cpu;

pub use self::riscv_cpu::{CLASS_NAME, MODULE_NAME, create_riscv_cpu, register, register_with_config};
