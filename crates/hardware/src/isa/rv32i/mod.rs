//! RISC-V Base Integer Instruction Set (RV32I).
//!
//! Defines the opcode map and function codes of the 32-bit base integer ISA.
//!
//! # Structure
//!
//! - `opcodes`: The 32 major opcodes addressed by instruction bits 6-2.
//! - `funct3`: Minor opcodes distinguishing instructions within a major opcode.
//! - `funct7`: Additional opcode bits for R-type instructions and immediate shifts.

/// Function code 3 definitions for base integer operations.
pub mod funct3;

/// Function code 7 definitions for base integer operations.
pub mod funct7;

/// Base integer instruction set opcodes.
pub mod opcodes;
