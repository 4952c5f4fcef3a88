//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the RV32I opcode map, format classification, field extraction,
//! the decoder and the disassembler.
//!
//! # Pipeline
//!
//! 1. **Field extraction:** `instruction::InstructionBits` pulls raw fields out of a word.
//! 2. **Classification:** `format::classify` maps the major opcode to R/I/S/B/U/J.
//! 3. **Decoding:** `decode::decode` builds a `Decoded` with a sign-extended immediate.
//! 4. **Disassembly:** `disasm` renders a `Decoded` as assembler text.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Instruction decoding logic for all RISC-V instruction formats.
pub mod decode;

/// Instruction disassembler for the processor CLI and tracing.
pub mod disasm;

/// Two-level opcode to encoding-format classification.
pub mod format;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Base integer instruction set (32-bit RISC-V core instructions).
pub mod rv32i;
