//! Instruction Disassembler for RISC-V RV32I.
//!
//! Converts a decoded instruction into the text shown by the processor CLI,
//! tracing, and the `disasm` subcommand.
//!
//! # Layout
//!
//! - R-type: `add a0, a1, a2`
//! - OP-IMM: `addi a0, a1, 5`, `li a0, 5` (rs1 omitted), `slli a0, a1, 3` (shamt)
//! - Loads and stores: `lw a0, 8(sp)`, `sw a0, -4(sp)`
//! - JALR: `ret ra`, `jr a5`, `jalr t0, 8(a5)` (an `ra` destination is not printed)
//! - Branches and JAL: the absolute target `pc + imm` in decimal
//! - U-type: the upper immediate as a signed value
//!
//! # Usage
//!
//! ```ignore
//! use riscv_vp_core::isa::disasm::disassemble_word;
//! let text = disassemble_word(0, 0x00A0_0513);
//! assert_eq!(text, "li a0, 10");
//! ```

use std::borrow::Cow;

use crate::common::constants::NOP_INSTR;
use crate::isa::abi::{REG_RA, abi_name};
use crate::isa::decode::decode;
use crate::isa::format::InstrFormat;
use crate::isa::instruction::Decoded;
use crate::isa::rv32i::funct3 as f3;
use crate::isa::rv32i::funct7 as f7;
use crate::isa::rv32i::opcodes::Opcode;

const LOAD_TABLE: [&str; 8] = ["lb", "lh", "lw", "ld", "lbu", "lhu", "lwu", "unknown"];
const STORE_TABLE: [&str; 8] = [
    "sb", "sh", "sw", "sd", "unknown", "unknown", "unknown", "unknown",
];
const BRANCH_TABLE: [&str; 8] = [
    "beq", "bne", "unknown", "unknown", "blt", "bge", "bltu", "bgeu",
];

/// Returns the name of integer register `idx`.
///
/// # Arguments
///
/// * `idx` - Register index.
/// * `symbolic` - When `true`, returns the ABI name (`"sp"`); otherwise the
///   numeric name (`"x2"`). Indices past x31 always use the numeric form.
pub fn reg_name(idx: usize, symbolic: bool) -> Cow<'static, str> {
    match abi_name(idx) {
        Some(name) if symbolic => Cow::Borrowed(name),
        _ => Cow::Owned(format!("x{idx}")),
    }
}

#[inline]
fn xreg(idx: usize) -> Cow<'static, str> {
    reg_name(idx, true)
}

/// Returns the assembler mnemonic for a decoded instruction, or `"unknown"`.
pub fn mnemonic(d: &Decoded) -> &'static str {
    let f3 = d.funct3 as usize;
    match d.opcode {
        Opcode::Load => LOAD_TABLE[f3 & 0x7],
        Opcode::Store => STORE_TABLE[f3 & 0x7],
        Opcode::OpImm => op_imm_mnemonic(d),
        Opcode::Op => op_mnemonic(d),
        Opcode::Branch => BRANCH_TABLE[f3 & 0x7],
        Opcode::Jal => {
            if d.rd == 0 {
                "j"
            } else {
                "jal"
            }
        }
        Opcode::Jalr => match (d.rd, d.rs1) {
            (0, REG_RA) => "ret",
            (0, _) => "jr",
            _ => "jalr",
        },
        Opcode::Lui => "lui",
        Opcode::Auipc => "auipc",
        _ => "unknown",
    }
}

fn op_imm_mnemonic(d: &Decoded) -> &'static str {
    match (d.funct3, d.funct7) {
        (f3::ADD_SUB, _) if d.rs1 == 0 => "li",
        (f3::ADD_SUB, _) => "addi",
        (f3::SLT, _) => "slti",
        (f3::SLTU, _) => "sltiu",
        (f3::XOR, _) => "xori",
        (f3::OR, _) => "ori",
        (f3::AND, _) => "andi",
        (f3::SLL, f7::DEFAULT) => "slli",
        (f3::SRL_SRA, f7::DEFAULT) => "srli",
        (f3::SRL_SRA, f7::SRA) => "srai",
        _ => "unknown",
    }
}

fn op_mnemonic(d: &Decoded) -> &'static str {
    match (d.funct3, d.funct7) {
        (f3::ADD_SUB, f7::DEFAULT) => "add",
        (f3::ADD_SUB, f7::SUB) => "sub",
        (f3::SLL, f7::DEFAULT) => "sll",
        (f3::SLT, f7::DEFAULT) => "slt",
        (f3::SLTU, f7::DEFAULT) => "sltu",
        (f3::XOR, f7::DEFAULT) => "xor",
        (f3::SRL_SRA, f7::DEFAULT) => "srl",
        (f3::SRL_SRA, f7::SRA) => "sra",
        (f3::OR, f7::DEFAULT) => "or",
        (f3::AND, f7::DEFAULT) => "and",
        _ => "unknown",
    }
}

/// Disassembles a decoded instruction located at `pc`.
///
/// Encodings outside the executed subset print their mnemonic (`"unknown"`)
/// without operands.
///
/// # Arguments
///
/// * `pc` - Address of the instruction; branch and jump targets are relative to it.
/// * `d` - The decoded instruction.
pub fn disassemble(pc: u32, d: &Decoded) -> String {
    let m = mnemonic(d);
    match d.format {
        InstrFormat::R => format!("{m} {}, {}, {}", xreg(d.rd), xreg(d.rs1), xreg(d.rs2)),
        InstrFormat::I => match d.opcode {
            Opcode::Jalr => disasm_jalr(m, d),
            Opcode::OpImm => disasm_op_imm(m, d),
            _ => format!("{m} {}, {}({})", xreg(d.rd), d.imm, xreg(d.rs1)),
        },
        InstrFormat::S => format!("{m} {}, {}({})", xreg(d.rs2), d.imm, xreg(d.rs1)),
        InstrFormat::B => format!(
            "{m} {}, {}, {}",
            xreg(d.rs1),
            xreg(d.rs2),
            pc.wrapping_add_signed(d.imm)
        ),
        InstrFormat::U => format!("{m} {}, {}", xreg(d.rd), d.imm),
        InstrFormat::J => format!("{m} {}, {}", xreg(d.rd), pc.wrapping_add_signed(d.imm)),
        InstrFormat::Other | InstrFormat::Undef => m.to_owned(),
    }
}

fn disasm_jalr(m: &str, d: &Decoded) -> String {
    let mut out = format!("{m} ");
    if d.rd != 0 && d.rd != REG_RA {
        out.push_str(&xreg(d.rd));
        out.push_str(", ");
    }
    if d.imm == 0 {
        out.push_str(&xreg(d.rs1));
    } else {
        out.push_str(&format!("{}({})", d.imm, xreg(d.rs1)));
    }
    out
}

fn disasm_op_imm(m: &str, d: &Decoded) -> String {
    let mut out = format!("{m} {}, ", xreg(d.rd));
    if d.funct3 != f3::ADD_SUB || d.rs1 != 0 {
        out.push_str(&xreg(d.rs1));
        out.push_str(", ");
    }
    if d.funct3 == f3::SLL || d.funct3 == f3::SRL_SRA {
        out.push_str(&d.rs2.to_string());
    } else {
        out.push_str(&d.imm.to_string());
    }
    out
}

/// Decodes and disassembles a raw instruction word. `0x00000013` prints as `nop`.
pub fn disassemble_word(pc: u32, inst: u32) -> String {
    if inst == NOP_INSTR {
        return "nop".to_owned();
    }
    disassemble(pc, &decode(inst))
}
