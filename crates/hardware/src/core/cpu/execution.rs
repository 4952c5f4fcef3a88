//! Main Execution Loop.
//!
//! This module implements the fetch/decode/execute cycle of the CPU. It performs the following:
//! 1. **Fetch:** Reads a little-endian instruction word at `pc`.
//! 2. **Execute:** Applies RV32I semantics with wrapping 32-bit arithmetic.
//! 3. **Timing:** Advances the cycle and step counters and drains due events.
//! 4. **Traps:** Records `mcause`/`mepc` when an instruction cannot be executed.
//! 5. **Run Loop:** Steps until `ret`, a stop request, or a step limit.

use tracing::{debug, error, info, trace};

use super::{ExecuteState, RiscvCpu};
use crate::common::constants::{
    INSTR_SIZE, MCAUSE_ILLEGAL_INSTRUCTION, MCAUSE_INSTRUCTION_ACCESS_FAULT,
    MCAUSE_LOAD_ACCESS_FAULT, MCAUSE_STORE_ACCESS_FAULT, RET_INSTR,
};
use crate::common::error::CpuError;
use crate::core::events::EventQueue;
use crate::isa::decode::decode;
use crate::isa::disasm::disassemble_word;
use crate::isa::instruction::Decoded;
use crate::isa::rv32i::funct3 as f3;
use crate::isa::rv32i::funct7 as f7;
use crate::isa::rv32i::opcodes::Opcode;

/// Mask applied to shift amounts.
const SHAMT_MASK: u32 = 0b11111;

/// Result of executing one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instruction completed; execution can continue.
    Continue,
    /// The instruction was `ret` (`0x00008067`); the program has finished.
    Halted,
}

/// Why the run loop returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunExit {
    /// The program executed `ret`.
    Halted,
    /// A stop was requested.
    Stopped,
    /// The step limit was reached.
    StepLimit,
}

impl RiscvCpu {
    /// Fetches the instruction word at `addr`.
    pub fn fetch(&self, addr: u32) -> Result<u32, CpuError> {
        trace!(cpu = %self.name, addr = format_args!("{addr:#010x}"), "fetch");
        self.memory
            .read_u32(addr)
            .map_err(|source| CpuError::Memory { pc: addr, source })
    }

    /// Executes one instruction: fetch, decode, execute, then dispatch due events.
    ///
    /// On failure the trap CSRs are updated (`mcause`, `mepc = pc`), `pc` is left on the
    /// faulting instruction and no cycle is consumed.
    ///
    /// # Returns
    ///
    /// `StepOutcome::Halted` after executing `ret`, `StepOutcome::Continue` otherwise.
    pub fn step(&mut self) -> Result<StepOutcome, CpuError> {
        if !self.enabled {
            return Err(CpuError::Disabled);
        }
        let pc = self.pc;
        let raw = match self.fetch(pc) {
            Ok(raw) => raw,
            Err(e) => {
                self.raise_exception(MCAUSE_INSTRUCTION_ACCESS_FAULT, &e);
                return Err(e);
            }
        };

        let d = decode(raw);
        if self.trace || cfg!(feature = "always-trace") {
            trace!(
                cpu = %self.name,
                "{pc:#010x}: {raw:08x}  {}",
                disassemble_word(pc, raw)
            );
        }

        if let Err(e) = self.execute(&d) {
            let cause = match (&e, d.opcode) {
                (CpuError::Memory { .. }, Opcode::Load) => MCAUSE_LOAD_ACCESS_FAULT,
                (CpuError::Memory { .. }, _) => MCAUSE_STORE_ACCESS_FAULT,
                _ => MCAUSE_ILLEGAL_INSTRUCTION,
            };
            self.raise_exception(cause, &e);
            return Err(e);
        }

        self.stats.instructions_retired += 1;
        self.inc_cycles(1);
        self.inc_steps(1);
        self.handle_events();

        if raw == RET_INSTR {
            info!(cpu = %self.name, pc = format_args!("{pc:#010x}"), "ret executed, halting");
            return Ok(StepOutcome::Halted);
        }
        Ok(StepOutcome::Continue)
    }

    /// Runs until `ret`, a stop request, or `max_steps` instructions.
    ///
    /// The execute state is `Running` for the duration of the loop and `Stopped` afterwards.
    pub fn run_until_halt(&mut self, max_steps: Option<u64>) -> Result<RunExit, CpuError> {
        self.run();
        let mut executed = 0u64;
        let result = loop {
            if self.stop_request.take() || self.state == ExecuteState::Stopped {
                break Ok(RunExit::Stopped);
            }
            if max_steps.is_some_and(|limit| executed >= limit) {
                break Ok(RunExit::StepLimit);
            }
            match self.step() {
                Ok(StepOutcome::Halted) => break Ok(RunExit::Halted),
                Ok(StepOutcome::Continue) => executed += 1,
                Err(e) => break Err(e),
            }
        };
        self.stop();
        info!(cpu = %self.name, steps = executed, cycles = self.current_cycle, ?result, "run finished");
        result
    }

    /// Executes a decoded instruction against the register file and memory.
    ///
    /// Source operands are read before the destination is written, so `rd == rs1` is safe.
    pub fn execute(&mut self, d: &Decoded) -> Result<(), CpuError> {
        let pc = self.pc;
        let rs1 = self.regs.read(d.rs1);
        let rs2 = self.regs.read(d.rs2);
        let imm = d.imm as u32;
        let next_pc = pc.wrapping_add(INSTR_SIZE);

        match d.opcode {
            Opcode::Load => {
                debug!(cpu = %self.name, "Executing LOAD instruction");
                self.exec_load(d, rs1)?;
                self.stats.inst_load += 1;
                self.pc = next_pc;
            }
            Opcode::Store => {
                debug!(cpu = %self.name, "Executing STORE instruction");
                self.exec_store(d, rs1, rs2)?;
                self.stats.inst_store += 1;
                self.pc = next_pc;
            }
            Opcode::OpImm => {
                debug!(cpu = %self.name, "Executing OP_IMM instruction");
                let val = self.op_imm(d, rs1, imm)?;
                self.regs.write(d.rd, val);
                self.stats.inst_alu += 1;
                self.pc = next_pc;
            }
            Opcode::Op => {
                debug!(cpu = %self.name, "Executing OP instruction");
                let val = self.op(d, rs1, rs2)?;
                self.regs.write(d.rd, val);
                self.stats.inst_alu += 1;
                self.pc = next_pc;
            }
            Opcode::Lui => {
                debug!(cpu = %self.name, "Executing LUI instruction");
                self.regs.write(d.rd, imm);
                self.stats.inst_upper += 1;
                self.pc = next_pc;
            }
            Opcode::Auipc => {
                debug!(cpu = %self.name, "Executing AUIPC instruction");
                self.regs.write(d.rd, pc.wrapping_add(imm));
                self.stats.inst_upper += 1;
                self.pc = next_pc;
            }
            Opcode::Jal => {
                debug!(cpu = %self.name, "Executing JAL instruction");
                self.regs.write(d.rd, next_pc);
                self.stats.inst_jump += 1;
                self.pc = pc.wrapping_add(imm);
            }
            Opcode::Jalr => {
                debug!(cpu = %self.name, "Executing JALR instruction");
                self.regs.write(d.rd, next_pc);
                self.stats.inst_jump += 1;
                self.pc = rs1.wrapping_add(imm) & !1;
            }
            Opcode::Branch => {
                debug!(cpu = %self.name, "Executing BRANCH instruction");
                let taken = self.branch_taken(d, rs1, rs2)?;
                self.stats.inst_branch += 1;
                if taken {
                    self.stats.branches_taken += 1;
                    self.pc = pc.wrapping_add(imm);
                } else {
                    self.pc = next_pc;
                }
            }
            other => {
                error!(cpu = %self.name, "Unsupported opcode: {:#04x} ({other})", other.bits());
                return Err(CpuError::UnsupportedOpcode {
                    opcode: other.bits(),
                    name: other.name(),
                    pc,
                });
            }
        }
        Ok(())
    }

    fn op_imm(&self, d: &Decoded, rs1: u32, imm: u32) -> Result<u32, CpuError> {
        let shamt = d.rs2 as u32 & SHAMT_MASK;
        let val = match d.funct3 {
            f3::ADD_SUB => rs1.wrapping_add(imm),
            f3::SLT => ((rs1 as i32) < (imm as i32)) as u32,
            f3::SLTU => (rs1 < imm) as u32,
            f3::XOR => rs1 ^ imm,
            f3::OR => rs1 | imm,
            f3::AND => rs1 & imm,
            f3::SLL => match d.funct7 {
                f7::DEFAULT => rs1 << shamt,
                _ => return Err(self.illegal(d, "invalid SLLI funct7")),
            },
            f3::SRL_SRA => match d.funct7 {
                f7::DEFAULT => rs1 >> shamt,
                f7::SRA => ((rs1 as i32) >> shamt) as u32,
                _ => return Err(self.illegal(d, "invalid SRLI/SRAI funct7")),
            },
            _ => return Err(self.illegal(d, "unsupported OP_IMM funct3")),
        };
        Ok(val)
    }

    fn op(&self, d: &Decoded, rs1: u32, rs2: u32) -> Result<u32, CpuError> {
        let shamt = rs2 & SHAMT_MASK;
        let val = match (d.funct3, d.funct7) {
            (f3::ADD_SUB, f7::DEFAULT) => rs1.wrapping_add(rs2),
            (f3::ADD_SUB, f7::SUB) => rs1.wrapping_sub(rs2),
            (f3::SLL, f7::DEFAULT) => rs1 << shamt,
            (f3::SLT, f7::DEFAULT) => ((rs1 as i32) < (rs2 as i32)) as u32,
            (f3::SLTU, f7::DEFAULT) => (rs1 < rs2) as u32,
            (f3::XOR, f7::DEFAULT) => rs1 ^ rs2,
            (f3::SRL_SRA, f7::DEFAULT) => rs1 >> shamt,
            (f3::SRL_SRA, f7::SRA) => ((rs1 as i32) >> shamt) as u32,
            (f3::OR, f7::DEFAULT) => rs1 | rs2,
            (f3::AND, f7::DEFAULT) => rs1 & rs2,
            _ => return Err(self.illegal(d, "invalid OP funct3/funct7")),
        };
        Ok(val)
    }

    fn branch_taken(&self, d: &Decoded, rs1: u32, rs2: u32) -> Result<bool, CpuError> {
        let taken = match d.funct3 {
            f3::BEQ => rs1 == rs2,
            f3::BNE => rs1 != rs2,
            f3::BLT => (rs1 as i32) < (rs2 as i32),
            f3::BGE => (rs1 as i32) >= (rs2 as i32),
            f3::BLTU => rs1 < rs2,
            f3::BGEU => rs1 >= rs2,
            _ => return Err(self.illegal(d, "unsupported BRANCH funct3")),
        };
        Ok(taken)
    }

    pub(crate) fn illegal(&self, d: &Decoded, reason: &'static str) -> CpuError {
        error!(
            cpu = %self.name,
            funct3 = d.funct3,
            funct7 = format_args!("{:#09b}", d.funct7),
            "{reason}"
        );
        CpuError::IllegalInstruction {
            instr: d.raw,
            pc: self.pc,
            reason,
        }
    }

    /// Records a synchronous exception in the trap CSRs.
    fn raise_exception(&mut self, cause: u32, err: &CpuError) {
        error!(cpu = %self.name, pc = format_args!("{:#010x}", self.pc), mcause = cause, "{err}");
        self.mcause = cause;
        self.mepc = self.pc;
        self.stats.exceptions += 1;
    }

    /// Advances the cycle counter and the cycle queue.
    pub(crate) fn inc_cycles(&mut self, cycles: u64) {
        if cycles > 0 {
            self.cycle_queue.decrement(cycles);
            self.current_cycle = self.current_cycle.saturating_add(cycles);
            self.stats.cycles = self.stats.cycles.saturating_add(cycles);
        }
    }

    /// Advances the step counter and the step queue.
    pub(crate) fn inc_steps(&mut self, steps: u64) {
        if steps > 0 {
            self.step_queue.decrement(steps);
            self.current_step = self.current_step.saturating_add(steps);
        }
    }

    /// Fires every due step and cycle event while the CPU is not stopped.
    pub(crate) fn handle_events(&mut self) {
        self.stats.events_fired += drain_due(&mut self.step_queue, self.state, &self.stop_request);
        self.stats.events_fired += drain_due(&mut self.cycle_queue, self.state, &self.stop_request);
    }
}

fn drain_due(queue: &mut EventQueue, state: ExecuteState, stop: &super::StopHandle) -> u64 {
    let mut fired = 0;
    while state != ExecuteState::Stopped
        && !stop.is_requested()
        && queue.delta() == Some(0)
        && queue.handle_next().is_some()
    {
        fired += 1;
    }
    fired
}
