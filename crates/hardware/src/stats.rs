//! Simulation statistics collection and reporting.
//!
//! This module tracks execution metrics for the CPU model. It provides:
//! 1. **Cycle and step counts:** Total cycles and retired instructions.
//! 2. **Instruction mix:** Counts by category (ALU, load, store, branch, jump).
//! 3. **Branches:** Taken and not-taken counts.
//! 4. **Events and traps:** Fired events and raised exceptions.
//!
//! Statistics serialize to JSON for the CLI's `--json` output.

use std::time::Instant;

use serde::Serialize;

/// Simulation statistics structure tracking execution metrics.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// Total simulated cycles elapsed.
    pub cycles: u64,
    /// Number of instructions executed to completion.
    pub instructions_retired: u64,

    /// Count of register-register and register-immediate ALU instructions.
    pub inst_alu: u64,
    /// Count of LUI and AUIPC instructions.
    pub inst_upper: u64,
    /// Count of load instructions.
    pub inst_load: u64,
    /// Count of store instructions.
    pub inst_store: u64,
    /// Count of conditional branches.
    pub inst_branch: u64,
    /// Count of JAL and JALR instructions.
    pub inst_jump: u64,

    /// Conditional branches that were taken.
    pub branches_taken: u64,

    /// Events fired from the cycle and step queues.
    pub events_fired: u64,
    /// Exceptions raised by fetch, decode, or execute.
    pub exceptions: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_upper: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_jump: 0,
            branches_taken: 0,
            events_fired: 0,
            exceptions: 0,
        }
    }
}

impl SimStats {
    /// Returns the fraction of conditional branches that were taken, in percent.
    pub fn branch_taken_rate(&self) -> f64 {
        if self.inst_branch == 0 {
            0.0
        } else {
            100.0 * self.branches_taken as f64 / self.inst_branch as f64
        }
    }

    /// Prints all statistics to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64| (n as f64 / instr) * 100.0;
        let mips = if seconds > 0.0 {
            (self.instructions_retired as f64 / seconds) / 1_000_000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("RISC-V VP SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_mips                 {mips:.2}");
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        println!("  op.alu                 {} ({:.2}%)", self.inst_alu, pct(self.inst_alu));
        println!("  op.upper               {} ({:.2}%)", self.inst_upper, pct(self.inst_upper));
        println!("  op.load                {} ({:.2}%)", self.inst_load, pct(self.inst_load));
        println!("  op.store               {} ({:.2}%)", self.inst_store, pct(self.inst_store));
        println!("  op.branch              {} ({:.2}%)", self.inst_branch, pct(self.inst_branch));
        println!("  op.jump                {} ({:.2}%)", self.inst_jump, pct(self.inst_jump));
        println!("----------------------------------------------------------");
        println!("  branch.taken           {} ({:.2}%)", self.branches_taken, self.branch_taken_rate());
        println!("  events.fired           {}", self.events_fired);
        println!("  exceptions             {}", self.exceptions);
        println!("==========================================================");
    }
}
