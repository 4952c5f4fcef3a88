use riscv_vp_core::common::CpuError;
use riscv_vp_core::core::RiscvCpu;
use riscv_vp_core::core::cpu::execution::{RunExit, StepOutcome};
use riscv_vp_core::core::memory::PhysicalMemory;

pub struct TestContext {
    pub cpu: RiscvCpu,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        init_tracing();
        Self {
            cpu: RiscvCpu::new("riscv_cpu0"),
        }
    }

    /// Wraps a CPU built elsewhere (e.g. over a mock memory).
    pub fn with_cpu(cpu: RiscvCpu) -> Self {
        init_tracing();
        Self { cpu }
    }

    /// Load a sequence of 32-bit instructions into memory at `addr` and set the PC.
    pub fn load_program(mut self, addr: u32, instructions: &[u32]) -> Self {
        for (i, inst) in instructions.iter().enumerate() {
            let offset = addr + (i as u32) * 4;
            self.cpu.memory_mut().write_u32(offset, *inst).unwrap();
        }
        self.cpu.pc = addr;
        self
    }

    /// Set a general-purpose register value.
    pub fn set_reg(&mut self, reg: usize, val: u32) {
        self.cpu.regs.write(reg, val);
    }

    /// Read a general-purpose register value.
    pub fn get_reg(&self, reg: usize) -> u32 {
        self.cpu.regs.read(reg)
    }

    /// Execute one instruction.
    pub fn step(&mut self) -> Result<StepOutcome, CpuError> {
        self.cpu.step()
    }

    /// Execute `n` instructions, failing the test on the first error.
    pub fn step_n(&mut self, n: usize) {
        for i in 0..n {
            if let Err(e) = self.cpu.step() {
                panic!("step {i} failed: {e}");
            }
        }
    }

    /// Run until `ret` or the step limit.
    pub fn run(&mut self, max_steps: u64) -> Result<RunExit, CpuError> {
        self.cpu.run_until_halt(Some(max_steps))
    }
}

/// Routes model logs through the test writer so `--nocapture` shows them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
