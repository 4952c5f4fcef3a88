//! RISC-V virtual platform CLI.
//!
//! This binary drives the RV32I CPU model through the host. It performs:
//! 1. **Run:** Load a raw binary or ELF, run until `ret` or the step limit, and print
//!    the CPU's `info` and `status` output (or JSON with `--json`).
//! 2. **Disassemble:** Load an image and print the disassembly of a range of words.

use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::error;
use tracing_subscriber::EnvFilter;

use riscv_vp_core::common::SimError;
use riscv_vp_core::config::Config;
use riscv_vp_core::core::memory::PhysicalMemory;
use riscv_vp_core::host::CommandKind;
use riscv_vp_core::sim::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "rvvp",
    author,
    version,
    about = "RV32I virtual platform",
    long_about = "Run a program on the RV32I CPU model or disassemble it.\n\nExamples:\n  rvvp run -f prog.elf\n  rvvp run -f prog.bin --config vp.json --max-steps 10000 --json\n  rvvp disasm -f prog.bin --start 0x0 --count 16"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program until `ret`, a stop, or the step limit.
    Run {
        /// Program to execute (raw binary or ELF32).
        #[arg(short, long)]
        file: String,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<String>,

        /// Stop after this many instructions.
        #[arg(long)]
        max_steps: Option<u64>,

        /// Print status and statistics as JSON.
        #[arg(long)]
        json: bool,

        /// Log every executed instruction.
        #[arg(long)]
        trace: bool,
    },

    /// Disassemble words of a program.
    Disasm {
        /// Program to disassemble (raw binary or ELF32).
        #[arg(short, long)]
        file: String,

        /// First address; defaults to the image entry point.
        #[arg(long, value_parser = parse_addr)]
        start: Option<u32>,

        /// Number of instruction words.
        #[arg(long, default_value_t = 16)]
        count: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    let trace = matches!(cli.command, Commands::Run { trace: true, .. });
    init_logging(trace);

    let result = match cli.command {
        Commands::Run {
            file,
            config,
            max_steps,
            json,
            trace,
        } => cmd_run(&file, config.as_deref(), max_steps, json, trace),
        Commands::Disasm { file, start, count } => cmd_disasm(&file, start, count),
    };

    if let Err(e) = result {
        error!("{e}");
        eprintln!("\n[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Installs the `tracing` subscriber: `RUST_LOG` wins, otherwise `warn` (or `trace`).
fn init_logging(trace: bool) {
    let default = if trace { "trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<Config, SimError> {
    path.map_or_else(
        || Ok(Config::default()),
        |p| Config::from_file(p).map_err(|e| SimError::General(e.to_string())),
    )
}

/// Loads the program, runs it, and reports the CPU's introspection output.
fn cmd_run(
    file: &str,
    config: Option<&str>,
    max_steps: Option<u64>,
    json: bool,
    trace: bool,
) -> Result<(), SimError> {
    let mut config = load_config(config)?;
    config.general.trace_instructions |= trace;

    let mut sim = Simulator::new(config)?;
    let image = sim.load_program(file)?;
    if !json {
        println!("[*] Loaded {file} ({:?}), entry {:#010x}", image.kind, image.entry);
    }

    let result = sim.run(max_steps);
    let name = sim.cpu_name().to_owned();

    if json {
        let status = sim.host().command_sections(&name, CommandKind::Status)?;
        let cpu = sim.cpu()?;
        let report = json!({
            "object": name,
            "exit": result.as_ref().map_or_else(|_| "Error".to_owned(), |exit| format!("{exit:?}")),
            "error": result.as_ref().err().map(ToString::to_string),
            "pc": cpu.pc,
            "status": status,
            "pending_exception": cpu.get_pending_exception_string(),
            "stats": cpu.stats,
        });
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| SimError::General(e.to_string()))?;
        println!("{text}");
        return result.map(|_| ());
    }

    match &result {
        Ok(exit) => println!("[*] Run finished: {exit:?}\n"),
        Err(e) => println!("[!] Run aborted: {e}\n"),
    }
    println!("{}", render_report(&sim)?);
    sim.stats()?.print();
    result.map(|_| ())
}

/// Renders the `info` and `status` output, the registers, and any pending exception.
fn render_report(sim: &Simulator) -> Result<String, SimError> {
    let name = sim.cpu_name();
    let mut out = String::new();
    for cmd in ["info", "status"] {
        let section = sim
            .run_command(&format!("{name}.{cmd}"))
            .map_err(|e| SimError::General(format!("{cmd} command failed: {e}")))?;
        out.push_str(&section);
        out.push('\n');
    }
    let cpu = sim.cpu()?;
    out.push_str(&cpu.get_pregs(true));
    if let Some(exc) = cpu.get_pending_exception_string() {
        out.push_str(&exc);
    }
    Ok(out)
}

/// Loads the program and prints `count` disassembled words from `start`.
fn cmd_disasm(file: &str, start: Option<u32>, count: u32) -> Result<(), SimError> {
    let mut sim = Simulator::new(Config::default())?;
    let image = sim.load_program(file)?;
    let cpu = sim.cpu()?;

    let mut addr = start.unwrap_or(image.entry);
    for _ in 0..count {
        let Ok(word) = cpu.memory().read_u32(addr) else {
            break;
        };
        let (_, text) = cpu.disassemble(u64::from(addr), &word.to_le_bytes());
        println!("{addr:08x}:  {word:08x}  {text}");
        addr = addr.wrapping_add(4);
    }
    Ok(())
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_addr(s: &str) -> Result<u32, String> {
    let parsed = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).map_or_else(
        || s.parse::<u32>(),
        |hex| u32::from_str_radix(hex, 16),
    );
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}
