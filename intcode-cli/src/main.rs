//! Intcode command line
//!
//! Runs a program against scripted input, drives amplifier chains and
//! feedback rings, disassembles programs and packs them into binary images.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use intcode_disassembler::disassemble;
use intcode_runtime::{
    search_phases, Machine, MachineConfig, OutputRecorder, PhaseSearch, ScriptedInput, Topology,
    TopologyKind,
};
use intcode_spec::{Address, Program, Word};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "intcode")]
#[command(about = "Run, wire up and inspect Intcode programs")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single machine
    Run {
        /// Program text or binary image
        file: PathBuf,

        /// Input value, consumed in order
        #[arg(short, long = "input", allow_hyphen_values = true)]
        inputs: Vec<Word>,

        /// Feed the bytes of TEXT as input after any -i values
        #[arg(long, value_name = "TEXT")]
        ascii: Option<String>,

        /// Set a memory cell before running
        #[arg(long, value_name = "ADDR=VAL", value_parser = parse_poke)]
        poke: Vec<(Address, Word)>,

        /// Print a memory cell after the machine halts
        #[arg(long, value_name = "ADDR")]
        peek: Vec<Address>,

        /// Log every executed instruction (needs -vv or RUST_LOG=trace)
        #[arg(long)]
        trace: bool,
    },

    /// Run machines as a linear chain
    Chain {
        file: PathBuf,

        /// Phase per stage; every ordering of 0..=4 is tried when omitted
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        phases: Option<Vec<Word>>,
    },

    /// Run machines as a feedback ring
    Ring {
        file: PathBuf,

        /// Phase per stage; every ordering of 5..=9 is tried when omitted
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        phases: Option<Vec<Word>>,
    },

    /// Print an annotated listing
    Disasm { file: PathBuf },

    /// Write a binary image
    Pack {
        file: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
}

fn parse_poke(arg: &str) -> std::result::Result<(Address, Word), String> {
    let (addr, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ADDR=VAL, got '{arg}'"))?;
    let addr = addr
        .trim()
        .parse()
        .map_err(|e| format!("bad address '{addr}': {e}"))?;
    let value = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value '{value}': {e}"))?;
    Ok((addr, value))
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(path: &Path) -> Result<Program> {
    let program = Program::load(path)
        .with_context(|| format!("Failed to load program from {}", path.display()))?;
    debug!(path = %path.display(), words = program.len(), "program loaded");
    Ok(program)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Run {
            file,
            inputs,
            ascii,
            poke,
            peek,
            trace,
        } => {
            let program = load(&file)?;
            let mut input = ScriptedInput::new(inputs);
            for byte in ascii.iter().flat_map(|text| text.bytes()) {
                input.push(Word::from(byte));
            }
            let output = OutputRecorder::new();

            let mut machine = Machine::new(&program)
                .with_config(MachineConfig::default().with_trace(trace))
                .with_input(input)
                .with_output(output.clone());
            for (addr, value) in poke {
                machine.poke(addr, value);
            }

            let result = machine
                .execute()
                .with_context(|| format!("{} faulted", file.display()));
            // Whatever was produced before a fault is still worth showing
            for value in output.take() {
                println!("{value}");
            }
            let result = result?;
            info!(steps = result.steps, pc = result.pc, "halted");

            for addr in peek {
                println!("[{addr}] = {}", machine.peek(addr));
            }
        }

        Command::Chain { file, phases } => {
            run_topology(&load(&file)?, TopologyKind::Chain, phases, &[0, 1, 2, 3, 4])?;
        }

        Command::Ring { file, phases } => {
            run_topology(&load(&file)?, TopologyKind::Ring, phases, &[5, 6, 7, 8, 9])?;
        }

        Command::Disasm { file } => {
            print!("{}", disassemble(&load(&file)?));
        }

        Command::Pack { file, output } => {
            let program = load(&file)?;
            program
                .save(&output)
                .with_context(|| format!("Failed to write image to {}", output.display()))?;
            info!(output = %output.display(), words = program.len(), "image written");
        }
    }

    Ok(())
}

fn run_topology(
    program: &Program,
    kind: TopologyKind,
    phases: Option<Vec<Word>>,
    candidates: &[Word],
) -> Result<()> {
    let base = Machine::new(program);

    let PhaseSearch { signal, phases } = match phases {
        Some(phases) => {
            if phases.is_empty() {
                bail!("--phases needs at least one value");
            }
            let signal = Topology::new(kind, phases.clone()).run(&base)?;
            PhaseSearch { signal, phases }
        }
        None => search_phases(&base, kind, candidates)?,
    };

    let phases: Vec<String> = phases.iter().map(Word::to_string).collect();
    println!("{signal} (phases {})", phases.join(","));
    Ok(())
}
