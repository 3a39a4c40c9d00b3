use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use nibbler_spec::{Config, MemoryResetPolicy};
use tracing_subscriber::EnvFilter;

mod commands;

/// Nibbler toolchain
/// Assembles programs into memory images, lists images, and runs them on the
/// cycle-level core model through its pins.
#[derive(Debug, Parser)]
#[command(name = "nibbler", version, about, long_about = None)]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assemble a source file into a memory image
    Assemble {
        /// Assembly source
        source: PathBuf,

        /// Image file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the contents of an image or source file
    Disasm {
        /// Image or assembly source
        input: PathBuf,

        /// Emit assembler source instead of an address listing
        #[arg(long)]
        source: bool,
    },

    /// Program the core over SPI and single-step it until STOP
    Run {
        /// Image or assembly source
        input: PathBuf,

        /// Give up after this many RUN pulses
        #[arg(long, default_value_t = 256)]
        max_steps: usize,

        /// What reset does to memory (clear or retain)
        #[arg(long, default_value_t = MemoryResetPolicy::Clear)]
        reset_policy: MemoryResetPolicy,

        /// Value memory is filled with on power-up and on clearing reset
        #[arg(long, default_value_t = 0)]
        fill: u8,

        /// Print every core event
        #[arg(long)]
        events: bool,

        /// Skip reading the image back before running
        #[arg(long)]
        no_verify: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Assemble { source, output } => {
            let digest = commands::assemble_file(&source, &output)?;
            println!("{}  {}", digest, output.display());
        }
        Command::Disasm { input, source } => {
            let image = commands::load_input(&input)?;
            print!("{}", commands::disasm(&image, source)?);
        }
        Command::Run {
            input,
            max_steps,
            reset_policy,
            fill,
            events,
            no_verify,
        } => {
            let config = Config::new(reset_policy, fill, events)?;
            let image = commands::load_input(&input)?;
            let report = commands::run(
                &image,
                &commands::RunOptions {
                    config,
                    max_steps,
                    verify: !no_verify,
                },
            )?;
            for event in &report.events {
                println!("{}", event);
            }
            print!("{}", report);
        }
    }

    Ok(())
}
