use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, prelude::*};

use self::{jitter::JitterArg, replay::ReplayArg};

mod jitter;
mod replay;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log every accepted and rejected read (overridden by `RUST_LOG`)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Replay a recorded frame feed through the estimator
    Replay(#[clap(flatten)] ReplayArg),
    /// Write a copy of a recording with synthetic recognition errors
    Jitter(#[clap(flatten)] JitterArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Replay(arg) => replay::run(&arg)?,
        Mode::Jitter(arg) => jitter::run(&arg)?,
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
