use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries PWM commands in dry runs, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Check(args) => args.run(),
        Command::Goto(args) => args.run(),
        Command::Nudge(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(name = "pantilt", about = "Drive a ServoBlaster pan-tilt unit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a configuration file and print the resolved axes.
    Check(cli::check::CheckArgs),
    /// Move both axes to absolute positions and wait for them to arrive.
    Goto(cli::goto::GotoArgs),
    /// Move one axis relative to its current position.
    Nudge(cli::nudge::NudgeArgs),
}
