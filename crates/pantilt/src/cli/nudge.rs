use super::{finish, load_config, start_rig};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use pantilt_core::Direction;
use std::path::PathBuf;

#[derive(Args)]
pub struct NudgeArgs {
    /// Path to the configuration file (TOML or JSON).
    pub config: PathBuf,

    /// One of `left`, `right`, `up` or `down`.
    #[arg(value_parser = parse_direction)]
    pub direction: Direction,

    /// Distance in pulse-width units, measured from the startup position.
    #[arg(allow_hyphen_values = true)]
    pub distance: i32,

    /// Step speed; each step takes `base_interval / speed` seconds.
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Print PWM commands to stdout instead of writing the device.
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    Direction::parse(s).ok_or_else(|| format!("unknown direction `{s}`"))
}

impl NudgeArgs {
    pub fn run(&self) -> Result<()> {
        let config = load_config(&self.config)?;
        execute(self, config)
    }
}

#[tokio::main]
async fn execute(args: &NudgeArgs, config: Config) -> Result<()> {
    let rig = start_rig(&config, args.dry_run).await?;
    if !rig.nudge(args.direction, args.distance, args.speed) {
        tracing::info!(direction = ?args.direction, "no motion needed");
    }
    finish(rig).await
}
