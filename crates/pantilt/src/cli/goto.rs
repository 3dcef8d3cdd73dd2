use super::{finish, load_config, start_rig};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct GotoArgs {
    /// Path to the configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Absolute pan position. Pan holds its startup position when omitted.
    #[arg(long, allow_hyphen_values = true)]
    pub pan: Option<i32>,

    /// Absolute tilt position. Tilt holds its startup position when omitted.
    #[arg(long, allow_hyphen_values = true)]
    pub tilt: Option<i32>,

    /// Step speed; each step takes `base_interval / speed` seconds.
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Print PWM commands to stdout instead of writing the device.
    #[arg(long)]
    pub dry_run: bool,
}

impl GotoArgs {
    pub fn run(&self) -> Result<()> {
        let config = load_config(&self.config)?;
        execute(self, config)
    }
}

#[tokio::main]
async fn execute(args: &GotoArgs, config: Config) -> Result<()> {
    let rig = start_rig(&config, args.dry_run).await?;

    if let Some(pan) = args.pan {
        rig.pan().move_to(pan, args.speed);
    }
    if let Some(tilt) = args.tilt {
        rig.tilt().move_to(tilt, args.speed);
    }

    finish(rig).await
}
