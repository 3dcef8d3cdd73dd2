use super::load_config;
use anyhow::Result;
use clap::Args;
use pantilt_core::AxisConfig;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Path to the configuration file (TOML or JSON).
    pub config: PathBuf,
}

impl CheckArgs {
    pub fn run(&self) -> Result<()> {
        let config = load_config(&self.config)?;
        let timing = config.motion.timing()?;

        println!("device: {}", config.device.path.display());
        print_axis("pan", &config.pan);
        print_axis("tilt", &config.tilt);
        println!(
            "timing: {:?} per step at speed 1, {:?} idle, {:?} settle",
            timing.base, timing.idle, timing.settle
        );

        Ok(())
    }
}

fn print_axis(name: &str, axis: &AxisConfig) {
    println!(
        "{name}: channel {} limits {}..={} home {}",
        axis.channel,
        axis.lower_limit,
        axis.upper_limit,
        axis.home()
    );
}
