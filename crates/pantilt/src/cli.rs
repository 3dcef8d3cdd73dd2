use crate::config::Config;
use anyhow::{Context, Result};
use pantilt_core::{LineSink, PanTilt};
use std::{io, path::Path, sync::Arc};

pub mod check;
pub mod goto;
pub mod nudge;

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::from_file(path)?;
    config.validate()?;
    Ok(config)
}

/// Start the rig on the configured device, or on stdout for dry runs.
pub async fn start_rig(config: &Config, dry_run: bool) -> Result<PanTilt> {
    let rig = if dry_run {
        let sink = Arc::new(LineSink::new(io::stdout()));
        PanTilt::start(config.pan, config.tilt, sink, &config.motion).await
    } else {
        PanTilt::open(&config.device.path, config.pan, config.tilt, &config.motion).await
    };
    rig.context("failed to start pan-tilt rig")
}

/// Wait for both axes to arrive, then stop them.
pub async fn finish(rig: PanTilt) -> Result<()> {
    let (pan, tilt) = rig.finish().await.context("pan-tilt rig halted")?;
    tracing::info!(pan, tilt, "arrived");
    Ok(())
}
