use anyhow::{Context, Result};
use pantilt_core::{AxisConfig, MotionConfig, sink::DEFAULT_DEVICE_PATH};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Main configuration for a pan-tilt unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// PWM daemon device
    #[serde(default)]
    pub device: DeviceConfig,

    /// Pan servo channel and limits
    pub pan: AxisConfig,

    /// Tilt servo channel and limits
    pub tilt: AxisConfig,

    /// Step timing
    #[serde(default)]
    pub motion: MotionConfig,
}

/// Device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Path of the device file accepting `<channel>=<position>` lines
    #[serde(default = "default_device_path")]
    pub path: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: default_device_path(),
        }
    }
}

fn default_device_path() -> PathBuf {
    PathBuf::from(DEFAULT_DEVICE_PATH)
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.device.path.as_os_str().is_empty() {
            anyhow::bail!("device.path cannot be empty");
        }
        self.pan.validate().context("invalid pan axis")?;
        self.tilt.validate().context("invalid tilt axis")?;
        if self.pan.channel == self.tilt.channel {
            anyhow::bail!("pan and tilt cannot share channel {}", self.pan.channel);
        }
        self.motion.timing().context("invalid motion timing")?;
        Ok(())
    }
}
