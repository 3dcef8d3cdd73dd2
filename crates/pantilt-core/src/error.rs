use std::{io, path::PathBuf};
use thiserror::Error;

use crate::sink::ServoCommand;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid limits for channel {channel}: lower {lower} must be below upper {upper}")]
    InvalidLimits { channel: u32, lower: i32, upper: i32 },
    #[error("invalid {name}: {value} is not a positive number of seconds")]
    InvalidTiming { name: &'static str, value: f64 },
    #[error("failed to open servo device {}", path.display())]
    OpenDevice {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write `{command}` after {attempts} consecutive attempts")]
    SinkWrite {
        command: ServoCommand,
        attempts: u32,
        #[source]
        source: io::Error,
    },
    #[error("controller for channel {channel} has stopped")]
    ControllerStopped { channel: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
