//! Output side of the controllers.
//!
//! The PWM daemon accepts one `"<channel>=<position>\n"` line per command.
//! Both axes share a single sink, so implementations must accept whole-line
//! writes from several threads without interleaving them.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
};

/// Default ServoBlaster device node.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/servoblaster";

/// A single pulse-width command for one channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServoCommand {
    pub channel: u32,
    pub position: i32,
}

impl ServoCommand {
    pub fn new(channel: u32, position: i32) -> Self {
        Self { channel, position }
    }
}

impl fmt::Display for ServoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.channel, self.position)
    }
}

pub trait PwmSink: Send + Sync {
    /// Deliver one command and make it visible to the daemon before returning.
    fn write_command(&self, command: &ServoCommand) -> io::Result<()>;
}

/// Line-oriented writer, flushed after every command.
pub struct LineSink<W> {
    writer: Mutex<W>,
}

impl LineSink<File> {
    /// Open the PWM device for writing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|source| Error::OpenDevice {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> PwmSink for LineSink<W> {
    fn write_command(&self, command: &ServoCommand) -> io::Result<()> {
        // a single write_all per line keeps the daemon from seeing partial commands
        let line = format!("{command}\n");
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}

/// Keeps every command in memory.
#[derive(Default, Debug)]
pub struct RecordingSink {
    commands: Mutex<Vec<ServoCommand>>,
}

impl RecordingSink {
    pub fn commands(&self) -> Vec<ServoCommand> {
        self.commands.lock().clone()
    }

    /// Positions written to one channel, in order.
    pub fn positions(&self, channel: u32) -> Vec<i32> {
        self.commands
            .lock()
            .iter()
            .filter(|cmd| cmd.channel == channel)
            .map(|cmd| cmd.position)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.lock().is_empty()
    }
}

impl PwmSink for RecordingSink {
    fn write_command(&self, command: &ServoCommand) -> io::Result<()> {
        self.commands.lock().push(*command);
        Ok(())
    }
}
