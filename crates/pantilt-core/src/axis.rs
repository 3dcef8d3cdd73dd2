//! Per-servo channel and pulse-width bounds.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One physical servo as seen by the PWM daemon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Channel number understood by the sink
    pub channel: u32,

    /// Lowest pulse-width value the servo accepts
    pub lower_limit: i32,

    /// Highest pulse-width value the servo accepts
    pub upper_limit: i32,
}

impl AxisConfig {
    pub fn new(channel: u32, lower_limit: i32, upper_limit: i32) -> Result<Self> {
        let axis = Self {
            channel,
            lower_limit,
            upper_limit,
        };
        axis.validate()?;
        Ok(axis)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lower_limit >= self.upper_limit {
            return Err(Error::InvalidLimits {
                channel: self.channel,
                lower: self.lower_limit,
                upper: self.upper_limit,
            });
        }
        Ok(())
    }

    /// Clamp a requested position into the axis bounds.
    pub fn clamp(&self, position: i32) -> i32 {
        position.clamp(self.lower_limit, self.upper_limit)
    }

    /// Start-up position, halfway through the range.
    ///
    /// Always strictly below `upper_limit`, so `home() + 1` is in range.
    pub fn home(&self) -> i32 {
        let span = i64::from(self.upper_limit) - i64::from(self.lower_limit);
        (i64::from(self.lower_limit) + span / 2) as i32
    }
}
