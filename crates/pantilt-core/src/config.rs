//! Motion timing configuration.
//!
//! All intervals are expressed in seconds so the type can be read directly
//! from TOML or JSON. [`MotionConfig::timing`] validates the values and
//! converts them into the [`Timing`] used by the control loops.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Numerator of the speed-to-interval law: a speed `s` ticks every
/// `DEFAULT_BASE_INTERVAL / s` seconds. Calibrated for a 0.1s nominal tick.
pub const DEFAULT_BASE_INTERVAL: f64 = 0.1;

/// Tick interval a freshly started controller uses for its startup resync.
pub const DEFAULT_INITIAL_INTERVAL: f64 = 0.1;

/// Tick interval once an axis has reached its target.
pub const DEFAULT_IDLE_INTERVAL: f64 = 1.0;

/// How long [`PanTilt`](crate::PanTilt) waits after starting both axes.
pub const DEFAULT_SETTLE_DELAY: f64 = 1.0;

/// Consecutive sink failures tolerated before a controller halts.
pub const DEFAULT_MAX_WRITE_FAILURES: u32 = 3;

/// Motion timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Seconds per tick at speed 1.0
    #[serde(default = "default_base_interval")]
    pub base_interval: f64,

    /// Seconds per tick before the first speed request
    #[serde(default = "default_initial_interval")]
    pub initial_interval: f64,

    /// Seconds per tick while stationary
    #[serde(default = "default_idle_interval")]
    pub idle_interval: f64,

    /// Seconds to wait after starting the controllers
    #[serde(default = "default_settle_delay")]
    pub settle_delay: f64,

    /// Consecutive write failures before a controller gives up
    #[serde(default = "default_max_write_failures")]
    pub max_write_failures: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            base_interval: default_base_interval(),
            initial_interval: default_initial_interval(),
            idle_interval: default_idle_interval(),
            settle_delay: default_settle_delay(),
            max_write_failures: default_max_write_failures(),
        }
    }
}

fn default_base_interval() -> f64 {
    DEFAULT_BASE_INTERVAL
}

fn default_initial_interval() -> f64 {
    DEFAULT_INITIAL_INTERVAL
}

fn default_idle_interval() -> f64 {
    DEFAULT_IDLE_INTERVAL
}

fn default_settle_delay() -> f64 {
    DEFAULT_SETTLE_DELAY
}

fn default_max_write_failures() -> u32 {
    DEFAULT_MAX_WRITE_FAILURES
}

impl MotionConfig {
    /// Validate the configuration and convert it into loop timing.
    pub fn timing(&self) -> Result<Timing> {
        Ok(Timing {
            base: seconds("base_interval", self.base_interval)?,
            initial: seconds("initial_interval", self.initial_interval)?,
            idle: seconds("idle_interval", self.idle_interval)?,
            settle: seconds("settle_delay", self.settle_delay)?,
            max_write_failures: self.max_write_failures.max(1),
        })
    }
}

fn seconds(name: &'static str, value: f64) -> Result<Duration> {
    if !(value.is_finite() && value > 0.0) {
        return Err(Error::InvalidTiming { name, value });
    }
    Duration::try_from_secs_f64(value).map_err(|_| Error::InvalidTiming { name, value })
}

/// Validated timing shared by the controllers of one rig.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub base: Duration,
    pub initial: Duration,
    pub idle: Duration,
    pub settle: Duration,
    pub max_write_failures: u32,
}

impl Timing {
    /// Tick interval for a requested speed. Larger speeds step slower.
    ///
    /// Returns `None` for speeds that have no meaningful interval
    /// (zero, negative, NaN, infinite, or an unrepresentable result).
    pub fn interval_for(&self, speed: f64) -> Option<Duration> {
        if !(speed.is_finite() && speed > 0.0) {
            return None;
        }
        Duration::try_from_secs_f64(self.base.as_secs_f64() / speed).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_servoblaster_calibration() {
        let timing = MotionConfig::default().timing().unwrap();
        assert_eq!(timing.base, Duration::from_millis(100));
        assert_eq!(timing.initial, Duration::from_millis(100));
        assert_eq!(timing.idle, Duration::from_secs(1));
        assert_eq!(timing.settle, Duration::from_secs(1));
        assert_eq!(timing.max_write_failures, 3);
    }

    #[test]
    fn speed_is_inverse_of_interval() {
        let timing = MotionConfig::default().timing().unwrap();
        assert_eq!(timing.interval_for(1.0), Some(Duration::from_millis(100)));
        assert_eq!(timing.interval_for(2.0), Some(Duration::from_millis(50)));
        assert_eq!(timing.interval_for(0.5), Some(Duration::from_millis(200)));
        assert_eq!(timing.interval_for(0.1), Some(Duration::from_secs(1)));
    }

    #[test]
    fn degenerate_speeds_have_no_interval() {
        let timing = MotionConfig::default().timing().unwrap();
        assert_eq!(timing.interval_for(0.0), None);
        assert_eq!(timing.interval_for(-1.0), None);
        assert_eq!(timing.interval_for(f64::NAN), None);
        assert_eq!(timing.interval_for(f64::INFINITY), None);
        assert_eq!(timing.interval_for(f64::MIN_POSITIVE), None);
    }

    #[test]
    fn rejects_non_positive_intervals() {
        let config = MotionConfig {
            idle_interval: 0.0,
            ..MotionConfig::default()
        };
        match config.timing() {
            Err(Error::InvalidTiming { name, .. }) => assert_eq!(name, "idle_interval"),
            other => panic!("expected invalid timing, got {other:?}"),
        }

        let config = MotionConfig {
            base_interval: f64::NAN,
            ..MotionConfig::default()
        };
        assert!(config.timing().is_err());
    }

    #[test]
    fn zero_failure_budget_still_allows_one_attempt() {
        let config = MotionConfig {
            max_write_failures: 0,
            ..MotionConfig::default()
        };
        assert_eq!(config.timing().unwrap().max_write_failures, 1);
    }
}
