//! Rate-limited servo motion for a ServoBlaster pan-tilt unit.
//!
//! Each axis is driven by its own [`ServoController`] task that steps the
//! commanded pulse width one unit per tick toward the most recently
//! requested target. [`PanTilt`] bundles a pan and a tilt controller around
//! one shared [`PwmSink`].
//!
//! This crate intentionally avoids any process- or CLI-specific
//! dependencies.

pub mod axis;
pub mod config;
pub mod controller;
pub mod error;
pub mod rig;
pub mod sink;

pub use axis::AxisConfig;
pub use config::MotionConfig;
pub use controller::ServoController;
pub use error::{Error, Result};
pub use rig::{Direction, PanTilt};
pub use sink::{LineSink, PwmSink, RecordingSink, ServoCommand};
