//! Pan-tilt coordinator.
//!
//! Pan moves right with increasing pulse width; tilt moves up with
//! decreasing pulse width, matching a servo mounted upside down on the pan
//! bracket.

use crate::{
    axis::AxisConfig,
    config::MotionConfig,
    controller::ServoController,
    error::Result,
    sink::{LineSink, PwmSink},
};
use std::{path::Path, sync::Arc};
use tokio::time;
use tracing::info;

/// Direction of a relative move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Parse direction from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Two servo controllers sharing one PWM sink.
pub struct PanTilt {
    pan: ServoController,
    tilt: ServoController,
}

impl PanTilt {
    /// Open the PWM device and start both axes.
    pub async fn open<P: AsRef<Path>>(
        device: P,
        pan: AxisConfig,
        tilt: AxisConfig,
        motion: &MotionConfig,
    ) -> Result<Self> {
        let sink = Arc::new(LineSink::open(device)?);
        Self::start(pan, tilt, sink, motion).await
    }

    /// Start both axes on `sink` and return once the settle delay has passed
    /// and each servo has accepted its startup resync.
    ///
    /// Fails with the halting error if either axis cannot write its resync.
    pub async fn start(
        pan: AxisConfig,
        tilt: AxisConfig,
        sink: Arc<dyn PwmSink>,
        motion: &MotionConfig,
    ) -> Result<Self> {
        pan.validate()?;
        tilt.validate()?;
        let timing = motion.timing()?;

        let pan = ServoController::start(pan, sink.clone(), timing);
        let tilt = ServoController::start(tilt, sink, timing);
        time::sleep(timing.settle).await;

        // the settle delay may be shorter than the first tick
        let (pan_synced, tilt_synced) = tokio::join!(
            pan.wait_until(pan.axis().home() + 1),
            tilt.wait_until(tilt.axis().home() + 1)
        );
        if let Err(err) = pan_synced.and(tilt_synced) {
            let (pan, tilt) = tokio::join!(pan.shutdown(), tilt.shutdown());
            pan.and(tilt)?;
            return Err(err);
        }

        info!(
            pan = pan.current_position(),
            tilt = tilt.current_position(),
            "pan-tilt ready"
        );
        Ok(Self { pan, tilt })
    }

    pub fn pan(&self) -> &ServoController {
        &self.pan
    }

    pub fn tilt(&self) -> &ServoController {
        &self.tilt
    }

    pub fn right(&self, distance: i32, speed: f64) -> bool {
        let pan = &self.pan;
        pan.move_to(pan.current_position().saturating_add(distance), speed)
    }

    pub fn left(&self, distance: i32, speed: f64) -> bool {
        let pan = &self.pan;
        pan.move_to(pan.current_position().saturating_sub(distance), speed)
    }

    pub fn up(&self, distance: i32, speed: f64) -> bool {
        let tilt = &self.tilt;
        tilt.move_to(tilt.current_position().saturating_sub(distance), speed)
    }

    pub fn down(&self, distance: i32, speed: f64) -> bool {
        let tilt = &self.tilt;
        tilt.move_to(tilt.current_position().saturating_add(distance), speed)
    }

    pub fn nudge(&self, direction: Direction, distance: i32, speed: f64) -> bool {
        match direction {
            Direction::Left => self.left(distance, speed),
            Direction::Right => self.right(distance, speed),
            Direction::Up => self.up(distance, speed),
            Direction::Down => self.down(distance, speed),
        }
    }

    /// Wait until both axes reach their latest targets.
    pub async fn settled(&self) -> Result<(i32, i32)> {
        let (pan, tilt) = tokio::join!(self.pan.settled(), self.tilt.settled());
        Ok((pan?, tilt?))
    }

    /// Stop both control loops, reporting the first failure.
    pub async fn shutdown(self) -> Result<()> {
        let (pan, tilt) = tokio::join!(self.pan.shutdown(), self.tilt.shutdown());
        pan.and(tilt)
    }

    /// Wait for both axes to arrive, then stop them.
    ///
    /// If an axis halts on the way, the error that halted it is returned
    /// rather than the bare [`crate::Error::ControllerStopped`] seen by waiters.
    pub async fn finish(self) -> Result<(i32, i32)> {
        match self.settled().await {
            Ok(arrived) => {
                self.shutdown().await?;
                Ok(arrived)
            }
            Err(err) => {
                self.shutdown().await?;
                Err(err)
            }
        }
    }
}
