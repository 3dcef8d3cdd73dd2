//! Per-axis motion control loop.
//!
//! A [`ServoController`] owns a spawned task that wakes once per tick,
//! adopts the latest target and speed, and moves the servo one unit toward
//! the target. Callers never wait on the loop: requests are posted to
//! latest-value channels and only the most recent one is honored, so a burst
//! of [`ServoController::move_to`] calls between two ticks coalesces into one.

use crate::{
    axis::AxisConfig,
    config::{MotionConfig, Timing},
    error::{Error, Result},
    sink::{PwmSink, ServoCommand},
};
use std::{cmp::Ordering, sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle, time};
use tracing::{debug, error, trace, warn};

/// Position state owned by one control loop.
#[derive(Clone, Copy, Debug, PartialEq)]
struct MotionState {
    current: i32,
    desired: i32,
    interval: Duration,
}

impl MotionState {
    /// Home position with the target one unit above it, so the first tick
    /// always writes and the servo is synced to a known pulse width.
    fn startup(axis: &AxisConfig, timing: &Timing) -> Self {
        let current = axis.home();
        Self {
            current,
            desired: current + 1,
            interval: timing.initial,
        }
    }

    fn next_position(&self) -> Option<i32> {
        match self.current.cmp(&self.desired) {
            Ordering::Less => Some(self.current + 1),
            Ordering::Greater => Some(self.current - 1),
            Ordering::Equal => None,
        }
    }

    fn is_settled(&self) -> bool {
        self.current == self.desired
    }
}

/// Caller-side ends of a loop's channels.
struct Endpoints {
    desired: watch::Sender<i32>,
    interval: watch::Sender<Duration>,
    position: watch::Receiver<i32>,
    shutdown: watch::Sender<bool>,
}

struct ControlLoop {
    axis: AxisConfig,
    timing: Timing,
    sink: Arc<dyn PwmSink>,
    state: MotionState,
    failures: u32,
    desired: watch::Receiver<i32>,
    interval: watch::Receiver<Duration>,
    position: watch::Sender<i32>,
    shutdown: watch::Receiver<bool>,
}

impl ControlLoop {
    fn new(axis: AxisConfig, sink: Arc<dyn PwmSink>, timing: Timing) -> (Self, Endpoints) {
        let state = MotionState::startup(&axis, &timing);
        let (desired_tx, desired_rx) = watch::channel(state.desired);
        let (interval_tx, interval_rx) = watch::channel(state.interval);
        let (position_tx, position_rx) = watch::channel(state.current);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let control = Self {
            axis,
            timing,
            sink,
            state,
            failures: 0,
            desired: desired_rx,
            interval: interval_rx,
            position: position_tx,
            shutdown: shutdown_rx,
        };
        let endpoints = Endpoints {
            desired: desired_tx,
            interval: interval_tx,
            position: position_rx,
            shutdown: shutdown_tx,
        };
        (control, endpoints)
    }

    async fn run(mut self) -> Result<()> {
        let channel = self.axis.channel;
        debug!(channel, position = self.state.current, "servo controller started");

        loop {
            tokio::select! {
                // also fires when the owning handle is dropped
                _ = self.shutdown.changed() => break,
                _ = time::sleep(self.state.interval) => {}
            }

            if let Err(err) = self.tick() {
                error!(channel, error = %err, "servo controller halted");
                return Err(err);
            }
        }

        debug!(channel, position = self.state.current, "servo controller stopped");
        Ok(())
    }

    /// One iteration of the loop, minus the sleep.
    fn tick(&mut self) -> Result<()> {
        let current = self.state.current;
        self.publish(current);
        self.adopt_requests();

        if let Some(next) = self.state.next_position() {
            self.step(next)?;
        }

        if self.state.is_settled() {
            self.state.interval = self.timing.idle;
        }
        Ok(())
    }

    fn publish(&self, position: i32) {
        self.position.send_if_modified(|published| {
            if *published == position {
                return false;
            }
            *published = position;
            true
        });
    }

    fn adopt_requests(&mut self) {
        if self.desired.has_changed().unwrap_or(false) {
            self.state.desired = *self.desired.borrow_and_update();
            debug!(
                channel = self.axis.channel,
                desired = self.state.desired,
                "new target"
            );
        }
        if self.interval.has_changed().unwrap_or(false) {
            self.state.interval = *self.interval.borrow_and_update();
            debug!(
                channel = self.axis.channel,
                interval = ?self.state.interval,
                "new step interval"
            );
        }
    }

    fn step(&mut self, next: i32) -> Result<()> {
        let command = ServoCommand::new(self.axis.channel, next);
        match self.sink.write_command(&command) {
            Ok(()) => {
                self.failures = 0;
                self.state.current = next;
                self.publish(next);
                trace!(%command, "step");
                Ok(())
            }
            Err(source) => {
                self.failures += 1;
                if self.failures >= self.timing.max_write_failures {
                    return Err(Error::SinkWrite {
                        command,
                        attempts: self.failures,
                        source,
                    });
                }
                warn!(
                    %command,
                    attempt = self.failures,
                    error = %source,
                    "servo write failed, retrying next tick"
                );
                Ok(())
            }
        }
    }
}

/// Handle to one running servo control loop.
///
/// Dropping the handle stops the loop at its next wake-up.
pub struct ServoController {
    axis: AxisConfig,
    timing: Timing,
    desired: watch::Sender<i32>,
    interval: watch::Sender<Duration>,
    position: watch::Receiver<i32>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Result<()>>,
}

impl ServoController {
    /// Validate the configuration and start the control loop.
    ///
    /// The servo starts at [`AxisConfig::home`] with a target one unit
    /// above it. Must be called from within a Tokio runtime.
    pub fn spawn(
        axis: AxisConfig,
        sink: Arc<dyn PwmSink>,
        motion: &MotionConfig,
    ) -> Result<Self> {
        axis.validate()?;
        let timing = motion.timing()?;
        Ok(Self::start(axis, sink, timing))
    }

    pub(crate) fn start(axis: AxisConfig, sink: Arc<dyn PwmSink>, timing: Timing) -> Self {
        let (control, endpoints) = ControlLoop::new(axis, sink, timing);
        let task = tokio::spawn(control.run());
        Self {
            axis,
            timing,
            desired: endpoints.desired,
            interval: endpoints.interval,
            position: endpoints.position,
            shutdown: endpoints.shutdown,
            task,
        }
    }

    pub fn axis(&self) -> &AxisConfig {
        &self.axis
    }

    /// Request a new target, stepping every `base_interval / speed`.
    ///
    /// `position` is clamped into the axis limits. Nothing is posted when
    /// the clamped target equals the current position. Returns whether a
    /// request was posted; never waits for the motion.
    pub fn move_to(&self, position: i32, speed: f64) -> bool {
        let target = self.axis.clamp(position);
        if target == self.current_position() {
            return false;
        }

        self.desired.send_replace(target);
        match self.timing.interval_for(speed) {
            Some(interval) => {
                self.interval.send_replace(interval);
            }
            None => warn!(
                channel = self.axis.channel,
                speed, "ignoring speed without a usable step interval"
            ),
        }
        true
    }

    /// Last position published by the loop; at most one tick stale.
    pub fn current_position(&self) -> i32 {
        *self.position.borrow()
    }

    /// Most recently requested target.
    pub fn desired_position(&self) -> i32 {
        *self.desired.borrow()
    }

    /// Receiver of published positions, for callers that want to react to
    /// every step.
    pub fn subscribe(&self) -> watch::Receiver<i32> {
        self.position.clone()
    }

    /// Wait until the loop publishes `position`.
    pub async fn wait_until(&self, position: i32) -> Result<()> {
        let mut published = self.position.clone();
        published
            .wait_for(|current| *current == position)
            .await
            .map(|_| ())
            .map_err(|_| Error::ControllerStopped {
                channel: self.axis.channel,
            })
    }

    /// Wait until the servo reaches the most recently requested target.
    pub async fn settled(&self) -> Result<i32> {
        let target = self.desired_position();
        self.wait_until(target).await?;
        Ok(target)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop to end on its own, returning the error that halted it.
    pub async fn join(self) -> Result<()> {
        let Self {
            axis,
            shutdown,
            task,
            ..
        } = self;
        let result = task.await;
        drop(shutdown);
        result.unwrap_or(Err(Error::ControllerStopped {
            channel: axis.channel,
        }))
    }

    /// Stop the loop at its next wake-up and wait for it to exit.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown.send_replace(true);
        self.join().await
    }
}
