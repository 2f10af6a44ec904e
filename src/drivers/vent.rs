//! Vent actuator driver: an idempotent toggle state machine with a
//! deferred auto-stop.
//!
//! The vent motors are momentary drives (gearmotors on a fixed travel),
//! not holding actuators. A toggle therefore commands a direction and
//! arms a one-shot timer that cuts drive current after the travel time;
//! the recorded logical state keeps reflecting the last commanded
//! position after the current is cut.
//!
//! ## Toggle contract
//!
//! - `toggle(target)` with `target` equal to the current state is a
//!   no-op returning `Ok(false)`; no motor command, no timer churn.
//! - Otherwise the pending timer (if any) is cancelled and joined
//!   **before** the motor command, and a fresh timer is armed after it.
//!   At most one timer is pending per driver at any time, and a stale
//!   expiry can never fire once the next command went out.
//! - A failed motor command leaves the recorded state unchanged and is
//!   not retried here; the controller re-evaluates on the next reading.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use core::fmt;

use log::{debug, info, warn};

use crate::app::ports::{Direction, MotorControl};
use crate::error::ActuatorError;

/// Recorded position of one vent actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VentState {
    Open,
    Closed,
    /// Initial state: nothing is assumed about the physical position
    /// until the first commanded toggle.
    Unknown,
}

/// A commandable position (the `Unknown` state cannot be requested).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VentTarget {
    Open,
    Closed,
}

impl VentTarget {
    pub fn state(self) -> VentState {
        match self {
            Self::Open => VentState::Open,
            Self::Closed => VentState::Closed,
        }
    }

    fn direction(self) -> Direction {
        match self {
            Self::Open => Direction::Forward,
            Self::Closed => Direction::Backward,
        }
    }
}

impl fmt::Display for VentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Handle on the armed auto-stop timer thread.
struct StopTimer {
    cancel_tx: Sender<()>,
    worker: JoinHandle<()>,
}

/// One vent actuator (door or flap).
pub struct VentDriver<M: MotorControl + Send + 'static> {
    name: &'static str,
    /// Shared with the auto-stop timer thread only.
    motor: Arc<Mutex<M>>,
    state: VentState,
    travel_time: Duration,
    stop_timer: Option<StopTimer>,
}

impl<M: MotorControl + Send + 'static> VentDriver<M> {
    pub fn new(name: &'static str, motor: M, travel_time: Duration) -> Self {
        Self {
            name,
            motor: Arc::new(Mutex::new(motor)),
            state: VentState::Unknown,
            travel_time,
            stop_timer: None,
        }
    }

    /// Actuator name used in logs ("door", "flap").
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last commanded position.
    pub fn state(&self) -> VentState {
        self.state
    }

    /// Drive the vent to `target`.
    ///
    /// Returns `Ok(true)` if a motor command went out, `Ok(false)` if the
    /// vent was already in the requested state.
    pub fn toggle(&mut self, target: VentTarget) -> Result<bool, ActuatorError> {
        if self.state == target.state() {
            return Ok(false);
        }

        self.cancel_stop_timer();

        lock(&self.motor)
            .set_direction(target.direction())
            .map_err(ActuatorError::Drive)?;

        self.state = target.state();
        self.arm_stop_timer();
        debug!("{}: driving {} for {:?}", self.name, target, self.travel_time);
        Ok(true)
    }

    /// Cancel the pending timer and wait for its thread to exit, so that
    /// a stale expiry cannot interleave with the next motor command.
    fn cancel_stop_timer(&mut self) {
        if let Some(timer) = self.stop_timer.take() {
            // A timer that already expired has left the channel; the send
            // result is irrelevant either way.
            let _ = timer.cancel_tx.send(());
            if timer.worker.join().is_err() {
                warn!("{}: auto-stop timer thread panicked", self.name);
            }
        }
    }

    fn arm_stop_timer(&mut self) {
        let (cancel_tx, cancel_rx) = mpsc::channel();
        let motor = Arc::clone(&self.motor);
        let travel_time = self.travel_time;
        let name = self.name;

        let worker = thread::Builder::new()
            .name(format!("{name}-stop"))
            .spawn(move || match cancel_rx.recv_timeout(travel_time) {
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
                Err(RecvTimeoutError::Timeout) => {
                    // Travel complete: cut drive current. The logical
                    // open/closed state is untouched.
                    match lock(&motor).set_direction(Direction::Neutral) {
                        Ok(()) => info!("{name}: drive current cut"),
                        Err(e) => warn!("{name}: auto-stop failed: {e}"),
                    }
                }
            })
            .expect("vent auto-stop: thread creation failed");

        self.stop_timer = Some(StopTimer { cancel_tx, worker });
    }
}

/// The motor mutex can only be poisoned by a panic inside a capability
/// call; the capability state is no worse than before that call, so the
/// lock is recovered rather than propagating the poison.
fn lock<M>(motor: &Arc<Mutex<M>>) -> MutexGuard<'_, M> {
    motor.lock().unwrap_or_else(PoisonError::into_inner)
}
