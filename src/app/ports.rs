//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ domain (poller / vent driver / controller)
//! ```
//!
//! Driven adapters (GPIO lines, H-bridges, event consumers) implement
//! these traits. The domain consumes them via generics, so it never
//! touches hardware directly and every component can be exercised with
//! in-memory fakes.
//!
//! Each capability instance is exclusively owned by one component: the
//! digital I/O line by one polling driver, each motor by one vent driver.
//! No locking is required for pin access.

use crate::error::{IoError, SensorError};
use crate::sensors::frame::Reading;

/// Identifies a pin on the digital I/O capability.
pub type PinId = u8;

/// Logic level of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Drive direction of a vent motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Drive towards the open position.
    Forward,
    /// Drive towards the closed position.
    Backward,
    /// Cut drive current.
    Neutral,
}

// ───────────────────────────────────────────────────────────────
// Digital I/O port (driven adapter: hardware ↔ sampler)
// ───────────────────────────────────────────────────────────────

/// Raw digital pin access for the single-wire sensor line.
pub trait DigitalIo {
    /// Read the current level of `pin`.
    fn read(&mut self, pin: PinId) -> Result<Level, IoError>;

    /// Drive `pin` to `level`.
    fn write(&mut self, pin: PinId, level: Level) -> Result<(), IoError>;
}

// ───────────────────────────────────────────────────────────────
// Motor port (driven adapter: vent driver → hardware)
// ───────────────────────────────────────────────────────────────

/// Direction control for one vent motor.
pub trait MotorControl {
    fn set_direction(&mut self, direction: Direction) -> Result<(), IoError>;
}

// ───────────────────────────────────────────────────────────────
// Sensor read-side port (sampler → poller)
// ───────────────────────────────────────────────────────────────

/// Produces one validated reading per call.
///
/// The production implementation is
/// [`DhtSampler`](crate::sensors::sampler::DhtSampler) (capture + decode);
/// tests substitute scripted stubs.
pub trait SensorPort {
    fn sample(&mut self) -> Result<Reading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Sensor event sink (poller → controller / telemetry)
// ───────────────────────────────────────────────────────────────

/// Typed event callbacks, resolved at construction time.
///
/// The poller invokes these from its background thread, so implementors
/// must be `Send` and must not block beyond one capability call.
pub trait SensorEvents: Send {
    /// A fresh reading whose temperature differs from the last published one.
    fn on_reading(&mut self, reading: Reading);

    /// A polling cycle exhausted its retry budget.
    fn on_error(&mut self, error: SensorError);
}
