//! Unified error types for the heatvent firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level control loop's error handling uniform. All variants are
//! `Copy` so they can be passed through event callbacks and across the
//! poller thread boundary without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The sensor could not be read or returned implausible data.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Capability I/O errors
// ---------------------------------------------------------------------------

/// Failure reported by a digital I/O or motor capability.
///
/// The payload names the operation that failed (e.g. `"gpio read failed"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoError(pub &'static str);

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Where a protocol wait ran out of its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutSite {
    /// The sensor never pulled the line high for its acknowledgment pulse.
    AckRise,
    /// The sensor never released the acknowledgment pulse back to low.
    AckFall,
    /// A transition was never observed while sampling data bit `n`.
    Bit(u8),
    /// Every capture attempt within one polling cycle's retry budget failed.
    RetryBudget,
}

impl fmt::Display for TimeoutSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AckRise => write!(f, "waiting for acknowledgment rise"),
            Self::AckFall => write!(f, "waiting for acknowledgment fall"),
            Self::Bit(n) => write!(f, "sampling data bit {n}"),
            Self::RetryBudget => write!(f, "after exhausting the retry budget"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorError {
    /// The digital I/O capability failed; aborts the current capture.
    Io(IoError),
    /// Expected protocol timing was not observed.
    Timeout(TimeoutSite),
    /// Frame checksum mismatch; the frame is corrupt and must be rejected.
    Checksum { computed: u8, received: u8 },
    /// Decoded humidity is outside the sensor's physical range [0, 100] %.
    HumidityRange(f32),
    /// Decoded temperature is outside the sensor's physical range [-40, 80] °C.
    TemperatureRange(f32),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O failure: {e}"),
            Self::Timeout(site) => write!(f, "timed out {site}"),
            Self::Checksum { computed, received } => {
                write!(f, "checksum mismatch (computed {computed:#04x}, received {received:#04x})")
            }
            Self::HumidityRange(v) => write!(f, "humidity {v:.1} % out of range"),
            Self::TemperatureRange(v) => write!(f, "temperature {v:.1} °C out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// The motor direction command was rejected by the capability.
    /// The actuator's recorded state is unchanged.
    Drive(IoError),
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drive(e) => write!(f, "motor drive failed: {e}"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// std interop
// ---------------------------------------------------------------------------

impl std::error::Error for Error {}
impl std::error::Error for IoError {}
impl std::error::Error for SensorError {}
impl std::error::Error for ActuatorError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
