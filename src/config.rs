//! System configuration parameters
//!
//! All tunable parameters for the heatvent system. Values arrive from the
//! orchestration layer (flags, provisioning); this crate only consumes
//! them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VentConfig {
    // --- Thresholds ---
    /// Temperature (°C) at or above which the door opens
    pub door_open_temp_c: f32,
    /// Temperature (°C) at or above which the flap opens
    pub flap_open_temp_c: f32,
    /// Temperature (°C) at or below which both vents close (must stay
    /// below the open thresholds so the bands cannot chatter)
    pub all_close_temp_c: f32,

    // --- Sensor polling ---
    /// Interval between polling cycles (milliseconds)
    pub poll_interval_ms: u32,
    /// Capture attempts per polling cycle before an error is reported
    pub sensor_retries: u8,
    /// Pause between failed capture attempts (milliseconds)
    pub retry_backoff_ms: u32,

    // --- Actuators ---
    /// Drive duration after which motor current is cut (milliseconds)
    pub travel_time_ms: u32,
}

impl Default for VentConfig {
    fn default() -> Self {
        Self {
            // Thresholds
            door_open_temp_c: 30.0,
            flap_open_temp_c: 40.0,
            all_close_temp_c: 24.0,

            // Sensor polling
            poll_interval_ms: 300_000, // 5 min
            sensor_retries: 15,
            retry_backoff_ms: 3000,

            // Actuators
            travel_time_ms: 60_000, // 1 min
        }
    }
}

impl VentConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.poll_interval_ms))
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(u64::from(self.retry_backoff_ms))
    }

    pub fn travel_time(&self) -> Duration {
        Duration::from_millis(u64::from(self.travel_time_ms))
    }
}
