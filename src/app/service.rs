//! Vent controller — the domain core.
//!
//! Subscribes to the polling driver's events and maps each temperature
//! reading onto actuator toggles through three independently evaluated
//! guards:
//!
//! ```text
//!   t ≥ flap_open_temp_c   → open flap
//!   t ≥ door_open_temp_c   → open door
//!   0 < t ≤ all_close_temp_c → close both
//! ```
//!
//! The guard bands do not overlap (close sits below both open
//! thresholds), which is the hysteresis preventing rapid toggling around
//! a single boundary. Toggle failures are logged and left for the next
//! reading to retry; the controller runs on the poller thread and never
//! blocks beyond one capability call.

use log::{info, warn};

use crate::app::ports::{MotorControl, SensorEvents};
use crate::config::VentConfig;
use crate::drivers::vent::{VentDriver, VentState, VentTarget};
use crate::error::SensorError;
use crate::sensors::frame::Reading;

/// Holds both vent drivers and the configured thresholds.
pub struct VentController<DM, FM>
where
    DM: MotorControl + Send + 'static,
    FM: MotorControl + Send + 'static,
{
    door: VentDriver<DM>,
    flap: VentDriver<FM>,
    door_open_temp_c: f32,
    flap_open_temp_c: f32,
    all_close_temp_c: f32,
}

impl<DM, FM> VentController<DM, FM>
where
    DM: MotorControl + Send + 'static,
    FM: MotorControl + Send + 'static,
{
    pub fn new(door: VentDriver<DM>, flap: VentDriver<FM>, config: &VentConfig) -> Self {
        Self {
            door,
            flap,
            door_open_temp_c: config.door_open_temp_c,
            flap_open_temp_c: config.flap_open_temp_c,
            all_close_temp_c: config.all_close_temp_c,
        }
    }

    pub fn door_state(&self) -> VentState {
        self.door.state()
    }

    pub fn flap_state(&self) -> VentState {
        self.flap.state()
    }

    // ── Manual operations (exposed to the orchestration layer) ───

    pub fn open_door(&mut self) {
        apply(&mut self.door, VentTarget::Open);
    }

    pub fn close_door(&mut self) {
        apply(&mut self.door, VentTarget::Closed);
    }

    pub fn open_flap(&mut self) {
        apply(&mut self.flap, VentTarget::Open);
    }

    pub fn close_flap(&mut self) {
        apply(&mut self.flap, VentTarget::Closed);
    }

    pub fn open_all(&mut self) {
        self.open_door();
        self.open_flap();
    }

    pub fn close_all(&mut self) {
        self.close_door();
        self.close_flap();
    }
}

/// Toggle one vent and log the outcome; errors are not propagated, the
/// next reading re-evaluates the guards anyway.
fn apply<M: MotorControl + Send + 'static>(vent: &mut VentDriver<M>, target: VentTarget) {
    match vent.toggle(target) {
        Ok(true) => info!("{} is {}", vent.name(), target),
        Ok(false) => info!("{} is already {}", vent.name(), target),
        Err(e) => warn!("{}: {}", vent.name(), e),
    }
}

impl<DM, FM> SensorEvents for VentController<DM, FM>
where
    DM: MotorControl + Send + 'static,
    FM: MotorControl + Send + 'static,
{
    fn on_reading(&mut self, reading: Reading) {
        info!(
            "current temperature {:.1} °C ({:.1} % RH)",
            reading.temperature_c, reading.humidity_pct
        );

        // All guards are evaluated on every reading; at high temperature
        // both open guards fire.
        if reading.temperature_c >= self.flap_open_temp_c {
            self.open_flap();
        }
        if reading.temperature_c >= self.door_open_temp_c {
            self.open_door();
        }
        if reading.temperature_c > 0.0 && reading.temperature_c <= self.all_close_temp_c {
            self.close_door();
            self.close_flap();
        }
    }

    fn on_error(&mut self, error: SensorError) {
        warn!("sensor: {error}");
    }
}
