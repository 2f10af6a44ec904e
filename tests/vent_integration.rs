//! Integration tests: polling driver → controller → vent drivers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use heatvent::app::ports::{Direction, MotorControl, SensorEvents, SensorPort};
use heatvent::app::service::VentController;
use heatvent::config::VentConfig;
use heatvent::drivers::vent::VentDriver;
use heatvent::error::{IoError, SensorError, TimeoutSite};
use heatvent::sensors::frame::Reading;
use heatvent::sensors::poller::DhtPoller;

// ── Mock implementations ──────────────────────────────────────

#[derive(Clone)]
struct RecordingMotor(Arc<Mutex<Vec<Direction>>>);

impl RecordingMotor {
    fn new() -> (Self, Arc<Mutex<Vec<Direction>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Self(Arc::clone(&log)), log)
    }
}

impl MotorControl for RecordingMotor {
    fn set_direction(&mut self, direction: Direction) -> Result<(), IoError> {
        self.0.lock().unwrap().push(direction);
        Ok(())
    }
}

/// Replays scripted sample results; `fallback` repeats once the script
/// is exhausted.
struct ScriptedSensor {
    script: VecDeque<Result<Reading, SensorError>>,
    fallback: Result<Reading, SensorError>,
}

impl ScriptedSensor {
    fn new(
        script: Vec<Result<Reading, SensorError>>,
        fallback: Result<Reading, SensorError>,
    ) -> Self {
        Self {
            script: script.into(),
            fallback,
        }
    }
}

impl SensorPort for ScriptedSensor {
    fn sample(&mut self) -> Result<Reading, SensorError> {
        self.script.pop_front().unwrap_or(self.fallback)
    }
}

/// Returns a strictly increasing temperature on every sample, so every
/// polling cycle publishes.
struct CountingSensor(f32);

impl SensorPort for CountingSensor {
    fn sample(&mut self) -> Result<Reading, SensorError> {
        self.0 += 0.1;
        ok(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    Reading(f32),
    Error(SensorError),
}

#[derive(Clone)]
struct RecordingEvents(Arc<Mutex<Vec<Event>>>);

impl RecordingEvents {
    fn new() -> (Self, Arc<Mutex<Vec<Event>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (Self(Arc::clone(&log)), log)
    }
}

impl SensorEvents for RecordingEvents {
    fn on_reading(&mut self, reading: Reading) {
        self.0.lock().unwrap().push(Event::Reading(reading.temperature_c));
    }

    fn on_error(&mut self, error: SensorError) {
        self.0.lock().unwrap().push(Event::Error(error));
    }
}

fn ok(temperature_c: f32) -> Result<Reading, SensorError> {
    Ok(Reading {
        temperature_c,
        humidity_pct: 55.0,
    })
}

fn capture_failure() -> Result<Reading, SensorError> {
    Err(SensorError::Timeout(TimeoutSite::AckRise))
}

/// Default thresholds, but polling paced for tests.
fn fast_config() -> VentConfig {
    VentConfig {
        poll_interval_ms: 5,
        sensor_retries: 5,
        retry_backoff_ms: 1,
        ..VentConfig::default()
    }
}

// ── Poller: retry policy ──────────────────────────────────────

#[test]
fn recoverable_failures_still_publish_one_reading() {
    let sensor = ScriptedSensor::new(
        vec![capture_failure(), capture_failure(), capture_failure(), ok(25.5)],
        ok(25.5),
    );
    let (events, log) = RecordingEvents::new();
    let config = VentConfig {
        poll_interval_ms: 60_000, // one cycle only
        ..fast_config()
    };

    let mut poller = DhtPoller::new(sensor, events, &config);
    poller.start();
    thread::sleep(Duration::from_millis(150));
    poller.stop();

    assert_eq!(*log.lock().unwrap(), vec![Event::Reading(25.5)]);
}

#[test]
fn exhausted_retries_surface_one_error() {
    let sensor = ScriptedSensor::new(vec![], capture_failure());
    let (events, log) = RecordingEvents::new();
    let config = VentConfig {
        poll_interval_ms: 60_000,
        sensor_retries: 3,
        ..fast_config()
    };

    let mut poller = DhtPoller::new(sensor, events, &config);
    poller.start();
    thread::sleep(Duration::from_millis(150));
    poller.stop();

    assert_eq!(
        *log.lock().unwrap(),
        vec![Event::Error(SensorError::Timeout(TimeoutSite::RetryBudget))]
    );
}

// ── Poller: duplicate and sentinel suppression ────────────────

#[test]
fn duplicate_readings_are_suppressed() {
    let sensor = ScriptedSensor::new(vec![ok(30.0), ok(30.0), ok(31.0)], ok(31.0));
    let (events, log) = RecordingEvents::new();

    let mut poller = DhtPoller::new(sensor, events, &fast_config());
    poller.start();
    thread::sleep(Duration::from_millis(300));
    poller.stop();

    assert_eq!(
        *log.lock().unwrap(),
        vec![Event::Reading(30.0), Event::Reading(31.0)]
    );
}

#[test]
fn zero_sentinel_is_never_published() {
    let sensor = ScriptedSensor::new(vec![ok(0.0)], ok(18.5));
    let (events, log) = RecordingEvents::new();

    let mut poller = DhtPoller::new(sensor, events, &fast_config());
    poller.start();
    thread::sleep(Duration::from_millis(300));
    poller.stop();

    assert_eq!(*log.lock().unwrap(), vec![Event::Reading(18.5)]);
}

// ── Poller: halt semantics ────────────────────────────────────

#[test]
fn stop_blocks_until_no_event_is_in_flight() {
    let (events, log) = RecordingEvents::new();
    let config = VentConfig {
        poll_interval_ms: 1,
        ..fast_config()
    };

    let mut poller = DhtPoller::new(CountingSensor(20.0), events, &config);
    poller.start();
    thread::sleep(Duration::from_millis(50));
    poller.stop();

    let published = log.lock().unwrap().len();
    assert!(published > 0, "the counting sensor publishes every cycle");

    thread::sleep(Duration::from_millis(100));
    assert_eq!(
        log.lock().unwrap().len(),
        published,
        "no event may arrive after stop() returns"
    );
}

#[test]
fn halt_interrupts_an_in_progress_backoff() {
    let sensor = ScriptedSensor::new(vec![], capture_failure());
    let (events, log) = RecordingEvents::new();
    let config = VentConfig {
        poll_interval_ms: 60_000,
        sensor_retries: 15,
        retry_backoff_ms: 60_000,
        ..VentConfig::default()
    };

    let mut poller = DhtPoller::new(sensor, events, &config);
    poller.start();
    thread::sleep(Duration::from_millis(50)); // worker is inside the backoff wait

    let asked = Instant::now();
    poller.stop();
    assert!(
        asked.elapsed() < Duration::from_secs(5),
        "stop() must not wait out the backoff"
    );
    assert!(
        log.lock().unwrap().is_empty(),
        "an aborted cycle reports neither a reading nor an exhaustion error"
    );
}

// ── Controller: end-to-end threshold scenario ─────────────────

#[test]
fn temperature_swing_drives_door_and_flap() {
    let (door_motor, door_log) = RecordingMotor::new();
    let (flap_motor, flap_log) = RecordingMotor::new();
    let config = fast_config();

    let door = VentDriver::new("door", door_motor, Duration::from_secs(600));
    let flap = VentDriver::new("flap", flap_motor, Duration::from_secs(600));
    let controller = VentController::new(door, flap, &config);

    // 35 °C opens the door, 41 °C additionally opens the flap,
    // 20 °C closes both.
    let sensor = ScriptedSensor::new(vec![ok(35.0), ok(41.0), ok(20.0)], ok(20.0));

    let mut poller = DhtPoller::new(sensor, controller, &config);
    poller.start();
    thread::sleep(Duration::from_millis(300));
    poller.stop();

    assert_eq!(
        *door_log.lock().unwrap(),
        vec![Direction::Forward, Direction::Backward],
        "door: opened once at 35 °C (already open at 41 °C), closed at 20 °C"
    );
    assert_eq!(
        *flap_log.lock().unwrap(),
        vec![Direction::Forward, Direction::Backward],
        "flap: opened at 41 °C, closed at 20 °C"
    );
}

// ── Controller: manual operations ─────────────────────────────

#[test]
fn manual_open_all_and_close_all() {
    let (door_motor, door_log) = RecordingMotor::new();
    let (flap_motor, flap_log) = RecordingMotor::new();
    let config = VentConfig::default();

    let door = VentDriver::new("door", door_motor, Duration::from_secs(600));
    let flap = VentDriver::new("flap", flap_motor, Duration::from_secs(600));
    let mut controller = VentController::new(door, flap, &config);

    controller.open_all();
    controller.close_all();
    controller.close_all(); // idempotent: no further commands

    let expected = vec![Direction::Forward, Direction::Backward];
    assert_eq!(*door_log.lock().unwrap(), expected);
    assert_eq!(*flap_log.lock().unwrap(), expected);
}
