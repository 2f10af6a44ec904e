//! Background polling driver for the single-wire sensor.
//!
//! Owns one worker thread that repeatedly samples the sensor port,
//! applies the retry policy, suppresses duplicate or sentinel values,
//! and publishes typed events to the sink registered at construction.
//!
//! ```text
//!            ┌──────────────────────────────────────────┐
//!            │  dht-poll thread                         │
//! start() ──▶│  loop { sample×retries → publish/error } │──▶ SensorEvents
//! stop()  ──▶│  halt channel races every sleep          │
//!            └──────────────────────────────────────────┘
//! ```
//!
//! Lifecycle is `Idle → Running → Stopped`, with `Stopped` terminal.
//! `stop()` sends a halt message and then joins the worker, so no event
//! is in flight once it returns. A failed cycle surfaces one error event
//! and the loop continues; nothing short of `stop()` terminates it.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::app::ports::{SensorEvents, SensorPort};
use crate::config::VentConfig;
use crate::error::{SensorError, TimeoutSite};
use crate::sensors::frame::Reading;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollerState {
    Idle,
    Running,
    Stopped,
}

/// Polling sensor driver.
///
/// Generic over the sensor port and the event sink, both handed over at
/// construction and moved into the worker thread on [`start`](Self::start).
pub struct DhtPoller<S, E> {
    interval: Duration,
    retries: u8,
    backoff: Duration,
    state: PollerState,
    source: Option<S>,
    events: Option<E>,
    halt_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl<S, E> DhtPoller<S, E>
where
    S: SensorPort + Send + 'static,
    E: SensorEvents + 'static,
{
    pub fn new(source: S, events: E, config: &VentConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            retries: config.sensor_retries,
            backoff: config.retry_backoff(),
            state: PollerState::Idle,
            source: Some(source),
            events: Some(events),
            halt_tx: None,
            worker: None,
        }
    }

    /// Spawn the worker thread. Ignored unless the driver is idle.
    pub fn start(&mut self) {
        if self.state != PollerState::Idle {
            warn!("dht-poll: start ignored in {:?} state", self.state);
            return;
        }
        let (Some(mut source), Some(mut events)) = (self.source.take(), self.events.take())
        else {
            return;
        };

        let (halt_tx, halt_rx) = mpsc::channel();
        let interval = self.interval;
        let retries = self.retries;
        let backoff = self.backoff;

        let worker = thread::Builder::new()
            .name("dht-poll".into())
            .spawn(move || poll_loop(&mut source, &mut events, &halt_rx, interval, retries, backoff))
            .expect("dht-poll: thread creation failed");

        self.halt_tx = Some(halt_tx);
        self.worker = Some(worker);
        self.state = PollerState::Running;
        info!(
            "dht-poll: started (interval {interval:?}, {retries} attempts per cycle)"
        );
    }

    /// Halt the worker and wait for it to exit.
    ///
    /// Blocking handshake: once this returns, no reading or error event
    /// is in flight. The driver cannot be restarted afterwards.
    pub fn stop(&mut self) {
        if self.state == PollerState::Running {
            if let Some(halt_tx) = self.halt_tx.take() {
                // The worker may already have exited on channel disconnect.
                let _ = halt_tx.send(());
            }
            if let Some(worker) = self.worker.take() {
                if worker.join().is_err() {
                    warn!("dht-poll: worker thread panicked");
                }
            }
            info!("dht-poll: stopped");
        }
        self.state = PollerState::Stopped;
    }
}

// ───────────────────────────────────────────────────────────────
// Worker loop
// ───────────────────────────────────────────────────────────────

enum Cycle {
    Sample(Reading),
    Exhausted,
    Halted,
}

fn poll_loop(
    source: &mut impl SensorPort,
    events: &mut impl SensorEvents,
    halt: &Receiver<()>,
    interval: Duration,
    retries: u8,
    backoff: Duration,
) {
    let mut last_published: Option<f32> = None;

    loop {
        match sample_with_retry(source, halt, retries, backoff) {
            Cycle::Sample(reading) => {
                let changed = last_published != Some(reading.temperature_c);
                // Exact inequality, no deadband. A reading of exactly
                // 0.0 °C doubles as the conversion-failure sentinel and
                // is never published.
                if changed && reading.temperature_c != 0.0 {
                    last_published = Some(reading.temperature_c);
                    events.on_reading(reading);
                }
            }
            Cycle::Exhausted => {
                warn!("dht-poll: no valid frame within the retry budget");
                events.on_error(SensorError::Timeout(TimeoutSite::RetryBudget));
            }
            Cycle::Halted => return,
        }

        // Inter-cycle sleep, racing the halt signal.
        match halt.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

/// One polling cycle: sample until the first success or the budget runs
/// out, backing off between attempts. Halt wins over everything.
fn sample_with_retry(
    source: &mut impl SensorPort,
    halt: &Receiver<()>,
    retries: u8,
    backoff: Duration,
) -> Cycle {
    for attempt in 1..=retries {
        match source.sample() {
            Ok(reading) => return Cycle::Sample(reading),
            Err(e) => debug!("dht-poll: attempt {attempt}/{retries} failed: {e}"),
        }
        if attempt < retries {
            match halt.recv_timeout(backoff) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return Cycle::Halted,
            }
        }
    }
    Cycle::Exhausted
}
