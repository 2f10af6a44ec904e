//! Single-wire signal sampler.
//!
//! Drives the sensor's wake-up handshake on the shared data line, then
//! measures how long the line stays high for each of the 40 data bits.
//! The pulse widths go to [`frame::decode`](super::frame::decode) for
//! classification.
//!
//! ```text
//! host:   ──┐ ≥1 ms ┌──(release)───────────────────────────────
//!           └───────┘
//! sensor:            ──┐80µs┌────┐ bit0 ┌──┐ bit1 ┌── ...
//!                      └────┘    └──────┘  └──────┘
//!                      ack       measure the high time per bit
//! ```
//!
//! Every wait busy-polls the line under a fixed iteration budget. A tight
//! spin, not a sleep: the pulse widths being discriminated are tens of
//! microseconds apart, far below any scheduler granularity. Exceeding a
//! budget fails the capture with the timeout site; an I/O failure aborts
//! it immediately. Either exactly 40 pulse widths are returned or an
//! error; a partial frame never reaches the decoder.

use std::thread;
use std::time::{Duration, Instant};

use crate::app::ports::{DigitalIo, Level, PinId, SensorPort};
use crate::error::{SensorError, TimeoutSite};
use crate::sensors::frame::{self, FRAME_BITS, Reading};

/// Iterations allowed per level wait before declaring a timeout.
const SPIN_BUDGET: u32 = 32_000;

/// How long the line is held low to wake the sensor.
const WAKE_HOLD: Duration = Duration::from_millis(1);

/// Run one full capture: the wake-up handshake followed by 40 pulse
/// measurements.
pub fn capture(
    io: &mut impl DigitalIo,
    pin: PinId,
) -> Result<[Duration; FRAME_BITS], SensorError> {
    // Wake pulse: hold low, then release high.
    io.write(pin, Level::Low).map_err(SensorError::Io)?;
    thread::sleep(WAKE_HOLD);
    io.write(pin, Level::High).map_err(SensorError::Io)?;

    // Sensor acknowledgment: one high-then-low pulse.
    wait_for(io, pin, Level::High, TimeoutSite::AckRise)?;
    wait_for(io, pin, Level::Low, TimeoutSite::AckFall)?;

    let mut pulses = [Duration::ZERO; FRAME_BITS];
    for (bit, slot) in pulses.iter_mut().enumerate() {
        *slot = high_duration(io, pin, bit as u8)?;
    }
    Ok(pulses)
}

/// Spin until `pin` reads `level`, bounded by [`SPIN_BUDGET`].
fn wait_for(
    io: &mut impl DigitalIo,
    pin: PinId,
    level: Level,
    site: TimeoutSite,
) -> Result<(), SensorError> {
    for _ in 0..SPIN_BUDGET {
        if io.read(pin).map_err(SensorError::Io)? == level {
            return Ok(());
        }
    }
    Err(SensorError::Timeout(site))
}

/// Measure how long the line stays high for one data bit.
fn high_duration(
    io: &mut impl DigitalIo,
    pin: PinId,
    bit: u8,
) -> Result<Duration, SensorError> {
    wait_for(io, pin, Level::High, TimeoutSite::Bit(bit))?;
    let raised = Instant::now();
    wait_for(io, pin, Level::Low, TimeoutSite::Bit(bit))?;
    Ok(raised.elapsed())
}

// ───────────────────────────────────────────────────────────────
// Sampler as a sensor port
// ───────────────────────────────────────────────────────────────

/// Owns the sensor's data line and produces validated readings.
pub struct DhtSampler<IO> {
    io: IO,
    pin: PinId,
}

impl<IO: DigitalIo> DhtSampler<IO> {
    pub fn new(io: IO, pin: PinId) -> Self {
        Self { io, pin }
    }

    /// GPIO the sensor line is attached to.
    pub fn pin(&self) -> PinId {
        self.pin
    }
}

impl<IO: DigitalIo> SensorPort for DhtSampler<IO> {
    fn sample(&mut self) -> Result<Reading, SensorError> {
        let pulses = capture(&mut self.io, self.pin)?;
        frame::decode(&pulses)
    }
}
