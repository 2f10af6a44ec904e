//! ESP-IDF GPIO adapter for the sensor data line.
//!
//! Wraps an open-drain `PinDriver` so the single wire can be both driven
//! (wake pulse) and sampled (acknowledgment and data bits); the bus
//! idles high via the external pull-up.

use esp_idf_hal::gpio::{InputOutput, Pin, PinDriver};

use crate::app::ports::{DigitalIo, Level, PinId};
use crate::error::IoError;

/// Single-wire bus on one open-drain GPIO.
pub struct OneWireGpio<'d, P: Pin> {
    pin: PinDriver<'d, P, InputOutput>,
    pin_id: PinId,
}

impl<'d, P: Pin> OneWireGpio<'d, P> {
    pub fn new(pin: PinDriver<'d, P, InputOutput>, pin_id: PinId) -> Self {
        Self { pin, pin_id }
    }
}

impl<P: Pin> DigitalIo for OneWireGpio<'_, P> {
    fn read(&mut self, pin: PinId) -> Result<Level, IoError> {
        if pin != self.pin_id {
            return Err(IoError("unmapped pin"));
        }
        Ok(if self.pin.is_high() {
            Level::High
        } else {
            Level::Low
        })
    }

    fn write(&mut self, pin: PinId, level: Level) -> Result<(), IoError> {
        if pin != self.pin_id {
            return Err(IoError("unmapped pin"));
        }
        match level {
            Level::High => self.pin.set_high().map_err(|_| IoError("gpio write failed")),
            Level::Low => self.pin.set_low().map_err(|_| IoError("gpio write failed")),
        }
    }
}
