//! H-bridge motor adapter.
//!
//! Drives a DRV8871-style bridge through its two direction inputs.
//! Forward raises IN1 with IN2 low, backward the inverse; neutral drops
//! both and the motor coasts. Generic over any pair of `embedded-hal`
//! output pins.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{Direction, MotorControl};
use crate::error::IoError;

const FORWARD_PIN_ERR: IoError = IoError("forward pin write failed");
const BACKWARD_PIN_ERR: IoError = IoError("backward pin write failed");

/// One vent motor behind a two-input H-bridge.
pub struct HBridge<F, B> {
    forward: F,
    backward: B,
}

impl<F: OutputPin, B: OutputPin> HBridge<F, B> {
    /// Takes ownership of both direction inputs and drops them low, so
    /// the bridge starts out coasting.
    pub fn new(mut forward: F, mut backward: B) -> Result<Self, IoError> {
        forward.set_low().map_err(|_| FORWARD_PIN_ERR)?;
        backward.set_low().map_err(|_| BACKWARD_PIN_ERR)?;
        Ok(Self { forward, backward })
    }
}

impl<F: OutputPin, B: OutputPin> MotorControl for HBridge<F, B> {
    fn set_direction(&mut self, direction: Direction) -> Result<(), IoError> {
        // The opposing input always drops before the active one rises;
        // both inputs high is a shoot-through on this bridge.
        match direction {
            Direction::Forward => {
                self.backward.set_low().map_err(|_| BACKWARD_PIN_ERR)?;
                self.forward.set_high().map_err(|_| FORWARD_PIN_ERR)
            }
            Direction::Backward => {
                self.forward.set_low().map_err(|_| FORWARD_PIN_ERR)?;
                self.backward.set_high().map_err(|_| BACKWARD_PIN_ERR)
            }
            Direction::Neutral => {
                self.forward.set_low().map_err(|_| FORWARD_PIN_ERR)?;
                self.backward.set_low().map_err(|_| BACKWARD_PIN_ERR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type WriteLog = Rc<RefCell<Vec<(&'static str, bool)>>>;

    /// Records every level write into a log shared with the test.
    struct FakePin {
        name: &'static str,
        log: WriteLog,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push((self.name, false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.log.borrow_mut().push((self.name, true));
            Ok(())
        }
    }

    fn bridge() -> (HBridge<FakePin, FakePin>, WriteLog) {
        let log: WriteLog = Rc::new(RefCell::new(Vec::new()));
        let bridge = HBridge::new(
            FakePin {
                name: "fwd",
                log: Rc::clone(&log),
            },
            FakePin {
                name: "bwd",
                log: Rc::clone(&log),
            },
        )
        .unwrap();
        log.borrow_mut().clear(); // drop the construction writes
        (bridge, log)
    }

    #[test]
    fn forward_raises_forward_after_dropping_backward() {
        let (mut motor, log) = bridge();
        motor.set_direction(Direction::Forward).unwrap();
        assert_eq!(*log.borrow(), vec![("bwd", false), ("fwd", true)]);
    }

    #[test]
    fn backward_raises_backward_after_dropping_forward() {
        let (mut motor, log) = bridge();
        motor.set_direction(Direction::Backward).unwrap();
        assert_eq!(*log.borrow(), vec![("fwd", false), ("bwd", true)]);
    }

    #[test]
    fn neutral_drops_both_inputs() {
        let (mut motor, log) = bridge();
        motor.set_direction(Direction::Forward).unwrap();
        log.borrow_mut().clear();
        motor.set_direction(Direction::Neutral).unwrap();
        assert_eq!(*log.borrow(), vec![("fwd", false), ("bwd", false)]);
    }
}
