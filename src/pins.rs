//! GPIO pin assignments.
//!
//! Numbering follows the controller board's GPIO matrix. The door and
//! flap motors each take an H-bridge forward/backward pin pair; the
//! sensor occupies a single open-drain data line.

/// Door motor H-bridge, forward input.
pub const DOOR_MOTOR_FORWARD_GPIO: u8 = 4;
/// Door motor H-bridge, backward input.
pub const DOOR_MOTOR_BACKWARD_GPIO: u8 = 17;

/// Flap motor H-bridge, forward input.
pub const FLAP_MOTOR_FORWARD_GPIO: u8 = 27;
/// Flap motor H-bridge, backward input.
pub const FLAP_MOTOR_BACKWARD_GPIO: u8 = 22;

/// Single-wire humidity/temperature sensor data line.
pub const DHT_DATA_GPIO: u8 = 23;
