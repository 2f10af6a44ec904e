//! Single-wire humidity/temperature sensor stack.
//!
//! Three layers, leaf first:
//!
//! - [`frame`]: pure pulse-width decoder (40 bits to a validated reading)
//! - [`sampler`]: drives the wire protocol and measures the 40 pulses
//! - [`poller`]: background polling loop with retry and event publishing

pub mod frame;
pub mod poller;
pub mod sampler;
