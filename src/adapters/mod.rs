//! Hardware adapters implementing the port traits.
//!
//! [`motor`] is pure embedded-hal and builds everywhere; [`gpio`] wraps
//! ESP-IDF pin drivers and only exists with the `espidf` feature.

#[cfg(feature = "espidf")]
pub mod gpio;
pub mod motor;
