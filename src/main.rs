//! Heatvent firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                    │
//! │                                                          │
//! │  OneWireGpio          HBridge ×2                         │
//! │  (DigitalIo)          (MotorControl)                     │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ─────────────────     │
//! │                                                          │
//! │  DhtSampler ──▶ DhtPoller ──▶ VentController             │
//! │                 (thread)      (door + flap VentDriver)   │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::info;

use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;

use heatvent::adapters::gpio::OneWireGpio;
use heatvent::adapters::motor::HBridge;
use heatvent::app::service::VentController;
use heatvent::config::VentConfig;
use heatvent::drivers::vent::VentDriver;
use heatvent::pins;
use heatvent::sensors::poller::DhtPoller;
use heatvent::sensors::sampler::DhtSampler;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("heatvent v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let config = VentConfig::default();

    // Motors (pin numbering in pins.rs).
    let door_motor = HBridge::new(
        PinDriver::output(peripherals.pins.gpio4)?,
        PinDriver::output(peripherals.pins.gpio17)?,
    )?;
    let flap_motor = HBridge::new(
        PinDriver::output(peripherals.pins.gpio27)?,
        PinDriver::output(peripherals.pins.gpio22)?,
    )?;

    let door = VentDriver::new("door", door_motor, config.travel_time());
    let flap = VentDriver::new("flap", flap_motor, config.travel_time());
    let controller = VentController::new(door, flap, &config);

    // Sensor line.
    let line = PinDriver::input_output_od(peripherals.pins.gpio23)?;
    let sampler = DhtSampler::new(
        OneWireGpio::new(line, pins::DHT_DATA_GPIO),
        pins::DHT_DATA_GPIO,
    );

    let mut poller = DhtPoller::new(sampler, controller, &config);
    poller.start();

    // The poller thread does all the work from here on.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
