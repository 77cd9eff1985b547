//! Hardware smoke test for a vibration motor on a sysfs GPIO line.
//!
//! Pulses the motor three times, then holds it on until an explicit stop,
//! exercising the auto-stop timer and the untimed path on real hardware.
//!
//! # Usage
//!
//! ```sh
//! # Needs write access to /sys/class/gpio
//! sudo cargo run --example pulse
//! ```
//!
//! # Configuration
//!
//! Edit the `SysfsGpio::default()` call in `main()` if the motor is wired
//! to a different line.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use gpio_rumble::hal::SysfsGpio;
use gpio_rumble::{ControlSurface, JoystickRumble, RumbleController};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Console logger for the demo.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn main() -> anyhow::Result<()> {
    log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("logger init failed: {}", e))?;
    log::set_max_level(LevelFilter::Debug);

    println!("=================================");
    println!("  gpio-rumble pulse test");
    println!("=================================");
    println!();

    let gpio = SysfsGpio::default();
    println!("GPIO {} under {}", gpio.pin(), gpio.root().display());

    let controller = RumbleController::new(gpio);

    // Fail loudly here instead of silently doing nothing
    controller
        .try_stop()
        .context("could not acquire the rumble GPIO line")?;

    for i in 1..=3 {
        println!("pulse {}", i);
        controller.activate(1.0, 150);
        thread::sleep(Duration::from_millis(400));
    }

    let joystick = JoystickRumble::new(controller.clone());
    println!("joystick rumble, held until stop");
    joystick.rumble(u16::MAX, u16::MAX, 0);
    println!("state: {:?}", controller.state());
    thread::sleep(Duration::from_millis(500));
    joystick.rumble_stop();

    controller.teardown();
    println!("done");
    Ok(())
}
