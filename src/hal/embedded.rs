//! Control surface over an embedded-hal output pin.
//!
//! On microcontrollers the pin is claimed and configured by the HAL when the
//! driver is constructed (e.g. esp-idf's `PinDriver::output`), so the export
//! and direction nodes are accepted without touching hardware. Value writes
//! become `set_high`/`set_low`.

use std::io;

use embedded_hal::digital::{Error as _, OutputPin};

use crate::traits::{ControlNode, ControlSurface};

/// Adapter from an [`OutputPin`] to a [`ControlSurface`].
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::gpio::PinDriver;
/// use gpio_rumble::{RumbleController, hal::PinSurface};
///
/// let pin = PinDriver::output(peripherals.pins.gpio5)?;
/// let controller = RumbleController::new(PinSurface::new(pin, 5));
/// ```
#[derive(Debug)]
pub struct PinSurface<P> {
    pin: P,
    line: u32,
}

impl<P: OutputPin> PinSurface<P> {
    /// Wraps a configured output pin; `line` is its GPIO number.
    pub fn new(pin: P, line: u32) -> Self {
        Self { pin, line }
    }

    /// Releases the wrapped pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin + Send> ControlSurface for PinSurface<P> {
    fn pin(&self) -> u32 {
        self.line
    }

    fn write(&mut self, node: ControlNode, bytes: &[u8]) -> io::Result<usize> {
        if node != ControlNode::Value {
            return Ok(bytes.len());
        }

        let result = match bytes {
            b"1" => self.pin.set_high(),
            b"0" => self.pin.set_low(),
            _ => return Err(io::Error::from(io::ErrorKind::InvalidInput)),
        };
        result.map_err(|e| io::Error::other(format!("pin error: {:?}", e.kind())))?;
        Ok(bytes.len())
    }
}
