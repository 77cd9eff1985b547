//! The actuator device: one-time line acquisition and level writes.
//!
//! [`ActuatorDevice`] turns a logical on/off level into writes on a
//! [`ControlSurface`]. Setup is separate from steady-state writes because it
//! runs once and fails for different reasons (permissions, missing node,
//! another owner) than a level write does.
//!
//! # Example
//!
//! ```rust
//! use gpio_rumble::ActuatorDevice;
//! use gpio_rumble::hal::MockGpio;
//!
//! let gpio = MockGpio::new();
//! let mut device = ActuatorDevice::new(gpio.clone());
//! assert_eq!(device.pin(), 227);
//!
//! device.acquire().unwrap();
//! assert!(device.is_acquired());
//! assert_eq!(gpio.level(), Some(false)); // defined initial level
//!
//! device.set_level(true).unwrap();
//! assert_eq!(gpio.level(), Some(true));
//! ```

use core::fmt::Write as _;
use std::io;

use heapless::String as HString;
use log::{debug, info};

use crate::error::{DeviceError, DeviceResult, SetupStep};
use crate::traits::{ControlNode, ControlSurface};

/// Decimal digits of a `u32`.
type PinDigits = HString<10>;

/// Outcome of requesting exclusive control of the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Claim {
    /// The line was exported by this call.
    Exported,
    /// The line was already exported; ownership is assumed.
    AlreadyOwned,
}

/// GPIO-backed binary actuator.
///
/// Stateless after acquisition. Writes are not synchronized; the
/// [`RumbleController`](crate::RumbleController) serializes access.
#[derive(Debug)]
pub struct ActuatorDevice<S> {
    surface: S,
    pin: u32,
    acquired: bool,
}

impl<S: ControlSurface> ActuatorDevice<S> {
    /// Creates an unacquired device for the line `surface` drives.
    pub fn new(surface: S) -> Self {
        Self {
            pin: surface.pin(),
            surface,
            acquired: false,
        }
    }

    /// Whether setup has succeeded.
    #[inline]
    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    /// Returns the GPIO line number.
    #[inline]
    pub fn pin(&self) -> u32 {
        self.pin
    }

    /// Borrows the underlying surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Request exclusive control of the line.
    ///
    /// "Already exported" counts as success.
    pub fn claim(&mut self) -> DeviceResult<Claim> {
        let mut digits = PinDigits::new();
        write!(digits, "{}", self.pin).map_err(|_| {
            let source = io::Error::new(io::ErrorKind::InvalidInput, "pin number too long");
            self.setup_error(SetupStep::Export, source)
        })?;

        match write_all(&mut self.surface, ControlNode::Export, digits.as_bytes()) {
            Ok(()) => Ok(Claim::Exported),
            Err(e) if e.kind() == io::ErrorKind::ResourceBusy => Ok(Claim::AlreadyOwned),
            Err(source) => Err(self.setup_error(SetupStep::Export, source)),
        }
    }

    /// Perform one-time setup: claim, configure as output, drive low.
    ///
    /// Idempotent; a no-op once it has succeeded. Any failure leaves the
    /// device unacquired so the next call retries the whole sequence.
    pub fn acquire(&mut self) -> DeviceResult<()> {
        if self.acquired {
            return Ok(());
        }

        let claim = self.claim()?;
        write_all(&mut self.surface, ControlNode::Direction, b"out")
            .map_err(|source| self.setup_error(SetupStep::Direction, source))?;
        write_all(&mut self.surface, ControlNode::Value, b"0")
            .map_err(|source| self.setup_error(SetupStep::InitialLevel, source))?;

        self.acquired = true;
        info!("GPIO {} acquired ({:?})", self.pin, claim);
        Ok(())
    }

    /// Drive the line on or off.
    ///
    /// Fails on I/O errors and short writes.
    pub fn set_level(&mut self, on: bool) -> DeviceResult<()> {
        let value: &[u8] = if on { b"1" } else { b"0" };
        write_all(&mut self.surface, ControlNode::Value, value).map_err(|source| {
            DeviceError::WriteFailed {
                pin: self.pin,
                on,
                source,
            }
        })?;
        debug!("GPIO {} -> {}", self.pin, on as u8);
        Ok(())
    }

    fn setup_error(&self, step: SetupStep, source: io::Error) -> DeviceError {
        DeviceError::AcquisitionFailed {
            pin: self.pin,
            step,
            source,
        }
    }
}

/// Single write that must be accepted in full.
fn write_all<S: ControlSurface>(surface: &mut S, node: ControlNode, bytes: &[u8]) -> io::Result<()> {
    let written = surface.write(node, bytes)?;
    if written < bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!(
                "short write to {}: {} of {} bytes",
                node.as_str(),
                written,
                bytes.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{GpioWrite, MockGpio};

    fn device() -> (MockGpio, ActuatorDevice<MockGpio>) {
        let gpio = MockGpio::new();
        (gpio.clone(), ActuatorDevice::new(gpio))
    }

    // =========================================================================
    // Acquisition Tests
    // =========================================================================

    #[test]
    fn acquire_runs_setup_in_order() {
        let (gpio, mut device) = device();
        device.acquire().unwrap();

        assert_eq!(
            gpio.writes(),
            vec![
                GpioWrite {
                    node: ControlNode::Export,
                    value: b"227".to_vec()
                },
                GpioWrite {
                    node: ControlNode::Direction,
                    value: b"out".to_vec()
                },
                GpioWrite {
                    node: ControlNode::Value,
                    value: b"0".to_vec()
                },
            ]
        );
        assert!(device.is_acquired());
    }

    #[test]
    fn pin_comes_from_surface() {
        let gpio = MockGpio::new().with_pin(17);
        let mut device = ActuatorDevice::new(gpio.clone());
        assert_eq!(device.pin(), 17);

        device.acquire().unwrap();
        assert_eq!(gpio.writes()[0].value, b"17".to_vec());
    }

    #[test]
    fn acquire_is_idempotent() {
        let (gpio, mut device) = device();
        device.acquire().unwrap();
        device.acquire().unwrap();
        assert_eq!(gpio.attempts(), 3);
    }

    #[test]
    fn already_owned_counts_as_success() {
        let gpio = MockGpio::exported();
        let mut device = ActuatorDevice::new(gpio.clone());

        assert_eq!(device.claim().unwrap(), Claim::AlreadyOwned);
        device.acquire().unwrap();
        assert!(device.is_acquired());
        assert!(gpio.is_output());
    }

    #[test]
    fn export_failure_aborts() {
        let (gpio, mut device) = device();
        gpio.fail_next(ControlNode::Export, io::ErrorKind::PermissionDenied);

        let err = device.acquire().unwrap_err();
        assert!(matches!(
            err,
            DeviceError::AcquisitionFailed {
                step: SetupStep::Export,
                ..
            }
        ));
        assert!(!device.is_acquired());
        assert_eq!(gpio.attempts(), 1);
    }

    #[test]
    fn direction_failure_aborts_and_retries() {
        let (gpio, mut device) = device();
        gpio.fail_next(ControlNode::Direction, io::ErrorKind::PermissionDenied);

        let err = device.acquire().unwrap_err();
        assert!(matches!(
            err,
            DeviceError::AcquisitionFailed {
                step: SetupStep::Direction,
                ..
            }
        ));
        assert!(!device.is_acquired());
        assert_eq!(gpio.level(), None);

        // Line stays exported, so the retry sees "already owned"
        device.acquire().unwrap();
        assert!(device.is_acquired());
        assert_eq!(gpio.level(), Some(false));
    }

    #[test]
    fn short_initial_level_write_aborts() {
        let (gpio, mut device) = device();
        gpio.short_write_next(ControlNode::Value);

        let err = device.acquire().unwrap_err();
        assert!(matches!(
            err,
            DeviceError::AcquisitionFailed {
                step: SetupStep::InitialLevel,
                ..
            }
        ));
        assert_eq!(err.io_kind(), io::ErrorKind::WriteZero);
        assert!(!device.is_acquired());
    }

    // =========================================================================
    // Level Tests
    // =========================================================================

    #[test]
    fn set_level_writes_digits() {
        let (gpio, mut device) = device();
        device.acquire().unwrap();
        gpio.clear_history();

        device.set_level(true).unwrap();
        device.set_level(false).unwrap();

        assert_eq!(gpio.level_history(), vec![true, false]);
    }

    #[test]
    fn set_level_io_failure() {
        let (gpio, mut device) = device();
        device.acquire().unwrap();
        gpio.fail_next(ControlNode::Value, io::ErrorKind::Other);

        let err = device.set_level(true).unwrap_err();
        assert!(matches!(err, DeviceError::WriteFailed { on: true, .. }));
        assert_eq!(gpio.level(), Some(false));
    }

    #[test]
    fn set_level_short_write() {
        let (gpio, mut device) = device();
        device.acquire().unwrap();
        gpio.short_write_next(ControlNode::Value);

        let err = device.set_level(true).unwrap_err();
        assert_eq!(err.io_kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn large_pin_number_fits() {
        let gpio = MockGpio::new().with_pin(u32::MAX);
        let mut device = ActuatorDevice::new(gpio.clone());
        device.claim().unwrap();
        assert_eq!(gpio.writes()[0].value, b"4294967295".to_vec());
    }
}
