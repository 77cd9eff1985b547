//! Error types for actuator hardware access.
//!
//! Every variant is recoverable: the controller absorbs them and degrades to
//! "the actuator did not change state". They only reach a caller through the
//! acknowledged API ([`RumbleController::try_activate`]).
//!
//! [`RumbleController::try_activate`]: crate::RumbleController::try_activate

use core::fmt;
use std::io;

use thiserror::Error;

/// Result type for actuator device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// One step of the hardware acquisition sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupStep {
    /// Requesting exclusive control of the output line.
    Export,
    /// Configuring the line as an output.
    Direction,
    /// Driving the line to its initial (off) level.
    InitialLevel,
}

impl SetupStep {
    /// Returns the step as a short lowercase label.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SetupStep::Export => "export",
            SetupStep::Direction => "direction",
            SetupStep::InitialLevel => "initial level",
        }
    }
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by [`ActuatorDevice`](crate::ActuatorDevice).
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The setup sequence failed for a reason other than "already owned".
    ///
    /// Retried lazily on the next activation.
    #[error("GPIO {pin} acquisition failed at {step}: {source}")]
    AcquisitionFailed {
        /// Pin being acquired.
        pin: u32,
        /// Step that failed.
        step: SetupStep,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A level write did not complete (I/O failure or short write).
    #[error("GPIO {pin} write failed (on={on}): {source}")]
    WriteFailed {
        /// Pin being driven.
        pin: u32,
        /// Level that was requested.
        on: bool,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl DeviceError {
    /// Returns true for acquisition failures.
    pub fn is_acquisition(&self) -> bool {
        matches!(self, DeviceError::AcquisitionFailed { .. })
    }

    /// Returns the kind of the underlying I/O error.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            DeviceError::AcquisitionFailed { source, .. } => source.kind(),
            DeviceError::WriteFailed { source, .. } => source.kind(),
        }
    }
}
