//! # gpio-rumble
//!
//! Drives a single vibration motor wired to a GPIO line with a strength and
//! a bounded duration. Start/stop requests are safe to issue concurrently and
//! repeatedly from unrelated threads.
//!
//! ## Features
//!
//! - **Lazy hardware setup**: the line is exported and configured on first
//!   use, and a failed setup is retried on the next request
//! - **Cancelable auto-stop**: a timed activation turns itself off, and a
//!   newer request always retires the old timer before acting
//! - **Never fails the caller**: hardware errors are logged and absorbed,
//!   with an acknowledged API for callers that want them
//! - **Joystick facade**: motor magnitudes and haptic queries mapped onto
//!   the single actuator
//!
//! ## Architecture
//!
//! Every hardware touch goes through one trait, so the whole controller runs on a desktop:
//!
//! - `traits` - GPIO control surface abstraction
//! - `device` - One-time acquisition and level writes
//! - `controller` - Shared state, locking and the auto-stop timer
//! - `joystick` - Game-controller style facade
//! - `hal` - Concrete surfaces (mock for testing, sysfs, embedded-hal)
//!
//! ## Example
//!
//! ```rust
//! use gpio_rumble::{RumbleController, RumbleState, hal::MockGpio};
//!
//! // Create controller with a mock GPIO line
//! let gpio = MockGpio::new();
//! let controller = RumbleController::new(gpio.clone());
//!
//! // Rumble at 80% for a quarter second
//! controller.activate(0.8, 250);
//! assert_eq!(controller.state(), RumbleState::ActiveTimed);
//! assert_eq!(gpio.level(), Some(true));
//!
//! // Or stop early
//! controller.stop();
//! assert_eq!(controller.state(), RumbleState::Idle);
//!
//! // Force the actuator off at shutdown
//! controller.teardown();
//! ```

#![warn(missing_docs)]

/// Build-time configuration constants.
pub mod config;
/// Rumble controller with auto-stop timing.
pub mod controller;
/// GPIO-backed actuator device.
pub mod device;
/// Error types for hardware access.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Game-controller style rumble facade.
pub mod joystick;
/// Core traits for hardware abstraction.
pub mod traits;

// Re-exports for convenience
pub use config::RumbleConfig;
pub use controller::{RumbleController, RumbleState};
pub use device::{ActuatorDevice, Claim};
pub use error::{DeviceError, DeviceResult, SetupStep};
pub use joystick::JoystickRumble;
pub use traits::{ControlNode, ControlSurface};
