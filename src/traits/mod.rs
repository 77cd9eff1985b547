//! Trait definitions for hardware abstraction.
//!
//! This module defines the boundary between the rumble controller and the
//! platform's GPIO mechanism, so the controller can run against:
//! - Linux sysfs GPIO
//! - any embedded-hal output pin
//! - a recording mock on the desktop
//!
//! # Submodules
//!
//! - `hardware`: the [`ControlSurface`] trait and its [`ControlNode`] targets

pub mod hardware;

pub use hardware::*;
