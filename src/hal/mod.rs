//! GPIO control surfaces: mock, Linux sysfs and `embedded-hal` pins.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Recording test double for desktop development
//! - `sysfs`: Linux `/sys/class/gpio` line
//! - `embedded`: any embedded-hal output pin (requires `embedded-hal` feature)

pub mod mock;
pub mod sysfs;

#[cfg(feature = "embedded-hal")]
pub mod embedded;

pub use mock::*;
pub use sysfs::*;

#[cfg(feature = "embedded-hal")]
pub use embedded::*;
