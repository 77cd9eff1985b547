//! Hardware abstraction for the GPIO control surface.
//!
//! The operating system exposes a GPIO line as a handful of byte-oriented
//! control nodes. Each write is independent and may fail because of missing
//! permissions, a missing node, or contention with another owner.
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`ControlNode`] | Which control value a write targets |
//! | [`ControlSurface`] | Fallible byte writes to a control node |
//!
//! # Implementation
//!
//! For testing and desktop development, use [`MockGpio`] from
//! [`crate::hal::mock`]. On Linux boards use [`SysfsGpio`]. With the
//! `embedded-hal` feature, any `OutputPin` can be wrapped in `PinSurface`.
//!
//! # Example
//!
//! ```rust
//! use gpio_rumble::traits::{ControlNode, ControlSurface};
//! use gpio_rumble::hal::MockGpio;
//!
//! let mut gpio = MockGpio::new();
//! gpio.write(ControlNode::Export, b"227").unwrap();
//! gpio.write(ControlNode::Direction, b"out").unwrap();
//! gpio.write(ControlNode::Value, b"1").unwrap();
//!
//! assert_eq!(gpio.level(), Some(true));
//! ```
//!
//! [`MockGpio`]: crate::hal::MockGpio
//! [`SysfsGpio`]: crate::hal::SysfsGpio

use std::io;

/// A control value of a GPIO line.
///
/// On Linux sysfs these map to `export`, `gpioN/direction` and
/// `gpioN/value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlNode {
    /// Request exclusive control of the line (write the pin number).
    ///
    /// A surface reports "already exported" as
    /// [`io::ErrorKind::ResourceBusy`].
    Export,
    /// Configure the line direction (write `"out"`).
    Direction,
    /// Drive the line level (write `"1"` or `"0"`).
    Value,
}

impl ControlNode {
    /// Returns the node's sysfs file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gpio_rumble::traits::ControlNode;
    ///
    /// assert_eq!(ControlNode::Export.as_str(), "export");
    /// assert_eq!(ControlNode::Direction.as_str(), "direction");
    /// assert_eq!(ControlNode::Value.as_str(), "value");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ControlNode::Export => "export",
            ControlNode::Direction => "direction",
            ControlNode::Value => "value",
        }
    }
}

/// Byte-oriented GPIO control surface.
///
/// Implement this trait for your platform's GPIO mechanism. Each call is a
/// single write that returns how many bytes were accepted.
///
/// # Implementation Notes
///
/// - Do not retry internally; callers decide how to treat a failure
/// - Return the real byte count so short writes can be detected
/// - Report "already exported" as `io::ErrorKind::ResourceBusy`
/// - [`pin`](Self::pin) names the line the surface addresses; it is the
///   payload of the export write
/// - The surface is moved into the controller and touched from its
///   auto-stop threads, hence `Send`
///
/// # Example Implementation
///
/// ```rust,ignore
/// use gpio_rumble::traits::{ControlNode, ControlSurface};
///
/// struct RegisterGpio { line: u32 /* memory-mapped registers */ }
///
/// impl ControlSurface for RegisterGpio {
///     fn pin(&self) -> u32 {
///         self.line
///     }
///
///     fn write(&mut self, node: ControlNode, bytes: &[u8]) -> std::io::Result<usize> {
///         match node {
///             ControlNode::Value => { /* set or clear the output bit */ }
///             _ => { /* already configured by the boot loader */ }
///         }
///         Ok(bytes.len())
///     }
/// }
/// ```
pub trait ControlSurface: Send {
    /// GPIO line number this surface drives.
    fn pin(&self) -> u32;

    /// Write `bytes` to `node`, returning the number of bytes written.
    fn write(&mut self, node: ControlNode, bytes: &[u8]) -> io::Result<usize>;
}

impl<T: ControlSurface + ?Sized> ControlSurface for Box<T> {
    fn pin(&self) -> u32 {
        (**self).pin()
    }

    fn write(&mut self, node: ControlNode, bytes: &[u8]) -> io::Result<usize> {
        (**self).write(node, bytes)
    }
}
