//! Linux sysfs GPIO control surface.
//!
//! Drives a line through the legacy `/sys/class/gpio` interface:
//!
//! | Node | Path |
//! |------|------|
//! | export | `<root>/export` |
//! | direction | `<root>/gpio<N>/direction` |
//! | value | `<root>/gpio<N>/value` |
//!
//! Each write opens the node write-only, writes once and closes it. Nodes are
//! never created; a missing node is a `NotFound` error. The kernel answers a
//! second export of the same line with `EBUSY`, which std surfaces as
//! `io::ErrorKind::ResourceBusy`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_PIN, SYSFS_GPIO_ROOT};
use crate::traits::{ControlNode, ControlSurface};

/// Sysfs-backed GPIO line.
///
/// # Example
///
/// ```ignore
/// use gpio_rumble::{RumbleController, hal::SysfsGpio};
///
/// let controller = RumbleController::new(SysfsGpio::new(227));
/// controller.activate(1.0, 250);
/// ```
#[derive(Clone, Debug)]
pub struct SysfsGpio {
    root: PathBuf,
    pin: u32,
}

impl SysfsGpio {
    /// Creates a surface for `pin` under `/sys/class/gpio`.
    pub fn new(pin: u32) -> Self {
        Self::with_root(pin, SYSFS_GPIO_ROOT)
    }

    /// Creates a surface for `pin` under a custom sysfs root.
    pub fn with_root(pin: u32, root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            pin,
        }
    }

    /// Returns the sysfs root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the filesystem path of `node`.
    pub fn node_path(&self, node: ControlNode) -> PathBuf {
        match node {
            ControlNode::Export => self.root.join(node.as_str()),
            ControlNode::Direction | ControlNode::Value => self
                .root
                .join(format!("gpio{}", self.pin))
                .join(node.as_str()),
        }
    }
}

impl Default for SysfsGpio {
    /// The motor's line under `/sys/class/gpio`.
    fn default() -> Self {
        Self::new(DEFAULT_PIN)
    }
}

impl ControlSurface for SysfsGpio {
    fn pin(&self) -> u32 {
        self.pin
    }

    fn write(&mut self, node: ControlNode, bytes: &[u8]) -> io::Result<usize> {
        let mut file = OpenOptions::new().write(true).open(self.node_path(node))?;
        file.write(bytes)
    }
}
