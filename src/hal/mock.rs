//! Mock GPIO surface for testing without hardware.
//!
//! [`MockGpio`] emulates the kernel's GPIO control nodes closely enough to
//! exercise every controller path: it tracks export/direction/level, records
//! every successful write in order, and can be primed to fail.
//!
//! The mock is a cloneable handle over shared state. Move one clone into the
//! controller and keep another in the test to inspect what the hardware saw.
//!
//! # Example
//!
//! ```rust
//! use gpio_rumble::RumbleController;
//! use gpio_rumble::hal::MockGpio;
//!
//! let gpio = MockGpio::new();
//! let controller = RumbleController::new(gpio.clone());
//!
//! controller.activate(0.9, 0);
//! assert_eq!(gpio.level(), Some(true));
//!
//! controller.stop();
//! assert_eq!(gpio.level(), Some(false));
//! assert_eq!(gpio.level_history(), vec![false, true, false]);
//! ```

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::DEFAULT_PIN;
use crate::traits::{ControlNode, ControlSurface};

/// A write accepted by the mock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GpioWrite {
    /// Target node.
    pub node: ControlNode,
    /// Bytes written.
    pub value: Vec<u8>,
}

/// A primed failure for the next write to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fault {
    Error(io::ErrorKind),
    Short,
}

#[derive(Debug, Default)]
struct MockState {
    exported: bool,
    direction_out: bool,
    level: Option<bool>,
    writes: Vec<GpioWrite>,
    faults: Vec<(ControlNode, Fault)>,
    attempts: usize,
}

/// Mock GPIO control surface.
///
/// # Example
///
/// ```rust
/// use std::io::ErrorKind;
/// use gpio_rumble::hal::MockGpio;
/// use gpio_rumble::traits::{ControlNode, ControlSurface};
///
/// let mut gpio = MockGpio::exported();
/// gpio.fail_next(ControlNode::Value, ErrorKind::PermissionDenied);
///
/// assert!(gpio.write(ControlNode::Value, b"1").is_err()); // primed failure
/// assert_eq!(gpio.write(ControlNode::Value, b"1").unwrap(), 1);
/// assert_eq!(gpio.level(), Some(true));
/// ```
#[derive(Clone, Debug)]
pub struct MockGpio {
    pin: u32,
    state: Arc<Mutex<MockState>>,
}

impl Default for MockGpio {
    fn default() -> Self {
        Self {
            pin: DEFAULT_PIN,
            state: Arc::default(),
        }
    }
}

impl MockGpio {
    /// Creates a mock line that is not yet exported.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line number reported to the device
    pub fn with_pin(mut self, pin: u32) -> Self {
        self.pin = pin;
        self
    }

    /// Creates a mock line that is already exported by this process.
    ///
    /// Export writes fail with `ResourceBusy`, as on a real kernel.
    pub fn exported() -> Self {
        let gpio = Self::default();
        gpio.lock().exported = true;
        gpio
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fail the next write to `node` with `kind`.
    ///
    /// Primed failures are consumed in the order they were added.
    pub fn fail_next(&self, node: ControlNode, kind: io::ErrorKind) {
        self.lock().faults.push((node, Fault::Error(kind)));
    }

    /// Make the next write to `node` accept zero bytes.
    pub fn short_write_next(&self, node: ControlNode) {
        self.lock().faults.push((node, Fault::Short));
    }

    /// Whether the line has been exported.
    pub fn is_exported(&self) -> bool {
        self.lock().exported
    }

    /// Whether the line has been configured as an output.
    pub fn is_output(&self) -> bool {
        self.lock().direction_out
    }

    /// Current line level, `None` if never driven.
    pub fn level(&self) -> Option<bool> {
        self.lock().level
    }

    /// All successful writes, oldest first.
    pub fn writes(&self) -> Vec<GpioWrite> {
        self.lock().writes.clone()
    }

    /// Levels successfully written to the value node, oldest first.
    pub fn level_history(&self) -> Vec<bool> {
        self.lock()
            .writes
            .iter()
            .filter(|w| w.node == ControlNode::Value)
            .map(|w| w.value.as_slice() == b"1")
            .collect()
    }

    /// Number of successful writes to `node`.
    pub fn write_count(&self, node: ControlNode) -> usize {
        self.lock().writes.iter().filter(|w| w.node == node).count()
    }

    /// Number of write attempts, including failed ones.
    pub fn attempts(&self) -> usize {
        self.lock().attempts
    }

    /// Forget recorded writes and attempts, keeping the line state.
    pub fn clear_history(&self) {
        let mut state = self.lock();
        state.writes.clear();
        state.attempts = 0;
    }
}

impl ControlSurface for MockGpio {
    fn pin(&self) -> u32 {
        self.pin
    }

    fn write(&mut self, node: ControlNode, bytes: &[u8]) -> io::Result<usize> {
        let mut state = self.lock();
        state.attempts += 1;

        if let Some(index) = state.faults.iter().position(|(n, _)| *n == node) {
            let (_, fault) = state.faults.remove(index);
            return match fault {
                Fault::Error(kind) => Err(io::Error::from(kind)),
                Fault::Short => Ok(0),
            };
        }

        match node {
            ControlNode::Export => {
                if state.exported {
                    return Err(io::Error::from(io::ErrorKind::ResourceBusy));
                }
                state.exported = true;
            }
            ControlNode::Direction => {
                if !state.exported {
                    return Err(io::Error::from(io::ErrorKind::NotFound));
                }
                state.direction_out = bytes == b"out";
            }
            ControlNode::Value => {
                if !state.exported {
                    return Err(io::Error::from(io::ErrorKind::NotFound));
                }
                state.level = match bytes {
                    b"1" => Some(true),
                    b"0" => Some(false),
                    _ => return Err(io::Error::from(io::ErrorKind::InvalidInput)),
                };
            }
        }

        state.writes.push(GpioWrite {
            node,
            value: bytes.to_vec(),
        });
        Ok(bytes.len())
    }
}

// ============================================================================
// Tests
// ============================================================================
