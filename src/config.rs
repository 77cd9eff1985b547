//! Build-time configuration for the rumble controller.
//!
//! The thresholds are part of the firmware contract, so there is no file or
//! environment loading. The builder exists for tests. Which line is driven
//! is a property of the control surface, see [`DEFAULT_PIN`].
//!
//! # Example
//!
//! ```rust
//! use gpio_rumble::config::RumbleConfig;
//!
//! // Use defaults
//! let config = RumbleConfig::default();
//! assert!(!config.is_rumble(0.1));
//!
//! // Or customize
//! let config = RumbleConfig::default().with_max_duration_ms(5_000);
//! assert!(!config.is_timed(5_000));
//! ```

/// GPIO line the vibration motor is wired to.
///
/// Used by `SysfsGpio::default()` and `MockGpio::new()`.
pub const DEFAULT_PIN: u32 = 227;

/// Kernel sysfs GPIO class directory.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// Strengths at or below this value are treated as "no rumble".
pub const STRENGTH_THRESHOLD: f32 = 0.1;

/// Durations at or above this value never schedule an auto-stop.
pub const MAX_DURATION_MS: i64 = 10_000;

/// Controller configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RumbleConfig {
    /// Exclusive strength threshold for turning the actuator on.
    pub strength_threshold: f32,
    /// Exclusive duration ceiling for scheduling an auto-stop (ms).
    pub max_duration_ms: i64,
}

impl Default for RumbleConfig {
    fn default() -> Self {
        Self {
            strength_threshold: STRENGTH_THRESHOLD,
            max_duration_ms: MAX_DURATION_MS,
        }
    }
}

impl RumbleConfig {
    /// Set the strength threshold
    pub fn with_strength_threshold(mut self, threshold: f32) -> Self {
        self.strength_threshold = threshold;
        self
    }

    /// Set the auto-stop duration ceiling
    pub fn with_max_duration_ms(mut self, ms: i64) -> Self {
        self.max_duration_ms = ms;
        self
    }

    /// Returns true if `strength` should turn the actuator on.
    ///
    /// `NaN` never does.
    #[inline]
    pub fn is_rumble(&self, strength: f32) -> bool {
        strength > self.strength_threshold
    }

    /// Returns true if `duration_ms` should schedule an auto-stop.
    #[inline]
    pub fn is_timed(&self, duration_ms: i64) -> bool {
        duration_ms > 0 && duration_ms < self.max_duration_ms
    }
}
