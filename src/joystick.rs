//! Game-controller style rumble facade.
//!
//! Games talk to rumble through a joystick/haptic API with two 16-bit motor
//! magnitudes and a duration. [`JoystickRumble`] maps those calls onto the
//! single binary actuator: the magnitudes are averaged and normalized, and
//! every query reports a present, rumble-capable device.
//!
//! # Example
//!
//! ```rust
//! use gpio_rumble::{JoystickRumble, RumbleController, RumbleState, hal::MockGpio};
//!
//! let controller = RumbleController::new(MockGpio::new());
//! let joystick = JoystickRumble::new(controller.clone());
//!
//! joystick.rumble(0xFFFF, 0x8000, 0);
//! assert_eq!(controller.state(), RumbleState::ActiveUntimed);
//!
//! joystick.rumble_stop();
//! assert_eq!(controller.state(), RumbleState::Idle);
//! ```

use crate::controller::RumbleController;
use crate::traits::ControlSurface;

/// Haptic capability bit for independent left/right motors.
pub const HAPTIC_LEFTRIGHT: u32 = 0x8000;

/// Device name reported to games.
pub const HAPTIC_NAME: &str = "GPIO Rumble";

/// Strength used by [`JoystickRumble::haptic_run_effect`].
pub const EFFECT_STRENGTH: f32 = 0.8;

/// Duration used by [`JoystickRumble::haptic_run_effect`].
pub const EFFECT_DURATION_MS: i64 = 100;

/// Normalize two motor magnitudes to a strength in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use gpio_rumble::joystick::motor_strength;
///
/// assert_eq!(motor_strength(0, 0), 0.0);
/// assert_eq!(motor_strength(0xFFFF, 0xFFFF), 1.0);
/// assert!((motor_strength(0xFFFF, 0) - 0.5).abs() < 1e-6);
/// ```
pub fn motor_strength(low: u16, high: u16) -> f32 {
    ((f32::from(low) + f32::from(high)) / 2.0) / f32::from(u16::MAX)
}

/// Joystick/haptic API over a [`RumbleController`].
#[derive(Debug)]
pub struct JoystickRumble<S: ControlSurface + 'static> {
    controller: RumbleController<S>,
}

impl<S: ControlSurface + 'static> Clone for JoystickRumble<S> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

impl<S: ControlSurface + 'static> JoystickRumble<S> {
    /// Wrap a controller handle.
    pub fn new(controller: RumbleController<S>) -> Self {
        Self { controller }
    }

    /// Returns the wrapped controller.
    pub fn controller(&self) -> &RumbleController<S> {
        &self.controller
    }

    /// Rumble the low/high frequency motors for `duration_ms`.
    pub fn rumble(&self, low: u16, high: u16, duration_ms: u32) {
        self.controller
            .activate(motor_strength(low, high), i64::from(duration_ms));
    }

    /// Rumble the trigger motors for `duration_ms`.
    pub fn rumble_triggers(&self, left: u16, right: u16, duration_ms: u32) {
        self.controller
            .activate(motor_strength(left, right), i64::from(duration_ms));
    }

    /// Stop any rumble.
    pub fn rumble_stop(&self) {
        self.controller.stop();
    }

    /// Whether the joystick can rumble.
    pub fn has_rumble(&self) -> bool {
        self.controller.query_capability()
    }

    /// Whether the joystick has trigger rumble.
    pub fn has_rumble_triggers(&self) -> bool {
        self.controller.query_capability()
    }

    /// Whether the joystick is a haptic device.
    pub fn is_haptic(&self) -> bool {
        self.controller.query_capability()
    }

    /// Number of haptic devices.
    pub fn num_haptics(&self) -> usize {
        1
    }

    /// Haptic device name.
    pub fn haptic_name(&self) -> &'static str {
        HAPTIC_NAME
    }

    /// Supported haptic capability bits.
    pub fn haptic_query(&self) -> u32 {
        HAPTIC_LEFTRIGHT
    }

    /// Number of haptic axes.
    pub fn haptic_num_axes(&self) -> usize {
        2
    }

    /// Play the fixed effect.
    ///
    /// Effect parameters are not modeled; every effect is a short pulse.
    pub fn haptic_run_effect(&self) {
        self.controller
            .activate(EFFECT_STRENGTH, EFFECT_DURATION_MS);
    }

    /// Stop a running effect.
    pub fn haptic_stop_effect(&self) {
        self.controller.stop();
    }

    /// Close the haptic device, stopping any rumble.
    pub fn haptic_close(&self) {
        self.controller.stop();
    }

    /// Answer a boolean device property query.
    ///
    /// Anything mentioning rumble is supported; other properties keep their
    /// default.
    pub fn boolean_property(&self, name: &str, default: bool) -> bool {
        if name.contains("rumble") {
            return true;
        }
        default
    }
}
