//! Rumble controller: shared activation state and the auto-stop timer.
//!
//! This module provides [`RumbleController`], the component callers use to
//! turn the actuator on for a while and off again. Any number of threads may
//! call it concurrently.
//!
//! # Overview
//!
//! The controller:
//! - Lazily acquires the [`ActuatorDevice`] on first use, retrying on the
//!   next call if setup fails
//! - Serializes every transition through one mutex
//! - Runs at most one auto-stop task at a time, and fully retires an old one
//!   before applying a newer request
//!
//! # Example
//!
//! ```rust
//! use std::thread;
//! use std::time::Duration;
//! use gpio_rumble::{RumbleController, RumbleState, hal::MockGpio};
//!
//! let gpio = MockGpio::new();
//! let controller = RumbleController::new(gpio.clone());
//!
//! controller.activate(0.9, 50);
//! assert_eq!(controller.state(), RumbleState::ActiveTimed);
//!
//! thread::sleep(Duration::from_millis(250));
//! assert_eq!(controller.state(), RumbleState::Idle);
//! assert_eq!(gpio.level(), Some(false));
//! ```
//!
//! # Auto-Stop Tasks
//!
//! A timed activation spawns one thread that sleeps on the controller's
//! condition variable, so it holds no lock while waiting. When it wakes it
//! only acts if it is still the controller's live timer. A newer request
//! clears that flag, wakes the task and waits until the task reports it has
//! exited before touching the output.

use core::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, trace, warn};

use crate::config::RumbleConfig;
use crate::device::ActuatorDevice;
use crate::error::DeviceResult;
use crate::traits::ControlSurface;

/// Observable controller state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RumbleState {
    /// Hardware setup has not succeeded yet.
    #[default]
    Uninitialized,
    /// Output off, no timer.
    Idle,
    /// Output on until explicitly stopped.
    ActiveUntimed,
    /// Output on with one live auto-stop task.
    ActiveTimed,
}

impl RumbleState {
    /// Returns true if the output is commanded on.
    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self, RumbleState::ActiveUntimed | RumbleState::ActiveTimed)
    }
}

/// A scheduled auto-stop task.
struct AutoStop {
    id: u64,
    handle: JoinHandle<()>,
}

struct State<S> {
    device: ActuatorDevice<S>,
    active: bool,
    /// The live timer. A task may only act while this holds its id.
    timer: Option<AutoStop>,
    /// Set while an auto-stop thread has not yet finished.
    timer_running: bool,
    next_timer_id: u64,
    /// Set by teardown; later requests are ignored.
    torn_down: bool,
}

impl<S: ControlSurface> State<S> {
    fn rumble_state(&self) -> RumbleState {
        if !self.device.is_acquired() {
            RumbleState::Uninitialized
        } else if !self.active {
            RumbleState::Idle
        } else if self.timer.is_some() {
            RumbleState::ActiveTimed
        } else {
            RumbleState::ActiveUntimed
        }
    }

    fn owns_timer(&self, id: u64) -> bool {
        self.timer.as_ref().is_some_and(|t| t.id == id)
    }
}

struct Shared<S> {
    config: RumbleConfig,
    state: Mutex<State<S>>,
    timer_cv: Condvar,
}

impl<S: ControlSurface> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, State<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancel the live timer and wait until no auto-stop thread remains.
    ///
    /// The lock is released while waiting, so another caller may run in
    /// between; any timer it schedules is retired too.
    fn retire_timer<'a>(&'a self, mut state: MutexGuard<'a, State<S>>) -> MutexGuard<'a, State<S>> {
        let mut retired = Vec::new();
        loop {
            if let Some(timer) = state.timer.take() {
                trace!("cancelling auto-stop #{}", timer.id);
                retired.push(timer);
                self.timer_cv.notify_all();
            }
            if !state.timer_running {
                break;
            }
            state = self
                .timer_cv
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        // Every retired thread has already released the lock for good
        for timer in retired {
            if timer.handle.join().is_err() {
                warn!("auto-stop #{} panicked", timer.id);
            }
        }
        state
    }
}

/// Thread-safe controller for one binary haptic actuator.
///
/// A cheap [`Clone`] handle: every clone drives the same actuator and state.
///
/// # Type Parameter
///
/// - `S`: The GPIO control surface ([`ControlSurface`] trait)
///
/// # Lifecycle
///
/// Construct once with [`new`](Self::new) or
/// [`with_config`](Self::with_config), hand clones to callers, and call
/// [`teardown`](Self::teardown) at shutdown to force the actuator off.
/// Teardown applies to every clone: requests made afterwards are ignored.
///
/// # Failures
///
/// [`activate`](Self::activate) and [`stop`](Self::stop) never fail: a
/// hardware error is logged and the call has no physical effect. Callers
/// that need an acknowledgement use [`try_activate`](Self::try_activate).
pub struct RumbleController<S: ControlSurface + 'static> {
    shared: Arc<Shared<S>>,
}

impl<S: ControlSurface + 'static> Clone for RumbleController<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: ControlSurface + 'static> RumbleController<S> {
    /// Create a controller with the default configuration
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, RumbleConfig::default())
    }

    /// Create a controller with a custom configuration
    pub fn with_config(surface: S, config: RumbleConfig) -> Self {
        let device = ActuatorDevice::new(surface);
        Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(State {
                    device,
                    active: false,
                    timer: None,
                    timer_running: false,
                    next_timer_id: 0,
                    torn_down: false,
                }),
                timer_cv: Condvar::new(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &RumbleConfig {
        &self.shared.config
    }

    /// Turn the actuator on at `strength` for `duration_ms`.
    ///
    /// - `strength <= threshold` turns it off instead
    /// - `duration_ms <= 0` or `>= max_duration_ms` leaves it on until stopped
    ///
    /// Failures are logged, never returned.
    pub fn activate(&self, strength: f32, duration_ms: i64) {
        if let Err(err) = self.try_activate(strength, duration_ms) {
            if err.is_acquisition() {
                warn!("rumble unavailable, will retry setup: {}", err);
            } else {
                warn!("rumble write failed: {}", err);
            }
        }
    }

    /// Turn the actuator off and cancel any auto-stop.
    pub fn stop(&self) {
        self.activate(0.0, 0);
    }

    /// Like [`activate`](Self::activate), but reports the outcome.
    ///
    /// On an acquisition failure nothing changes and the controller stays
    /// [`RumbleState::Uninitialized`]. On a write failure the logical state
    /// still follows the request and the error is returned.
    ///
    /// After [`teardown`](Self::teardown) the request is ignored and the
    /// current state is returned.
    pub fn try_activate(&self, strength: f32, duration_ms: i64) -> DeviceResult<RumbleState> {
        self.apply(strength, duration_ms, false)
    }

    /// Like [`stop`](Self::stop), but reports the outcome.
    pub fn try_stop(&self) -> DeviceResult<RumbleState> {
        self.try_activate(0.0, 0)
    }

    /// Get the current state
    pub fn state(&self) -> RumbleState {
        self.shared.lock().rumble_state()
    }

    /// Check if the actuator is commanded on
    pub fn is_active(&self) -> bool {
        self.shared.lock().active
    }

    /// Whether [`teardown`](Self::teardown) has run on any handle.
    pub fn is_torn_down(&self) -> bool {
        self.shared.lock().torn_down
    }

    /// Whether rumble is supported. Always true.
    #[inline]
    pub fn query_capability(&self) -> bool {
        true
    }

    /// Force the actuator off once and stop accepting requests.
    ///
    /// Other clones stay valid, but their requests become no-ops.
    pub fn teardown(self) {
        match self.apply(0.0, 0, true) {
            Ok(_) => debug!("rumble controller torn down"),
            Err(err) => warn!("rumble teardown could not drive the line low: {}", err),
        }
    }

    fn apply(&self, strength: f32, duration_ms: i64, closing: bool) -> DeviceResult<RumbleState> {
        let mut state = self.shared.lock();
        if state.torn_down {
            debug!("ignoring rumble {:.3} after teardown", strength);
            return Ok(state.rumble_state());
        }
        // Latched before the timer wait releases the lock
        state.torn_down = closing;
        state.device.acquire()?;

        let mut state = self.shared.retire_timer(state);
        let on = self.shared.config.is_rumble(strength);
        let written = state.device.set_level(on);
        state.active = on;

        if on && self.shared.config.is_timed(duration_ms) {
            self.schedule_auto_stop(&mut state, duration_ms);
        }

        let snapshot = state.rumble_state();
        drop(state);

        debug!(
            "rumble {:.3} for {}ms -> {:?}",
            strength, duration_ms, snapshot
        );
        written.map(|()| snapshot)
    }

    fn schedule_auto_stop(&self, state: &mut State<S>, duration_ms: i64) {
        let id = state.next_timer_id;
        state.next_timer_id = state.next_timer_id.wrapping_add(1);

        let deadline = Instant::now() + Duration::from_millis(duration_ms.unsigned_abs());
        let shared = Arc::clone(&self.shared);

        state.timer_running = true;
        let spawned = thread::Builder::new()
            .name(format!("rumble-stop-{}", id))
            .spawn(move || run_auto_stop(shared, id, deadline));

        match spawned {
            Ok(handle) => {
                state.timer = Some(AutoStop { id, handle });
                trace!("auto-stop #{} in {}ms", id, duration_ms);
            }
            Err(err) => {
                state.timer_running = false;
                error!("cannot spawn auto-stop, rumble stays on until stopped: {}", err);
            }
        }
    }
}

impl<S: ControlSurface + 'static> fmt::Debug for RumbleController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RumbleController")
            .field("config", &self.shared.config)
            .field("state", &self.state())
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}

/// Body of an auto-stop thread.
fn run_auto_stop<S: ControlSurface>(shared: Arc<Shared<S>>, id: u64, deadline: Instant) {
    let mut state = shared.lock();

    while state.owns_timer(id) {
        let now = Instant::now();
        if now >= deadline {
            // Dropping our own handle detaches this thread
            let _own = state.timer.take();
            state.active = false;
            match state.device.set_level(false) {
                Ok(()) => debug!("auto-stop #{} fired", id),
                Err(err) => warn!("auto-stop #{} write failed: {}", id, err),
            }
            break;
        }
        state = shared
            .timer_cv
            .wait_timeout(state, deadline - now)
            .unwrap_or_else(PoisonError::into_inner)
            .0;
    }

    state.timer_running = false;
    shared.timer_cv.notify_all();
}
