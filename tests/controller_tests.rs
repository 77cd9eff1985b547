//! Integration tests for the rumble controller

use std::io::ErrorKind;
use std::thread;
use std::time::{Duration, Instant};

use gpio_rumble::{
    hal::MockGpio, ControlNode, JoystickRumble, RumbleConfig, RumbleController, RumbleState,
};

fn controller() -> (MockGpio, RumbleController<MockGpio>) {
    let gpio = MockGpio::new();
    (gpio.clone(), RumbleController::new(gpio))
}

/// Poll until `f` holds or `timeout` elapses.
fn wait_for(timeout: Duration, mut f: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if f() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    f()
}

#[test]
fn first_activation_acquires_line() {
    let (gpio, controller) = controller();

    controller.activate(0.9, 0);

    assert!(gpio.is_exported());
    assert!(gpio.is_output());
    // Initial low from setup, then the requested high
    assert_eq!(gpio.level_history(), vec![false, true]);
    assert_eq!(controller.state(), RumbleState::ActiveUntimed);
}

#[test]
fn timed_activation_stops_itself() {
    let (gpio, controller) = controller();

    controller.activate(0.9, 100);
    assert_eq!(controller.state(), RumbleState::ActiveTimed);
    assert_eq!(gpio.level(), Some(true));

    thread::sleep(Duration::from_millis(400));

    assert_eq!(controller.state(), RumbleState::Idle);
    assert_eq!(gpio.level(), Some(false));
    assert!(!controller.is_active());
    assert_eq!(gpio.level_history(), vec![false, true, false]);
}

#[test]
fn auto_stop_does_not_fire_early() {
    let (gpio, controller) = controller();

    controller.activate(0.9, 300);
    thread::sleep(Duration::from_millis(100));

    assert_eq!(controller.state(), RumbleState::ActiveTimed);
    assert_eq!(gpio.level(), Some(true));

    controller.stop();
}

#[test]
fn stop_is_idempotent() {
    let (gpio, controller) = controller();
    controller.activate(0.9, 5_000);

    controller.stop();
    let once = (controller.state(), gpio.level());
    controller.stop();
    let twice = (controller.state(), gpio.level());

    assert_eq!(once, (RumbleState::Idle, Some(false)));
    assert_eq!(once, twice);
}

#[test]
fn stop_before_any_activation_acquires_and_idles() {
    let (gpio, controller) = controller();
    controller.stop();
    assert_eq!(controller.state(), RumbleState::Idle);
    assert_eq!(gpio.level(), Some(false));
}

#[test]
fn newer_request_supersedes_timer() {
    let (gpio, controller) = controller();

    controller.activate(0.8, 5_000);
    let started = Instant::now();
    controller.activate(0.8, 50);

    // The 50ms timer fires; the 5s one was retired
    assert!(wait_for(Duration::from_millis(1_000), || {
        controller.state() == RumbleState::Idle
    }));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(50), "stopped early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(300), "stopped late: {:?}", elapsed);
    assert_eq!(gpio.level_history(), vec![false, true, true, false]);
}

#[test]
fn superseded_timer_never_turns_off_newer_activation() {
    let (gpio, controller) = controller();

    controller.activate(0.8, 150);
    controller.activate(0.8, 0);

    thread::sleep(Duration::from_millis(400));

    assert_eq!(controller.state(), RumbleState::ActiveUntimed);
    assert_eq!(gpio.level(), Some(true));
    assert_eq!(gpio.level_history(), vec![false, true, true]);
}

#[test]
fn stop_cancels_timer_without_extra_writes() {
    let (gpio, controller) = controller();

    controller.activate(0.8, 150);
    controller.stop();
    thread::sleep(Duration::from_millis(400));

    // Exactly one off from stop(), none from the canceled timer
    assert_eq!(gpio.level_history(), vec![false, true, false]);
}

#[test]
fn recovers_from_setup_failure() {
    let (gpio, controller) = controller();
    gpio.fail_next(ControlNode::Export, ErrorKind::PermissionDenied);

    controller.activate(0.9, 0);
    assert_eq!(controller.state(), RumbleState::Uninitialized);
    assert_eq!(gpio.level(), None);

    controller.activate(0.9, 0);
    assert_eq!(controller.state(), RumbleState::ActiveUntimed);
    assert_eq!(gpio.level(), Some(true));
}

#[test]
fn recovers_from_partial_setup_failure() {
    let (gpio, controller) = controller();
    gpio.fail_next(ControlNode::Direction, ErrorKind::PermissionDenied);

    let err = controller.try_activate(0.9, 50).unwrap_err();
    assert!(err.is_acquisition());
    assert_eq!(controller.state(), RumbleState::Uninitialized);

    // Export already happened, the retry treats the busy line as ours
    assert_eq!(
        controller.try_activate(0.9, 50).unwrap(),
        RumbleState::ActiveTimed
    );
    assert!(wait_for(Duration::from_millis(1_000), || {
        controller.state() == RumbleState::Idle
    }));
}

#[test]
fn already_exported_line_is_usable() {
    let gpio = MockGpio::exported();
    let controller = RumbleController::new(gpio.clone());

    controller.activate(0.9, 0);
    assert_eq!(controller.state(), RumbleState::ActiveUntimed);
    assert_eq!(gpio.write_count(ControlNode::Export), 0);
}

#[test]
fn failed_write_is_acknowledged() {
    let (gpio, controller) = controller();
    controller.stop();
    gpio.fail_next(ControlNode::Value, ErrorKind::Other);

    let err = controller.try_activate(0.9, 0).unwrap_err();
    assert!(!err.is_acquisition());
    assert_eq!(err.io_kind(), ErrorKind::Other);

    // Logical state follows the request
    assert!(controller.is_active());
}

#[test]
fn auto_stop_write_failure_still_idles() {
    let (gpio, controller) = controller();
    controller.activate(0.9, 50);
    gpio.fail_next(ControlNode::Value, ErrorKind::Other);

    assert!(wait_for(Duration::from_millis(1_000), || {
        controller.state() == RumbleState::Idle
    }));
    assert_eq!(gpio.level(), Some(true));

    // A later stop drives the line low
    controller.stop();
    assert_eq!(gpio.level(), Some(false));
}

#[test]
fn teardown_forces_off() {
    let (gpio, controller) = controller();
    let observer = controller.clone();

    controller.activate(1.0, 5_000);
    controller.teardown();

    assert_eq!(observer.state(), RumbleState::Idle);
    assert_eq!(gpio.level(), Some(false));
}

#[test]
fn clones_cannot_restart_after_teardown() {
    let (gpio, controller) = controller();
    let joystick = JoystickRumble::new(controller.clone());

    controller.activate(1.0, 0);
    controller.teardown();

    joystick.rumble(u16::MAX, u16::MAX, 0);
    joystick.haptic_run_effect();
    thread::sleep(Duration::from_millis(200));

    assert_eq!(gpio.level(), Some(false));
    assert_eq!(gpio.level_history(), vec![false, true, false]);
    assert!(!joystick.controller().is_active());
}

#[test]
fn teardown_of_unused_controller_drives_line_low() {
    let (gpio, controller) = controller();
    controller.teardown();
    assert_eq!(gpio.level(), Some(false));
}

#[test]
fn custom_config_is_honored() {
    let gpio = MockGpio::new().with_pin(17);
    let config = RumbleConfig::default()
        .with_strength_threshold(0.5)
        .with_max_duration_ms(200);
    let controller = RumbleController::with_config(gpio.clone(), config);

    controller.activate(0.4, 0);
    assert_eq!(controller.state(), RumbleState::Idle);

    controller.activate(0.6, 200);
    assert_eq!(controller.state(), RumbleState::ActiveUntimed);

    controller.activate(0.6, 199);
    assert_eq!(controller.state(), RumbleState::ActiveTimed);
    controller.stop();

    assert_eq!(gpio.writes()[0].value, b"17".to_vec());
    assert_eq!(controller.config().strength_threshold, 0.5);
}
