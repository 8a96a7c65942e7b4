//! Integration tests for the hotkey path: hook layer → filter → session.
//!
//! Keys are pressed through `MockInputHooks`, which runs the same
//! edge-triggered filter as the Windows dispatcher.

mod common;

use common::{fast_settings, Harness};
use rofreeze::infrastructure::call_log::Call;
use rofreeze::infrastructure::input_hook::{HookError, HookKind};
use rofreeze::infrastructure::storage::config::AppConfig;
use rofreeze_core::{FreezeState, HotkeyAction, Point, VirtualKey};

#[test]
fn test_default_hotkeys_save_and_toggle() {
    // Arrange
    let mut h = Harness::new(fast_settings(false));
    h.session.start().expect("mock hooks install");
    h.injector.set_cursor(Point::new(100, 200));

    // Act
    assert_eq!(h.hooks.tap(VirtualKey::Q), Some(HotkeyAction::SavePoint));
    assert_eq!(h.hooks.tap(VirtualKey::F3), Some(HotkeyAction::ToggleFreeze));

    // Assert
    assert_eq!(h.session.state(), FreezeState::Frozen);
    assert_eq!(h.injector.cursor(), Point::new(100, 200));

    h.hooks.tap(VirtualKey::F3);
    assert_eq!(h.session.state(), FreezeState::PointSaved);
    assert_eq!(h.statuses(), vec!["Running", "Point set", "Frozen", "Unfrozen"]);
}

#[test]
fn test_held_toggle_key_freezes_once() {
    // Arrange
    let mut h = Harness::new(fast_settings(false));
    h.session.start().unwrap();
    h.hooks.tap(VirtualKey::Q);
    h.statuses();

    // Act – auto-repeat delivers several key-downs before the key-up
    h.hooks.press(VirtualKey::F3);
    h.hooks.press(VirtualKey::F3);
    h.hooks.press(VirtualKey::F3);
    h.hooks.release(VirtualKey::F3);

    // Assert
    assert!(h.session.is_frozen());
    assert_eq!(h.statuses(), vec!["Frozen"]);
    assert_eq!(h.hooks.suppression_starts(), 1);
    h.hooks.tap(VirtualKey::F3);
}

#[test]
fn test_unbound_keys_do_nothing() {
    let mut h = Harness::new(fast_settings(false));
    h.session.start().unwrap();
    h.statuses();

    assert_eq!(h.hooks.tap(VirtualKey::SPACE), None);
    assert_eq!(h.hooks.tap(VirtualKey(b'W')), None);

    assert!(h.statuses().is_empty());
    assert_eq!(h.session.state(), FreezeState::Idle);
}

#[test]
fn test_configured_bindings_replace_defaults() {
    // Arrange – bindings come from a config file
    let config: AppConfig = toml::from_str(
        r#"
[hotkeys]
save_point = "F5"
toggle_freeze = "F6"

[freeze]
repeat_interval_ms = 5
"#,
    )
    .unwrap();
    config.validate().unwrap();
    let h = Harness::new(config.freeze_settings());
    h.session.start().unwrap();

    // Act / Assert – the defaults are no longer bound
    assert_eq!(h.hooks.tap(VirtualKey::Q), None);
    assert!(h.hooks.trigger(HotkeyAction::SavePoint));
    assert!(h.hooks.trigger(HotkeyAction::ToggleFreeze));
    assert!(h.session.is_frozen());
    assert_eq!(h.hooks.tap(VirtualKey(0x75)), Some(HotkeyAction::ToggleFreeze));
    assert!(!h.session.is_frozen());
}

#[test]
fn test_hook_install_failure_degrades_to_disabled() {
    // Arrange
    let mut h = Harness::new(fast_settings(false));
    h.hooks.fail_keyboard_watch("SetWindowsHookExW failed: access denied");

    // Act
    let result = h.session.start();

    // Assert – reported, not panicked; hotkeys stay dead
    assert!(matches!(result, Err(HookError::Unavailable(_))));
    assert!(!h.session.is_enabled());
    assert!(!h.hooks.trigger(HotkeyAction::SavePoint));
    assert_eq!(
        h.statuses(),
        vec!["Input hooks unavailable: SetWindowsHookExW failed: access denied"]
    );
}

#[test]
fn test_stop_during_freeze_tears_everything_down() {
    // Arrange
    let mut h = Harness::new(fast_settings(false));
    h.session.start().unwrap();
    h.hooks.tap(VirtualKey::Q);
    h.hooks.tap(VirtualKey::F3);

    // Act
    h.session.stop();

    // Assert
    assert!(!h.session.is_frozen());
    assert!(!h.hooks.is_watching_keyboard());
    assert!(!h.hooks.is_suppressing());
    let stop_keyboard = h.log.position(&Call::StopHook(HookKind::Keyboard)).unwrap();
    let stop_mouse = h
        .log
        .position(&Call::StopHook(HookKind::MouseSuppression))
        .unwrap();
    assert!(stop_mouse < stop_keyboard);
    assert_eq!(
        h.statuses(),
        vec!["Running", "Point set", "Frozen", "Unfrozen", "Stopped"]
    );
}

#[test]
fn test_restart_after_stop_rearms_hotkeys() {
    let mut h = Harness::new(fast_settings(false));
    h.session.start().unwrap();
    h.session.stop();

    h.session.start().unwrap();
    h.hooks.tap(VirtualKey::Q);

    assert_eq!(h.hooks.keyboard_starts(), 2);
    assert_eq!(h.session.state(), FreezeState::PointSaved);
    assert_eq!(
        h.statuses(),
        vec!["Running", "Stopped", "Running", "Point set"]
    );
}
