//! Mock hook layer for unit and integration testing.
//!
//! Lets tests press hotkeys and move the mouse without a Windows message loop.
//! Key events go through the same [`HotkeyFilter`] the real dispatcher uses,
//! so auto-repeat handling is exercised too.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rofreeze_core::{HotkeyAction, HotkeyBindings, HotkeyFilter, Point, VirtualKey};

use super::{HookError, HookHandle, HookKind, HotkeyCallback, InputHooks, MoveCallback};
use crate::infrastructure::call_log::{Call, CallLog};

struct KeyboardWatch {
    handle: HookHandle,
    filter: HotkeyFilter,
    on_hotkey: HotkeyCallback,
}

struct MouseWatch {
    handle: HookHandle,
    on_move: MoveCallback,
}

#[derive(Default)]
struct MockState {
    keyboard: Option<KeyboardWatch>,
    mouse: Option<MouseWatch>,
    keyboard_starts: u32,
    suppression_starts: u32,
    suppression_stops: u32,
    fail_keyboard: Option<String>,
    fail_mouse: Option<String>,
}

/// A mock implementation of [`InputHooks`] driven by the test.
#[derive(Default)]
pub struct MockInputHooks {
    state: Mutex<MockState>,
    log: Option<Arc<CallLog>>,
}

impl MockInputHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that also appends to a shared [`CallLog`].
    pub fn with_log(log: Arc<CallLog>) -> Self {
        Self {
            state: Mutex::default(),
            log: Some(log),
        }
    }

    /// Makes every following `start_keyboard_watch` fail with `reason`.
    pub fn fail_keyboard_watch(&self, reason: &str) {
        self.state().fail_keyboard = Some(reason.to_string());
    }

    /// Makes every following `start_mouse_suppression` fail with `reason`.
    pub fn fail_mouse_suppression(&self, reason: &str) {
        self.state().fail_mouse = Some(reason.to_string());
    }

    /// Simulates a physical key-down.  Returns the action that fired, if any.
    ///
    /// The hotkey handler runs on the calling thread, after the mock's lock
    /// is released, so it may start or stop watches.
    pub fn press(&self, key: VirtualKey) -> Option<HotkeyAction> {
        let (action, on_hotkey) = {
            let mut state = self.state();
            let watch = state.keyboard.as_mut()?;
            let action = watch.filter.key_down(key)?;
            (action, Arc::clone(&watch.on_hotkey))
        };
        on_hotkey(action);
        Some(action)
    }

    /// Simulates a physical key-up.
    pub fn release(&self, key: VirtualKey) {
        if let Some(watch) = self.state().keyboard.as_mut() {
            watch.filter.key_up(key);
        }
    }

    /// Press followed by release.
    pub fn tap(&self, key: VirtualKey) -> Option<HotkeyAction> {
        let action = self.press(key);
        self.release(key);
        action
    }

    /// Taps whichever key is bound to `action`.  Returns `false` if no
    /// keyboard watch is running.
    pub fn trigger(&self, action: HotkeyAction) -> bool {
        let key = {
            let state = self.state();
            let Some(watch) = state.keyboard.as_ref() else {
                return false;
            };
            let bindings = watch.filter.bindings();
            match action {
                HotkeyAction::SavePoint => bindings.save_point,
                HotkeyAction::ToggleFreeze => bindings.toggle_freeze,
            }
        };
        self.tap(key).is_some()
    }

    /// Simulates a hardware mouse move.  Returns `true` if it was suppressed.
    pub fn move_mouse(&self, target: Point) -> bool {
        let on_move = match self.state().mouse.as_ref() {
            Some(watch) => Arc::clone(&watch.on_move),
            None => return false,
        };
        on_move(target);
        true
    }

    pub fn is_watching_keyboard(&self) -> bool {
        self.state().keyboard.is_some()
    }

    pub fn is_suppressing(&self) -> bool {
        self.state().mouse.is_some()
    }

    pub fn keyboard_starts(&self) -> u32 {
        self.state().keyboard_starts
    }

    pub fn suppression_starts(&self) -> u32 {
        self.state().suppression_starts
    }

    pub fn suppression_stops(&self) -> u32 {
        self.state().suppression_stops
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: Call) {
        if let Some(log) = &self.log {
            log.record(call);
        }
    }
}

impl InputHooks for MockInputHooks {
    fn start_keyboard_watch(
        &self,
        bindings: HotkeyBindings,
        on_hotkey: HotkeyCallback,
    ) -> Result<HookHandle, HookError> {
        let mut state = self.state();
        if let Some(reason) = &state.fail_keyboard {
            return Err(HookError::Unavailable(reason.clone()));
        }
        if state.keyboard.is_some() {
            return Err(HookError::AlreadyRunning(HookKind::Keyboard));
        }
        let handle = HookHandle::new(HookKind::Keyboard);
        state.keyboard = Some(KeyboardWatch {
            handle,
            filter: HotkeyFilter::new(bindings),
            on_hotkey,
        });
        state.keyboard_starts += 1;
        drop(state);
        self.record(Call::StartKeyboardWatch);
        Ok(handle)
    }

    fn start_mouse_suppression(&self, on_move: MoveCallback) -> Result<HookHandle, HookError> {
        let mut state = self.state();
        if let Some(reason) = &state.fail_mouse {
            return Err(HookError::Unavailable(reason.clone()));
        }
        if state.mouse.is_some() {
            return Err(HookError::AlreadyRunning(HookKind::MouseSuppression));
        }
        let handle = HookHandle::new(HookKind::MouseSuppression);
        state.mouse = Some(MouseWatch { handle, on_move });
        state.suppression_starts += 1;
        drop(state);
        self.record(Call::StartSuppression);
        Ok(handle)
    }

    fn stop(&self, handle: HookHandle) {
        let mut state = self.state();
        let stopped = match handle.kind() {
            HookKind::Keyboard => {
                let matches = state.keyboard.as_ref().is_some_and(|w| w.handle == handle);
                if matches {
                    state.keyboard = None;
                }
                matches
            }
            HookKind::MouseSuppression => {
                let matches = state.mouse.as_ref().is_some_and(|w| w.handle == handle);
                if matches {
                    state.mouse = None;
                    state.suppression_stops += 1;
                }
                matches
            }
        };
        drop(state);
        if stopped {
            self.record(Call::StopHook(handle.kind()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn counting_callback() -> (HotkeyCallback, Arc<Mutex<Vec<HotkeyAction>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: HotkeyCallback = Arc::new(move |action| sink.lock().unwrap().push(action));
        (callback, seen)
    }

    #[test]
    fn test_press_before_start_fires_nothing() {
        let hooks = MockInputHooks::new();
        assert_eq!(hooks.press(VirtualKey::F3), None);
        assert!(!hooks.trigger(HotkeyAction::ToggleFreeze));
    }

    #[test]
    fn test_held_key_fires_once() {
        // Arrange
        let hooks = MockInputHooks::new();
        let (callback, seen) = counting_callback();
        hooks
            .start_keyboard_watch(HotkeyBindings::default(), callback)
            .unwrap();

        // Act – three key-downs without a key-up, then a fresh press
        hooks.press(VirtualKey::F3);
        hooks.press(VirtualKey::F3);
        hooks.press(VirtualKey::F3);
        hooks.release(VirtualKey::F3);
        hooks.tap(VirtualKey::Q);

        // Assert
        assert_eq!(
            *seen.lock().unwrap(),
            vec![HotkeyAction::ToggleFreeze, HotkeyAction::SavePoint]
        );
    }

    #[test]
    fn test_second_keyboard_watch_is_rejected() {
        let hooks = MockInputHooks::new();
        let (callback, _) = counting_callback();
        hooks
            .start_keyboard_watch(HotkeyBindings::default(), Arc::clone(&callback))
            .unwrap();

        let err = hooks
            .start_keyboard_watch(HotkeyBindings::default(), callback)
            .unwrap_err();

        assert_eq!(err, HookError::AlreadyRunning(HookKind::Keyboard));
    }

    #[test]
    fn test_mouse_moves_reach_handler_only_while_suppressing() {
        // Arrange
        let hooks = MockInputHooks::new();
        let moves = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&moves);
        let handle = hooks
            .start_mouse_suppression(Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        // Act
        assert!(hooks.move_mouse(Point::new(5, 5)));
        hooks.stop(handle);
        assert!(!hooks.move_mouse(Point::new(6, 6)));

        // Assert
        assert_eq!(moves.load(Ordering::SeqCst), 1);
        assert_eq!(hooks.suppression_starts(), 1);
        assert_eq!(hooks.suppression_stops(), 1);
    }

    #[test]
    fn test_stop_is_idempotent_and_logged_once() {
        let log = Arc::new(CallLog::new());
        let hooks = MockInputHooks::with_log(Arc::clone(&log));
        let handle = hooks.start_mouse_suppression(Arc::new(|_| {})).unwrap();

        hooks.stop(handle);
        hooks.stop(handle);

        assert_eq!(hooks.suppression_stops(), 1);
        assert_eq!(
            log.calls(),
            vec![
                Call::StartSuppression,
                Call::StopHook(HookKind::MouseSuppression)
            ]
        );
    }

    #[test]
    fn test_configured_failure_is_reported_as_unavailable() {
        let hooks = MockInputHooks::new();
        hooks.fail_keyboard_watch("denied");
        let (callback, _) = counting_callback();

        let err = hooks
            .start_keyboard_watch(HotkeyBindings::default(), callback)
            .unwrap_err();

        assert_eq!(err, HookError::Unavailable("denied".to_string()));
        assert!(!hooks.is_watching_keyboard());
    }
}
