//! Hotkey bindings and edge-triggered hotkey detection.
//!
//! # Why edge-triggered? (for beginners)
//!
//! When a key is held down, Windows keeps delivering `WM_KEYDOWN` messages at
//! the keyboard auto-repeat rate (typically ~30 per second) until the key is
//! released.  A naive "toggle on every key-down" would therefore flip the
//! freeze on and off many times during a single long press.
//!
//! [`HotkeyFilter`] remembers which bound keys are currently held and only
//! reports the *first* key-down of each press (the rising edge).  The next
//! action for that key is reported only after its key-up has been seen.

use serde::{Deserialize, Serialize};

use crate::keymap::VirtualKey;

/// The two logical actions a hotkey can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    /// Capture the current cursor position as the freeze point.
    SavePoint,
    /// Enter or leave the frozen state.
    ToggleFreeze,
}

/// The keys bound to each [`HotkeyAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyBindings {
    pub save_point: VirtualKey,
    pub toggle_freeze: VirtualKey,
}

impl HotkeyBindings {
    /// Returns the action bound to `key`, if any.
    pub fn action_for(&self, key: VirtualKey) -> Option<HotkeyAction> {
        if key == self.save_point {
            Some(HotkeyAction::SavePoint)
        } else if key == self.toggle_freeze {
            Some(HotkeyAction::ToggleFreeze)
        } else {
            None
        }
    }

    /// Returns `true` when both actions are bound to the same key.
    pub fn is_ambiguous(&self) -> bool {
        self.save_point == self.toggle_freeze
    }
}

impl Default for HotkeyBindings {
    /// `Q` saves the point, `F3` toggles the freeze.
    fn default() -> Self {
        Self {
            save_point: VirtualKey::Q,
            toggle_freeze: VirtualKey::F3,
        }
    }
}

/// Converts raw key-down/key-up events into one action per physical press.
#[derive(Debug, Clone)]
pub struct HotkeyFilter {
    bindings: HotkeyBindings,
    save_point_held: bool,
    toggle_freeze_held: bool,
}

impl HotkeyFilter {
    pub fn new(bindings: HotkeyBindings) -> Self {
        Self {
            bindings,
            save_point_held: false,
            toggle_freeze_held: false,
        }
    }

    pub fn bindings(&self) -> &HotkeyBindings {
        &self.bindings
    }

    /// Handles a key-down event.
    ///
    /// Returns the bound action on the rising edge; returns `None` for unbound
    /// keys and for auto-repeat key-downs of a key that is already held.
    pub fn key_down(&mut self, key: VirtualKey) -> Option<HotkeyAction> {
        let action = self.bindings.action_for(key)?;
        let held = self.held_mut(action);
        if *held {
            return None;
        }
        *held = true;
        Some(action)
    }

    /// Handles a key-up event, re-arming the key for its next press.
    pub fn key_up(&mut self, key: VirtualKey) {
        if let Some(action) = self.bindings.action_for(key) {
            *self.held_mut(action) = false;
        }
    }

    fn held_mut(&mut self, action: HotkeyAction) -> &mut bool {
        match action {
            HotkeyAction::SavePoint => &mut self.save_point_held,
            HotkeyAction::ToggleFreeze => &mut self.toggle_freeze_held,
        }
    }
}
