//! Hook layer for platforms without global low-level hooks.
//!
//! Every watch fails with [`HookError::Unavailable`], so the session reports
//! "Input hooks unavailable" and stays disabled instead of pretending to be armed.

use rofreeze_core::HotkeyBindings;

use super::{HookError, HookHandle, HotkeyCallback, InputHooks, MoveCallback};

#[derive(Debug, Clone)]
pub struct UnsupportedInputHooks {
    reason: String,
}

impl UnsupportedInputHooks {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Hooks for the current OS, named in the reason text.
    pub fn for_current_os() -> Self {
        Self::new(format!(
            "low-level input hooks are not supported on {}",
            std::env::consts::OS
        ))
    }
}

impl InputHooks for UnsupportedInputHooks {
    fn start_keyboard_watch(
        &self,
        _bindings: HotkeyBindings,
        _on_hotkey: HotkeyCallback,
    ) -> Result<HookHandle, HookError> {
        Err(HookError::Unavailable(self.reason.clone()))
    }

    fn start_mouse_suppression(&self, _on_move: MoveCallback) -> Result<HookHandle, HookError> {
        Err(HookError::Unavailable(self.reason.clone()))
    }

    fn stop(&self, _handle: HookHandle) {}
}
