//! Global input hook layer.
//!
//! On Windows, this installs low-level keyboard and mouse hooks (WH_KEYBOARD_LL,
//! WH_MOUSE_LL), each on its own dedicated Win32 message loop thread.  Two kinds
//! of watch are offered:
//!
//! - **Keyboard watch** – observes the two hotkeys regardless of which window
//!   has focus and reports one [`HotkeyAction`] per physical press.
//! - **Mouse suppression** – swallows hardware-driven cursor movement while
//!   still reporting each attempted move to a handler.
//!
//! # What is *not* intercepted
//!
//! Suppression works on the low-level *message* path only.  Raw Input / HID
//! reports are delivered to applications that registered for them regardless
//! of this hook, so a game reading raw mouse deltas still sees the user's
//! motion while the visible system cursor stays put.  That split is what the
//! freeze relies on; do not "fix" it by adding a raw-input filter.
//!
//! # Testability
//!
//! The [`InputHooks`] trait allows unit tests to drive hotkeys and mouse moves
//! through [`mock::MockInputHooks`] without requiring Windows hooks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rofreeze_core::{HotkeyAction, HotkeyBindings, Point};
use thiserror::Error;

pub mod mock;
pub mod unsupported;

#[cfg(target_os = "windows")]
pub mod windows;

/// Handler invoked once per hotkey press, on the hook layer's dispatcher thread.
pub type HotkeyCallback = Arc<dyn Fn(HotkeyAction) + Send + Sync>;

/// Handler invoked for every suppressed hardware mouse move with the position
/// the cursor would have moved to.
///
/// Runs inside the hook callback: it must return quickly and must not block on
/// locks held across a freeze transition.
pub type MoveCallback = Arc<dyn Fn(Point) + Send + Sync>;

/// The kind of watch a [`HookHandle`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Keyboard,
    MouseSuppression,
}

/// Opaque handle to a running watch, returned by the `start_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle {
    id: u64,
    kind: HookKind,
}

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

impl HookHandle {
    /// Allocates a process-unique handle.
    pub fn new(kind: HookKind) -> Self {
        Self {
            id: NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            kind,
        }
    }

    pub fn kind(&self) -> HookKind {
        self.kind
    }
}

/// Error type for hook installation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The OS hook could not be installed (unsupported platform, permission
    /// denial, or an API failure).  Hotkey features are unusable.
    #[error("global input hook unavailable: {0}")]
    Unavailable(String),
    /// A watch of this kind is already running; stop it first.
    #[error("a {0:?} watch is already running")]
    AlreadyRunning(HookKind),
}

/// Trait abstracting the global hook layer.
///
/// The production implementation uses Windows hooks; tests use [`mock::MockInputHooks`].
pub trait InputHooks: Send + Sync {
    /// Starts watching the two bound hotkeys.
    ///
    /// `on_hotkey` is called once per physical press (auto-repeat is filtered
    /// out).  Synthetic key events injected by any process are ignored.
    fn start_keyboard_watch(
        &self,
        bindings: HotkeyBindings,
        on_hotkey: HotkeyCallback,
    ) -> Result<HookHandle, HookError>;

    /// Starts suppressing hardware mouse movement, reporting each attempted
    /// move to `on_move`.  Injected (synthetic) moves are let through.
    fn start_mouse_suppression(&self, on_move: MoveCallback) -> Result<HookHandle, HookError>;

    /// Stops a watch.  Stopping an unknown or already-stopped handle is a no-op.
    fn stop(&self, handle: HookHandle);
}
