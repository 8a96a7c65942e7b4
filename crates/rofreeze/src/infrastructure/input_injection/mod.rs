//! Synthetic input: reading and moving the real cursor, and tapping keys.
//!
//! Everything produced here is marked as injected by the OS, which is how the
//! hook layer tells it apart from the user's own input: the repeat task's key
//! taps never trigger hotkeys, and re-asserting the cursor never feeds back
//! into mouse suppression.

use rofreeze_core::{Point, VirtualKey};
use thiserror::Error;

pub mod mock;
pub mod unsupported;

#[cfg(target_os = "windows")]
pub mod windows;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectionError {
    #[error("input injection failed: {0}")]
    Platform(String),
    #[error("input injection is not supported on this platform")]
    Unsupported,
}

/// Capability to observe and drive the real cursor and keyboard.
#[cfg_attr(test, mockall::automock)]
pub trait InputInjector: Send + Sync {
    /// Current cursor position in virtual-screen pixels.
    fn cursor_position(&self) -> Result<Point, InjectionError>;

    /// Moves the real cursor to `point`.
    fn move_cursor(&self, point: Point) -> Result<(), InjectionError>;

    /// Presses and releases `key` as one atomic batch.
    fn tap_key(&self, key: VirtualKey) -> Result<(), InjectionError>;
}
