//! Cursor confinement bridge.
//!
//! A game running in first-person mode usually confines the cursor to its
//! window with `ClipCursor`.  While that clip is in place, a programmatic
//! `SetCursorPos` to a point outside it is silently clamped, so the freeze
//! has to lift the clip before moving the cursor and put it back afterwards.
//!
//! # The three operations (for beginners)
//!
//! 1. **Capture** – read the current clip rectangle and remember it.
//! 2. **Release** – remove the clip so the cursor may go anywhere.
//! 3. **Restore** – re-apply the remembered rectangle.
//!
//! The game may re-apply its own clip at any time (for example when it
//! regains focus); only this save/release/restore sequence is guaranteed.

use std::fmt;

use rofreeze_core::ClipRect;
use thiserror::Error;

pub mod mock;
pub mod noop;

#[cfg(target_os = "windows")]
pub mod windows;

/// Which confinement step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfinementOp {
    Capture,
    Release,
    Restore,
}

impl fmt::Display for ConfinementOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfinementOp::Capture => "capture",
            ConfinementOp::Release => "release",
            ConfinementOp::Restore => "restore",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfinementError {
    #[error("cursor confinement {op} failed: {reason}")]
    OperationFailed { op: ConfinementOp, reason: String },
}

impl ConfinementError {
    pub fn failed(op: ConfinementOp, reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            op,
            reason: reason.into(),
        }
    }

    /// The OS-level reason, without the step prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::OperationFailed { reason, .. } => reason,
        }
    }
}

/// Capability to read, lift and re-apply the OS cursor clip.
///
/// Platforms without cursor confinement use [`noop::NoopConfinement`], which
/// reports "nothing confined" and succeeds at everything.
#[cfg_attr(test, mockall::automock)]
pub trait CursorConfinement: Send + Sync {
    /// Returns the active clip rectangle, or `None` when the cursor is not
    /// confined (the clip spans the whole virtual screen).
    fn capture_current_clip(&self) -> Result<Option<ClipRect>, ConfinementError>;

    /// Removes any clip so the cursor can roam the whole virtual screen.
    fn release_clip(&self) -> Result<(), ConfinementError>;

    /// Re-applies a previously captured clip.
    fn restore_clip(&self, rect: ClipRect) -> Result<(), ConfinementError>;
}
