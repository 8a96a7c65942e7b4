//! Freeze state and the status notifications emitted on each transition.
//!
//! # Status strings
//!
//! The presentation layer receives plain strings (see
//! `rofreeze::application::freeze_control::StatusSink`).  The exact text of
//! the four basic notifications is part of the external contract and must not
//! change:
//!
//! | Status            | Text               |
//! |-------------------|--------------------|
//! | `PointSet`        | `Point set`        |
//! | `NoPointSaved`    | `No point saved`   |
//! | `Frozen`          | `Frozen`           |
//! | `Unfrozen`        | `Unfrozen`         |

use std::fmt;

use serde::{Deserialize, Serialize};

/// The observable state of a freeze session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FreezeState {
    /// No point has been saved yet; toggling freeze is a no-op.
    #[default]
    Idle,
    /// A point is armed and the session is ready to freeze.
    PointSaved,
    /// The cursor is pinned and the repeat task is injecting key presses.
    Frozen,
}

impl fmt::Display for FreezeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FreezeState::Idle => "idle",
            FreezeState::PointSaved => "point_saved",
            FreezeState::Frozen => "frozen",
        };
        f.write_str(s)
    }
}

/// One notification per transition, rendered to text for the status channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// The keyboard watch was installed and hotkeys are live.
    Running,
    /// The keyboard watch was removed.
    Stopped,
    PointSet,
    NoPointSaved,
    Frozen,
    Unfrozen,
    /// The freeze ended but the target's confinement rectangle could not be
    /// put back.  Cursor roaming is restored regardless.
    UnfrozenConfinementLost(String),
    /// The cursor position could not be read when saving a point.
    PointNotSet(String),
    /// Entering the freeze failed and everything was rolled back.
    FreezeFailed(String),
    /// Global hooks could not be installed; hotkey features are disabled.
    HookUnavailable(String),
}

impl Status {
    /// Returns `true` for notifications that report a failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::UnfrozenConfinementLost(_)
                | Status::PointNotSet(_)
                | Status::FreezeFailed(_)
                | Status::HookUnavailable(_)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Running => f.write_str("Running"),
            Status::Stopped => f.write_str("Stopped"),
            Status::PointSet => f.write_str("Point set"),
            Status::NoPointSaved => f.write_str("No point saved"),
            Status::Frozen => f.write_str("Frozen"),
            Status::Unfrozen => f.write_str("Unfrozen"),
            Status::UnfrozenConfinementLost(reason) => {
                write!(f, "Unfrozen (cursor confinement not restored: {reason})")
            }
            Status::PointNotSet(reason) => write!(f, "Point not set: {reason}"),
            Status::FreezeFailed(reason) => write!(f, "Freeze failed: {reason}"),
            Status::HookUnavailable(reason) => write!(f, "Input hooks unavailable: {reason}"),
        }
    }
}
