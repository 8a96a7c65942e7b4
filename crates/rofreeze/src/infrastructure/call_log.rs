//! Shared, ordered record of calls made on the test doubles.
//!
//! Each recording double (`MockInputHooks`, `RecordingConfinement`,
//! `RecordingInjector`) can append to the same [`CallLog`], which lets tests
//! assert cross-adapter ordering such as "the clip is released before the
//! cursor is moved".

use std::sync::{Mutex, PoisonError};

use rofreeze_core::{ClipRect, Point, VirtualKey};

use super::input_hook::HookKind;

/// One adapter call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CaptureClip,
    ReleaseClip,
    RestoreClip(ClipRect),
    ReadCursor,
    MoveCursor(Point),
    TapKey(VirtualKey),
    StartKeyboardWatch,
    StartSuppression,
    StopHook(HookKind),
}

#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<Call>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Returns a copy of every call recorded so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Index of the first call equal to `call`.
    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    /// Index of the last call equal to `call`.
    pub fn last_position(&self, call: &Call) -> Option<usize> {
        self.calls().iter().rposition(|c| c == call)
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_are_kept_in_order() {
        // Arrange
        let log = CallLog::new();

        // Act
        log.record(Call::ReleaseClip);
        log.record(Call::MoveCursor(Point::new(1, 2)));
        log.record(Call::ReleaseClip);

        // Assert
        assert_eq!(log.position(&Call::ReleaseClip), Some(0));
        assert_eq!(log.last_position(&Call::ReleaseClip), Some(2));
        assert_eq!(log.count(|c| matches!(c, Call::MoveCursor(_))), 1);
        assert_eq!(log.position(&Call::CaptureClip), None);
    }
}
