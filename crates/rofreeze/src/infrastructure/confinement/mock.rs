//! Recording confinement double.
//!
//! Behaves like a tiny in-memory OS: `release_clip` clears the current clip,
//! `restore_clip` sets it.  Each call can be made to fail.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rofreeze_core::ClipRect;

use super::{ConfinementError, ConfinementOp, CursorConfinement};
use crate::infrastructure::call_log::{Call, CallLog};

#[derive(Default)]
struct State {
    current: Option<ClipRect>,
    fail_capture: bool,
    fail_release: bool,
    fail_restore: bool,
    releases: u32,
    restores: Vec<ClipRect>,
}

#[derive(Default)]
pub struct RecordingConfinement {
    state: Mutex<State>,
    log: Option<Arc<CallLog>>,
}

impl RecordingConfinement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `rect` as the active clip (a game holding the cursor).
    pub fn confined_to(rect: ClipRect) -> Self {
        let confinement = Self::default();
        confinement.state().current = Some(rect);
        confinement
    }

    /// Attaches a shared call log.
    pub fn with_log(mut self, log: Arc<CallLog>) -> Self {
        self.log = Some(log);
        self
    }

    pub fn set_current(&self, rect: Option<ClipRect>) {
        self.state().current = rect;
    }

    pub fn current(&self) -> Option<ClipRect> {
        self.state().current
    }

    pub fn fail_capture(&self, fail: bool) {
        self.state().fail_capture = fail;
    }

    pub fn fail_release(&self, fail: bool) {
        self.state().fail_release = fail;
    }

    pub fn fail_restore(&self, fail: bool) {
        self.state().fail_restore = fail;
    }

    pub fn release_count(&self) -> u32 {
        self.state().releases
    }

    /// Every rectangle passed to a successful `restore_clip`, in order.
    pub fn restored(&self) -> Vec<ClipRect> {
        self.state().restores.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: Call) {
        if let Some(log) = &self.log {
            log.record(call);
        }
    }
}

impl CursorConfinement for RecordingConfinement {
    fn capture_current_clip(&self) -> Result<Option<ClipRect>, ConfinementError> {
        self.record(Call::CaptureClip);
        let state = self.state();
        if state.fail_capture {
            return Err(ConfinementError::failed(ConfinementOp::Capture, "mock capture failure"));
        }
        Ok(state.current)
    }

    fn release_clip(&self) -> Result<(), ConfinementError> {
        self.record(Call::ReleaseClip);
        let mut state = self.state();
        if state.fail_release {
            return Err(ConfinementError::failed(ConfinementOp::Release, "mock release failure"));
        }
        state.current = None;
        state.releases += 1;
        Ok(())
    }

    fn restore_clip(&self, rect: ClipRect) -> Result<(), ConfinementError> {
        self.record(Call::RestoreClip(rect));
        let mut state = self.state();
        if state.fail_restore {
            return Err(ConfinementError::failed(ConfinementOp::Restore, "mock restore failure"));
        }
        state.current = Some(rect);
        state.restores.push(rect);
        Ok(())
    }
}
