//! Recording injector for tests.
//!
//! Keeps a simulated cursor: `move_cursor` updates it and `cursor_position`
//! reads it, so a test can place the "user's" cursor and then save a point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rofreeze_core::{Point, VirtualKey};

use super::{InjectionError, InputInjector};
use crate::infrastructure::call_log::{Call, CallLog};

#[derive(Default)]
struct State {
    cursor: Point,
    moves: Vec<Point>,
    taps: Vec<VirtualKey>,
    fail_read: bool,
    fail_move: bool,
    fail_tap: bool,
}

#[derive(Default)]
pub struct RecordingInjector {
    state: Mutex<State>,
    log: Option<Arc<CallLog>>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: Arc<CallLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Places the simulated cursor without recording a move.
    pub fn set_cursor(&self, point: Point) {
        self.state().cursor = point;
    }

    pub fn cursor(&self) -> Point {
        self.state().cursor
    }

    /// Every successful `move_cursor` target, in order.
    pub fn moves(&self) -> Vec<Point> {
        self.state().moves.clone()
    }

    pub fn tap_count(&self) -> usize {
        self.state().taps.len()
    }

    pub fn taps(&self) -> Vec<VirtualKey> {
        self.state().taps.clone()
    }

    pub fn fail_read(&self, fail: bool) {
        self.state().fail_read = fail;
    }

    pub fn fail_move(&self, fail: bool) {
        self.state().fail_move = fail;
    }

    pub fn fail_tap(&self, fail: bool) {
        self.state().fail_tap = fail;
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

impl InputInjector for RecordingInjector {
    fn cursor_position(&self) -> Result<Point, InjectionError> {
        self.record(Call::ReadCursor);
        let state = self.state();
        if state.fail_read {
            return Err(InjectionError::Platform("mock cursor read failure".to_string()));
        }
        Ok(state.cursor)
    }

    fn move_cursor(&self, point: Point) -> Result<(), InjectionError> {
        self.record(Call::MoveCursor(point));
        let mut state = self.state();
        if state.fail_move {
            return Err(InjectionError::Platform("mock cursor move failure".to_string()));
        }
        state.cursor = point;
        state.moves.push(point);
        Ok(())
    }

    fn tap_key(&self, key: VirtualKey) -> Result<(), InjectionError> {
        self.record(Call::TapKey(key));
        let mut state = self.state();
        if state.fail_tap {
            return Err(InjectionError::Platform("mock key tap failure".to_string()));
        }
        state.taps.push(key);
        Ok(())
    }
}
