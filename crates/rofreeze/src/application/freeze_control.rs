//! FreezeSession: the hotkey-driven freeze state machine.
//!
//! This is the heart of RoFreeze.  It receives the two hotkey actions from the
//! hook layer, pins the cursor to the saved point while frozen, drives the
//! repeat-press task, and (in first-person mode) lifts and re-applies the
//! target's cursor confinement around the freeze.
//!
//! # States (for beginners)
//!
//! ```text
//!            save point              toggle
//!   Idle ───────────────▶ PointSaved ◀──────▶ Frozen
//!                            ▲  │ save point      │ save point
//!                            └──┘                 └─ (updates the point
//!                                                     for the next freeze)
//! ```
//!
//! Toggling while `Idle` does nothing except report "No point saved".
//!
//! # Concurrency
//!
//! One mutex guards the whole session state and is held for the entire
//! duration of a transition, so a save-point press cannot interleave with a
//! half-finished freeze entry.  The mouse-suppression handler never touches
//! that mutex: it owns a copy of the frozen point and the injector.  That is
//! what makes it safe to stop suppression from inside a transition.
//!
//! The status sink is called while the mutex is held, so a sink must not call
//! back into the session.
//!
//! # Architecture
//!
//! The session depends only on the adapter traits ([`InputHooks`],
//! [`CursorConfinement`], [`InputInjector`], [`StatusSink`]); the concrete
//! implementations are chosen once at startup and injected through
//! [`PlatformAdapters`].

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use rofreeze_core::{
    ClipRect, FreezeState, HotkeyAction, HotkeyBindings, Point, Status, VirtualKey,
};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::application::repeat_press::RepeatPressTask;
use crate::infrastructure::confinement::{ConfinementError, CursorConfinement};
use crate::infrastructure::input_hook::{
    HookError, HookHandle, HotkeyCallback, InputHooks, MoveCallback,
};
use crate::infrastructure::input_injection::{InjectionError, InputInjector};

// ── Collaborators ─────────────────────────────────────────────────────────────

/// Receives one human-readable notification per transition.
///
/// Called synchronously on whichever thread ran the transition (usually the
/// hotkey dispatcher).  Implementations must return quickly and must not call
/// back into the [`FreezeSession`]; the UI bridge's `ChannelStatusSink` just
/// forwards the text to the presentation event loop.
#[cfg_attr(test, mockall::automock)]
pub trait StatusSink: Send + Sync {
    fn notify(&self, message: &str);
}

/// The OS adapters a session drives.
#[derive(Clone)]
pub struct PlatformAdapters {
    pub hooks: Arc<dyn InputHooks>,
    pub confinement: Arc<dyn CursorConfinement>,
    pub injector: Arc<dyn InputInjector>,
}

/// Tunables fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeSettings {
    pub bindings: HotkeyBindings,
    /// Key tapped by the repeat task while frozen.
    pub repeat_key: VirtualKey,
    pub repeat_interval: Duration,
    /// Initial value of the first-person flag.
    pub first_person_mode: bool,
}

impl Default for FreezeSettings {
    fn default() -> Self {
        Self {
            bindings: HotkeyBindings::default(),
            repeat_key: VirtualKey::SPACE,
            repeat_interval: Duration::from_millis(30),
            first_person_mode: false,
        }
    }
}

/// Why entering a freeze failed.  Never escapes the session: it is turned
/// into a `"Freeze failed: …"` notification after rollback.
#[derive(Debug, Error)]
pub enum FreezeError {
    #[error(transparent)]
    Hook(#[from] HookError),
    #[error(transparent)]
    Confinement(#[from] ConfinementError),
    #[error("cursor move failed: {0}")]
    Injection(#[from] InjectionError),
    #[error("could not start the repeat-press thread: {0}")]
    RepeatSpawn(#[source] io::Error),
    /// Entry failed and the rollback could not put the captured clip back.
    #[error("{cause}; {restore}")]
    ClipNotRestored {
        cause: Box<FreezeError>,
        restore: ConfinementError,
    },
}

/// Point-in-time copy of the observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: FreezeState,
    pub saved_point: Option<Point>,
    /// The point the cursor is pinned to; `None` unless frozen.
    pub frozen_point: Option<Point>,
    pub saved_clip_rect: Option<ClipRect>,
    pub first_person_mode: bool,
    pub enabled: bool,
    pub disabled_reason: Option<String>,
}

// ── Session state ─────────────────────────────────────────────────────────────

/// Everything that exists only while frozen, bundled so it is created and
/// torn down together.
struct ActiveFreeze {
    point: Point,
    first_person: bool,
    saved_clip: Option<ClipRect>,
    suppression: HookHandle,
    repeat: RepeatPressTask,
}

#[derive(Default)]
struct SessionState {
    saved_point: Option<Point>,
    active: Option<ActiveFreeze>,
    keyboard_watch: Option<HookHandle>,
    disabled_reason: Option<String>,
}

/// The single freeze session of the process.  Share it as `Arc<FreezeSession>`.
pub struct FreezeSession {
    state: Mutex<SessionState>,
    first_person_mode: AtomicBool,
    settings: FreezeSettings,
    adapters: PlatformAdapters,
    status: Weak<dyn StatusSink>,
}

impl FreezeSession {
    /// Creates an idle, not-yet-started session.
    ///
    /// The session only keeps a weak reference to `status`; the presentation
    /// layer owns the sink.
    pub fn new(
        adapters: PlatformAdapters,
        settings: FreezeSettings,
        status: &Arc<dyn StatusSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SessionState::default()),
            first_person_mode: AtomicBool::new(settings.first_person_mode),
            settings,
            adapters,
            status: Arc::downgrade(status),
        })
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Installs the keyboard watch so the hotkeys become live.
    ///
    /// Calling `start` on a running session is a no-op.  When the hook cannot
    /// be installed the session stays disabled, reports
    /// `"Input hooks unavailable: …"` and returns the error.
    pub fn start(self: &Arc<Self>) -> Result<(), HookError> {
        let mut state = self.lock_state();
        if state.keyboard_watch.is_some() {
            return Ok(());
        }

        let weak = Arc::downgrade(self);
        let on_hotkey: HotkeyCallback = Arc::new(move |action| {
            if let Some(session) = weak.upgrade() {
                session.handle_hotkey(action);
            }
        });

        match self
            .adapters
            .hooks
            .start_keyboard_watch(self.settings.bindings, on_hotkey)
        {
            Ok(handle) => {
                state.keyboard_watch = Some(handle);
                state.disabled_reason = None;
                info!(
                    save_point = %self.settings.bindings.save_point,
                    toggle_freeze = %self.settings.bindings.toggle_freeze,
                    "hotkeys armed"
                );
                self.emit(Status::Running);
                Ok(())
            }
            Err(e) => {
                let reason = match &e {
                    HookError::Unavailable(reason) => reason.clone(),
                    other => other.to_string(),
                };
                warn!("hotkeys disabled: {reason}");
                state.disabled_reason = Some(reason.clone());
                self.emit(Status::HookUnavailable(reason));
                Err(e)
            }
        }
    }

    /// Ends any active freeze, removes the keyboard watch and reports `"Stopped"`.
    pub fn stop(&self) {
        self.teardown();
        info!("session stopped");
        self.emit(Status::Stopped);
    }

    /// Same teardown as [`stop`](Self::stop) without the final notification.
    /// Also runs on drop.
    pub fn shutdown(&self) {
        self.teardown();
    }

    fn teardown(&self) {
        let keyboard_watch = {
            let mut state = self.lock_state();
            if let Some(active) = state.active.take() {
                let status = self.exit_freeze(active);
                self.emit(status);
            }
            state.keyboard_watch.take()
        };
        // Outside the lock: stopping the watch joins the hotkey dispatcher,
        // which may be waiting for that lock.
        if let Some(handle) = keyboard_watch {
            self.adapters.hooks.stop(handle);
        }
    }

    // ── Hotkey actions ───────────────────────────────────────────────────────

    fn handle_hotkey(&self, action: HotkeyAction) {
        let mut state = self.lock_state();
        // A press that raced with stop().
        if state.keyboard_watch.is_none() {
            debug!(?action, "hotkey ignored, session not running");
            return;
        }
        match action {
            HotkeyAction::SavePoint => self.save_point_locked(&mut state),
            HotkeyAction::ToggleFreeze => self.toggle_freeze_locked(&mut state),
        }
    }

    /// Records the current cursor position as the freeze point.
    ///
    /// While frozen the active freeze keeps its point; the new one is used
    /// by the next freeze.
    pub fn on_save_point(&self) {
        let mut state = self.lock_state();
        self.save_point_locked(&mut state);
    }

    /// Enters or leaves the frozen state.
    pub fn on_toggle_freeze(&self) {
        let mut state = self.lock_state();
        self.toggle_freeze_locked(&mut state);
    }

    fn save_point_locked(&self, state: &mut SessionState) {
        let status = match self.adapters.injector.cursor_position() {
            Ok(point) => {
                state.saved_point = Some(point);
                info!(%point, frozen = state.active.is_some(), "point saved");
                Status::PointSet
            }
            Err(e) => {
                warn!("could not read cursor position: {e}");
                Status::PointNotSet(e.to_string())
            }
        };
        self.emit(status);
    }

    fn toggle_freeze_locked(&self, state: &mut SessionState) {
        let status = if let Some(active) = state.active.take() {
            self.exit_freeze(active)
        } else if let Some(point) = state.saved_point {
            match self.enter_freeze(point) {
                Ok(active) => {
                    state.active = Some(active);
                    Status::Frozen
                }
                Err(e) => {
                    warn!("freeze aborted: {e}");
                    Status::FreezeFailed(e.to_string())
                }
            }
        } else {
            debug!("toggle ignored, no point saved");
            Status::NoPointSaved
        };
        self.emit(status);
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Runs the entry sequence.  On error everything already done has been
    /// undone.
    fn enter_freeze(&self, point: Point) -> Result<ActiveFreeze, FreezeError> {
        let first_person = self.first_person_mode.load(Ordering::SeqCst);
        let confinement = &self.adapters.confinement;

        // The clip must be lifted before the move, or SetCursorPos is clamped.
        let mut saved_clip = None;
        if first_person {
            saved_clip = confinement.capture_current_clip()?;
            if let Err(e) = confinement.release_clip() {
                return Err(self.abort_entry(e.into(), saved_clip, None));
            }
        }

        if let Err(e) = self.adapters.injector.move_cursor(point) {
            return Err(self.abort_entry(e.into(), saved_clip, None));
        }

        let injector = Arc::clone(&self.adapters.injector);
        let on_move: MoveCallback = Arc::new(move |attempted: Point| {
            if let Err(e) = injector.move_cursor(point) {
                trace!(%attempted, "cursor re-assert failed: {e}");
            }
        });
        let suppression = match self.adapters.hooks.start_mouse_suppression(on_move) {
            Ok(handle) => handle,
            Err(e) => return Err(self.abort_entry(e.into(), saved_clip, None)),
        };

        let repeat = match RepeatPressTask::spawn(
            Arc::clone(&self.adapters.injector),
            self.settings.repeat_key,
            self.settings.repeat_interval,
        ) {
            Ok(task) => task,
            Err(e) => {
                return Err(self.abort_entry(
                    FreezeError::RepeatSpawn(e),
                    saved_clip,
                    Some(suppression),
                ))
            }
        };

        info!(
            %point,
            first_person,
            clip = ?saved_clip,
            repeat_key = %self.settings.repeat_key,
            "frozen"
        );
        Ok(ActiveFreeze {
            point,
            first_person,
            saved_clip,
            suppression,
            repeat,
        })
    }

    /// Undoes a partial entry and returns the error to report.  A failed
    /// clip restore is folded into that error.
    fn abort_entry(
        &self,
        cause: FreezeError,
        saved_clip: Option<ClipRect>,
        suppression: Option<HookHandle>,
    ) -> FreezeError {
        if let Some(handle) = suppression {
            self.adapters.hooks.stop(handle);
        }
        let Some(rect) = saved_clip else {
            return cause;
        };
        match self.adapters.confinement.restore_clip(rect) {
            Ok(()) => cause,
            Err(restore) => {
                warn!(%rect, "could not restore cursor clip during rollback: {restore}");
                FreezeError::ClipNotRestored {
                    cause: Box::new(cause),
                    restore,
                }
            }
        }
    }

    /// Runs the exit sequence.  Never aborts; every confinement failure is
    /// reported in the returned status.
    fn exit_freeze(&self, active: ActiveFreeze) -> Status {
        let ActiveFreeze {
            point,
            first_person,
            saved_clip,
            suppression,
            repeat,
        } = active;

        // Joins the repeat thread: no tap can follow this line.
        let taps = repeat.stop();
        self.adapters.hooks.stop(suppression);

        let mut problems = Vec::new();
        if let Some(rect) = saved_clip {
            let confinement = &self.adapters.confinement;
            if let Err(e) = confinement.release_clip() {
                warn!("could not release cursor clip before restoring it: {e}");
                problems.push(format!("release failed: {}", e.reason()));
            }
            if let Err(e) = confinement.restore_clip(rect) {
                warn!(%rect, "could not restore cursor clip: {e}");
                problems.push(format!("restore failed: {}", e.reason()));
            }
        }
        let status = if problems.is_empty() {
            Status::Unfrozen
        } else {
            Status::UnfrozenConfinementLost(problems.join("; "))
        };

        info!(%point, first_person, taps, "unfrozen");
        status
    }

    // ── Configuration ────────────────────────────────────────────────────────

    /// Sets the first-person flag.  An active freeze keeps the value it
    /// started with.
    pub fn set_first_person_mode(&self, enabled: bool) {
        self.first_person_mode.store(enabled, Ordering::SeqCst);
        info!(enabled, "first-person mode changed");
    }

    pub fn first_person_mode(&self) -> bool {
        self.first_person_mode.load(Ordering::SeqCst)
    }

    pub fn settings(&self) -> &FreezeSettings {
        &self.settings
    }

    // ── Observers ────────────────────────────────────────────────────────────

    pub fn state(&self) -> FreezeState {
        Self::state_of(&self.lock_state())
    }

    pub fn saved_point(&self) -> Option<Point> {
        self.lock_state().saved_point
    }

    pub fn is_frozen(&self) -> bool {
        self.lock_state().active.is_some()
    }

    /// The confinement rectangle captured at freeze entry, if any.
    pub fn saved_clip_rect(&self) -> Option<ClipRect> {
        self.lock_state()
            .active
            .as_ref()
            .and_then(|active| active.saved_clip)
    }

    pub fn is_repeat_running(&self) -> bool {
        self.lock_state()
            .active
            .as_ref()
            .is_some_and(|active| active.repeat.is_running())
    }

    /// `true` while the keyboard watch is installed.
    pub fn is_enabled(&self) -> bool {
        self.lock_state().keyboard_watch.is_some()
    }

    /// Why the last `start` failed, if it did.
    pub fn disabled_reason(&self) -> Option<String> {
        self.lock_state().disabled_reason.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock_state();
        SessionSnapshot {
            state: Self::state_of(&state),
            saved_point: state.saved_point,
            frozen_point: state.active.as_ref().map(|active| active.point),
            saved_clip_rect: state.active.as_ref().and_then(|active| active.saved_clip),
            first_person_mode: self.first_person_mode(),
            enabled: state.keyboard_watch.is_some(),
            disabled_reason: state.disabled_reason.clone(),
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn state_of(state: &SessionState) -> FreezeState {
        if state.active.is_some() {
            FreezeState::Frozen
        } else if state.saved_point.is_some() {
            FreezeState::PointSaved
        } else {
            FreezeState::Idle
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, status: Status) {
        if status.is_error() {
            warn!(%status, "status");
        } else {
            debug!(%status, "status");
        }
        if let Some(sink) = self.status.upgrade() {
            sink.notify(&status.to_string());
        }
    }
}

impl Drop for FreezeSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
