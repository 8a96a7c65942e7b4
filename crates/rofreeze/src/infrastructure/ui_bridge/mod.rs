//! Presentation bridge: status channel plus the commands a UI front-end calls.
//!
//! The presentation layer is the only consumer of this module; it must NOT be
//! imported by the application layer.
//!
//! # Status marshaling (for beginners)
//!
//! The freeze session reports every transition through a [`StatusSink`],
//! synchronously, on whatever thread ran the transition: usually the
//! hotkey dispatcher thread, never the UI thread.  A UI toolkit must only be
//! touched from its own event loop, so [`ChannelStatusSink`] does nothing but
//! push the text into an unbounded Tokio channel.  The presentation event loop
//! owns the receiving end and updates its label from there.
//!
//! ```text
//!  hotkey thread ──notify("Frozen")──▶ channel ──recv().await──▶ UI event loop
//! ```
//!
//! # `CommandResult<T>` wrapper
//!
//! Every command returns `CommandResult<T>` rather than `Result<T, E>`, so
//! each response has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`.

use std::path::PathBuf;
use std::sync::Arc;

use rofreeze_core::Point;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::warn;

use crate::application::freeze_control::{FreezeSession, StatusSink};
use crate::infrastructure::storage::config::{save_config_to, AppConfig};

// ── Status channel ────────────────────────────────────────────────────────────

/// Forwards status text to the presentation event loop.
pub struct ChannelStatusSink {
    tx: UnboundedSender<String>,
}

impl StatusSink for ChannelStatusSink {
    fn notify(&self, message: &str) {
        // The receiver is gone only while the UI is shutting down.
        let _ = self.tx.send(message.to_string());
    }
}

/// Creates a connected sink/receiver pair.
pub fn status_channel() -> (Arc<dyn StatusSink>, UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelStatusSink { tx }), rx)
}

// ── Shared application state ──────────────────────────────────────────────────

/// State shared by every command.
///
/// Owns the status sink: the session itself only holds a weak reference.
pub struct AppState {
    pub session: Arc<FreezeSession>,
    /// The current configuration; written back when a setting changes.
    pub config: Mutex<AppConfig>,
    /// Where to persist `config`.  `None` keeps changes in memory only.
    pub config_path: Option<PathBuf>,
    pub status_sink: Arc<dyn StatusSink>,
}

impl AppState {
    pub fn new(
        session: Arc<FreezeSession>,
        config: AppConfig,
        config_path: Option<PathBuf>,
        status_sink: Arc<dyn StatusSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            session,
            config: Mutex::new(config),
            config_path,
            status_sink,
        })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStatusDto {
    /// `"idle"`, `"point_saved"` or `"frozen"`.
    pub state: String,
    pub saved_point: Option<Point>,
    pub frozen_point: Option<Point>,
    pub first_person_mode: bool,
    /// `false` until `start_tool` succeeds, and after `stop_tool`.
    pub running: bool,
    pub disabled_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotkeysDto {
    pub save_point: String,
    pub toggle_freeze: String,
    pub repeat_key: String,
    pub repeat_interval_ms: u64,
}

/// Unified response wrapper used by every command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the current session state.
pub async fn get_status(state: Arc<AppState>) -> CommandResult<SessionStatusDto> {
    let snapshot = state.session.snapshot();
    CommandResult::ok(SessionStatusDto {
        state: snapshot.state.to_string(),
        saved_point: snapshot.saved_point,
        frozen_point: snapshot.frozen_point,
        first_person_mode: snapshot.first_person_mode,
        running: snapshot.enabled,
        disabled_reason: snapshot.disabled_reason,
    })
}

/// Arms the hotkeys ("Get Started").
///
/// Hook installation blocks while the hook thread starts, so it runs on the
/// blocking pool.
pub async fn start_tool(state: Arc<AppState>) -> CommandResult<()> {
    let session = Arc::clone(&state.session);
    match tokio::task::spawn_blocking(move || session.start()).await {
        Ok(Ok(())) => CommandResult::ok(()),
        Ok(Err(e)) => CommandResult::err(e.to_string()),
        Err(e) => CommandResult::err(format!("start task failed: {e}")),
    }
}

/// Ends any freeze and disarms the hotkeys ("Stop").
pub async fn stop_tool(state: Arc<AppState>) -> CommandResult<()> {
    let session = Arc::clone(&state.session);
    match tokio::task::spawn_blocking(move || session.stop()).await {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(format!("stop task failed: {e}")),
    }
}

/// Sets the first-person flag on the session and persists it.
///
/// The session is updated even when saving fails; the error is reported.
pub async fn set_first_person_mode(state: Arc<AppState>, enabled: bool) -> CommandResult<bool> {
    state.session.set_first_person_mode(enabled);

    let mut config = state.config.lock().await;
    config.general.first_person_mode = enabled;
    if let Some(path) = &state.config_path {
        if let Err(e) = save_config_to(path, &config) {
            warn!("could not persist first_person_mode: {e}");
            return CommandResult::err(format!("failed to save config: {e}"));
        }
    }
    CommandResult::ok(enabled)
}

/// Returns the key bindings the running session uses.
pub async fn get_hotkeys(state: Arc<AppState>) -> CommandResult<HotkeysDto> {
    let settings = state.session.settings();
    CommandResult::ok(HotkeysDto {
        save_point: settings.bindings.save_point.to_string(),
        toggle_freeze: settings.bindings.toggle_freeze.to_string(),
        repeat_key: settings.repeat_key.to_string(),
        repeat_interval_ms: settings.repeat_interval.as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::application::freeze_control::{FreezeSettings, PlatformAdapters};
    use crate::infrastructure::confinement::mock::RecordingConfinement;
    use crate::infrastructure::input_hook::mock::MockInputHooks;
    use crate::infrastructure::input_injection::mock::RecordingInjector;
    use crate::infrastructure::storage::config::{load_config_from, load_startup_config_from};

    fn app_state(
        hooks: Arc<MockInputHooks>,
        config_path: Option<PathBuf>,
    ) -> (Arc<AppState>, UnboundedReceiver<String>) {
        let (sink, rx) = status_channel();
        let adapters = PlatformAdapters {
            hooks,
            confinement: Arc::new(RecordingConfinement::new()),
            injector: Arc::new(RecordingInjector::new()),
        };
        let session = FreezeSession::new(adapters, FreezeSettings::default(), &sink);
        (
            AppState::new(session, AppConfig::default(), config_path, sink),
            rx,
        )
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = status_channel();

        sink.notify("Point set");
        sink.notify("Frozen");

        assert_eq!(rx.recv().await.as_deref(), Some("Point set"));
        assert_eq!(rx.recv().await.as_deref(), Some("Frozen"));
    }

    #[tokio::test]
    async fn test_start_and_stop_tool_report_through_the_channel() {
        // Arrange
        let hooks = Arc::new(MockInputHooks::new());
        let (state, mut rx) = app_state(Arc::clone(&hooks), None);

        // Act
        let started = start_tool(Arc::clone(&state)).await;
        let status = get_status(Arc::clone(&state)).await;
        let stopped = stop_tool(Arc::clone(&state)).await;

        // Assert
        assert!(started.success);
        assert!(status.data.unwrap().running);
        assert!(stopped.success);
        assert!(!hooks.is_watching_keyboard());
        assert_eq!(rx.recv().await.as_deref(), Some("Running"));
        assert_eq!(rx.recv().await.as_deref(), Some("Stopped"));
    }

    #[tokio::test]
    async fn test_start_tool_failure_is_reported() {
        let hooks = Arc::new(MockInputHooks::new());
        hooks.fail_keyboard_watch("denied");
        let (state, mut rx) = app_state(hooks, None);

        let result = start_tool(Arc::clone(&state)).await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("global input hook unavailable: denied")
        );
        let status = get_status(state).await.data.unwrap();
        assert!(!status.running);
        assert_eq!(status.disabled_reason.as_deref(), Some("denied"));
        assert_eq!(
            rx.recv().await.as_deref(),
            Some("Input hooks unavailable: denied")
        );
    }

    #[tokio::test]
    async fn test_set_first_person_mode_persists_to_disk() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("rofreeze_bridge_{}", Uuid::new_v4()));
        let path = dir.join("config.toml");
        let (state, _rx) = app_state(Arc::new(MockInputHooks::new()), Some(path.clone()));

        // Act
        let result = set_first_person_mode(Arc::clone(&state), true).await;

        // Assert
        assert_eq!(result.data, Some(true));
        assert!(state.session.first_person_mode());
        assert!(state.config.lock().await.general.first_person_mode);
        let on_disk = load_config_from(&path).unwrap();
        assert!(on_disk.general.first_person_mode);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_setting_change_leaves_unreadable_config_untouched() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("rofreeze_bridge_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let original = "[hotkeys]\nsave_point = \"F5\"\n\n[freeze]\nrepeat_key = \"Hyperr\"\n";
        std::fs::write(&path, original).unwrap();
        let startup = load_startup_config_from(path.clone());
        let (state, _rx) = app_state(Arc::new(MockInputHooks::new()), startup.save_path);

        // Act
        let result = set_first_person_mode(Arc::clone(&state), true).await;

        // Assert – the change applies in memory only
        assert!(result.success);
        assert!(state.session.first_person_mode());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_get_hotkeys_returns_key_names() {
        let (state, _rx) = app_state(Arc::new(MockInputHooks::new()), None);

        let hotkeys = get_hotkeys(state).await.data.unwrap();

        assert_eq!(
            hotkeys,
            HotkeysDto {
                save_point: "Q".to_string(),
                toggle_freeze: "F3".to_string(),
                repeat_key: "Space".to_string(),
                repeat_interval_ms: 30,
            }
        );
    }

    #[tokio::test]
    async fn test_get_status_of_fresh_session_is_idle() {
        let (state, _rx) = app_state(Arc::new(MockInputHooks::new()), None);

        let status = get_status(state).await.data.unwrap();

        assert_eq!(status.state, "idle");
        assert_eq!(status.saved_point, None);
        assert!(!status.first_person_mode);
    }
}
