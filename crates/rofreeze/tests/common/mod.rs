//! Shared wiring for the integration tests: a session over recording doubles
//! that all append to one call log.

#![allow(dead_code)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rofreeze::application::freeze_control::{
    FreezeSession, FreezeSettings, PlatformAdapters, StatusSink,
};
use rofreeze::infrastructure::call_log::CallLog;
use rofreeze::infrastructure::confinement::mock::RecordingConfinement;
use rofreeze::infrastructure::input_hook::mock::MockInputHooks;
use rofreeze::infrastructure::input_injection::mock::RecordingInjector;
use rofreeze::infrastructure::ui_bridge::status_channel;
use rofreeze_core::ClipRect;
use tokio::sync::mpsc::UnboundedReceiver;

pub struct Harness {
    pub log: Arc<CallLog>,
    pub hooks: Arc<MockInputHooks>,
    pub confinement: Arc<RecordingConfinement>,
    pub injector: Arc<RecordingInjector>,
    pub session: Arc<FreezeSession>,
    pub status_rx: UnboundedReceiver<String>,
    // The session only holds the sink weakly.
    pub sink: Arc<dyn StatusSink>,
}

impl Harness {
    pub fn new(settings: FreezeSettings) -> Self {
        Self::with_clip(settings, None)
    }

    /// A harness whose simulated OS starts with `clip` confining the cursor.
    pub fn with_clip(settings: FreezeSettings, clip: Option<ClipRect>) -> Self {
        let log = Arc::new(CallLog::new());
        let hooks = Arc::new(MockInputHooks::with_log(Arc::clone(&log)));
        let confinement = Arc::new(RecordingConfinement::new().with_log(Arc::clone(&log)));
        confinement.set_current(clip);
        let injector = Arc::new(RecordingInjector::new().with_log(Arc::clone(&log)));
        let (sink, status_rx) = status_channel();

        let adapters = PlatformAdapters {
            hooks: hooks.clone(),
            confinement: confinement.clone(),
            injector: injector.clone(),
        };
        let session = FreezeSession::new(adapters, settings, &sink);

        Self {
            log,
            hooks,
            confinement,
            injector,
            session,
            status_rx,
            sink,
        }
    }

    /// Everything emitted since the last call.
    pub fn statuses(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(message) = self.status_rx.try_recv() {
            out.push(message);
        }
        out
    }
}

/// Settings with a short repeat interval so tests see taps quickly.
pub fn fast_settings(first_person_mode: bool) -> FreezeSettings {
    FreezeSettings {
        repeat_interval: Duration::from_millis(5),
        first_person_mode,
        ..FreezeSettings::default()
    }
}

/// Polls `cond` for up to five seconds.
pub fn wait_until(cond: impl Fn() -> bool) -> bool {
    let started = Instant::now();
    while started.elapsed() < Duration::from_secs(5) {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}
