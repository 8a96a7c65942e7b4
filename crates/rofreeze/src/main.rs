//! RoFreeze entry point.
//!
//! Headless host for the freeze session: wires the platform adapters, the
//! status channel and the session together, arms the hotkeys and logs every
//! status message until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_startup_config() + validate()
//!  └─ platform_adapters()      -- Windows hooks or inert stand-ins
//!  └─ FreezeSession::new()
//!  └─ AppState::new()          -- owns the status sink
//!  └─ status pump              (Tokio task)
//!  └─ start_tool() … ctrl_c … stop_tool()
//! ```

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rofreeze::application::freeze_control::FreezeSession;
use rofreeze::infrastructure;
use rofreeze::infrastructure::storage::config::{load_startup_config, AppConfig};
use rofreeze::infrastructure::ui_bridge::{self, status_channel, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The log level comes from the config file, so load it first and report
    // any problem once logging is up.
    let startup = load_startup_config();
    let config = startup.config;

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    info!("RoFreeze starting");
    if let Some(e) = &startup.load_error {
        warn!("using default configuration, changes will not be saved: {e}");
    }
    config.validate().context("configuration rejected")?;

    let (status_sink, mut status_rx) = status_channel();
    let session = FreezeSession::new(
        infrastructure::platform_adapters(),
        config.freeze_settings(),
        &status_sink,
    );
    let state = AppState::new(
        session,
        config.clone(),
        startup.save_path,
        status_sink,
    );

    // ── Status pump ───────────────────────────────────────────────────────────
    let pump = tokio::spawn(async move {
        while let Some(message) = status_rx.recv().await {
            info!(status = %message, "status");
        }
    });

    log_bindings(&config);

    let started = ui_bridge::start_tool(state.clone()).await;
    if !started.success {
        let reason = started.error.unwrap_or_default();
        error!("hotkeys could not be armed: {reason}");
        drop(state);
        let _ = pump.await;
        anyhow::bail!("input hooks unavailable: {reason}");
    }

    info!("RoFreeze ready.  Press Ctrl-C to exit.");
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("shutdown signal received");

    let _ = ui_bridge::stop_tool(state.clone()).await;

    // Dropping the last AppState drops the sink, which ends the pump.
    drop(state);
    let _ = pump.await;

    info!("RoFreeze stopped");
    Ok(())
}

fn log_bindings(config: &AppConfig) {
    info!(
        save_point = %config.hotkeys.save_point,
        toggle_freeze = %config.hotkeys.toggle_freeze,
        repeat_key = %config.freeze.repeat_key,
        repeat_interval_ms = config.freeze.repeat_interval_ms,
        first_person_mode = config.general.first_person_mode,
        "hotkey configuration"
    );
}
