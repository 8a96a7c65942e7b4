//! Infrastructure layer.
//!
//! Contains OS-facing adapters: global input hooks, cursor confinement,
//! input injection, file-system storage, and the presentation bridge.
//!
//! The adapters for the current platform are picked once, in
//! [`platform_adapters`]; nothing else in the crate branches on the OS.

use std::sync::Arc;

use crate::application::freeze_control::PlatformAdapters;

pub mod call_log;
pub mod confinement;
pub mod input_hook;
pub mod input_injection;
pub mod storage;
pub mod ui_bridge;

/// Real adapters on Windows.
#[cfg(target_os = "windows")]
pub fn platform_adapters() -> PlatformAdapters {
    PlatformAdapters {
        hooks: Arc::new(input_hook::windows::WindowsInputHooks::new()),
        confinement: Arc::new(confinement::windows::WindowsConfinement::new()),
        injector: Arc::new(input_injection::windows::WindowsInjector::new()),
    }
}

/// Inert adapters elsewhere: hooks report unavailable, confinement is a no-op.
#[cfg(not(target_os = "windows"))]
pub fn platform_adapters() -> PlatformAdapters {
    PlatformAdapters {
        hooks: Arc::new(input_hook::unsupported::UnsupportedInputHooks::for_current_os()),
        confinement: Arc::new(confinement::noop::NoopConfinement),
        injector: Arc::new(input_injection::unsupported::UnsupportedInjector),
    }
}
