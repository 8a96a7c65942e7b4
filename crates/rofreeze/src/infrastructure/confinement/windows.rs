//! Windows cursor confinement via `GetClipCursor` / `ClipCursor`.
//!
//! # Safety
//!
//! `unsafe` is used only for the Win32 calls; each block has a `// SAFETY:` note.

#![cfg(target_os = "windows")]

use rofreeze_core::ClipRect;
use tracing::debug;
use windows::Win32::Foundation::RECT;
use windows::Win32::UI::WindowsAndMessaging::{
    ClipCursor, GetClipCursor, GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN,
    SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN,
};

use super::{ConfinementError, ConfinementOp, CursorConfinement};

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsConfinement;

impl WindowsConfinement {
    pub fn new() -> Self {
        Self
    }
}

/// The rectangle spanning all monitors.  `GetClipCursor` reports this (or
/// something larger) when nothing is confining the cursor.
fn virtual_screen() -> ClipRect {
    // SAFETY: GetSystemMetrics has no preconditions.
    unsafe {
        ClipRect::from_origin_size(
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
            GetSystemMetrics(SM_CXVIRTUALSCREEN),
            GetSystemMetrics(SM_CYVIRTUALSCREEN),
        )
    }
}

impl CursorConfinement for WindowsConfinement {
    fn capture_current_clip(&self) -> Result<Option<ClipRect>, ConfinementError> {
        let mut rect = RECT::default();
        // SAFETY: rect is a valid, writable RECT.
        unsafe { GetClipCursor(&mut rect) }
            .map_err(|e| ConfinementError::failed(ConfinementOp::Capture, e.to_string()))?;

        let clip = ClipRect::new(rect.left, rect.top, rect.right, rect.bottom);
        if clip.covers(&virtual_screen()) {
            debug!(%clip, "cursor is not confined");
            return Ok(None);
        }
        debug!(%clip, "captured cursor clip");
        Ok(Some(clip))
    }

    fn release_clip(&self) -> Result<(), ConfinementError> {
        // SAFETY: Passing no rectangle removes the clip.
        unsafe { ClipCursor(None) }
            .map_err(|e| ConfinementError::failed(ConfinementOp::Release, e.to_string()))
    }

    fn restore_clip(&self, rect: ClipRect) -> Result<(), ConfinementError> {
        let raw = RECT {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        };
        // SAFETY: raw outlives the call; ClipCursor copies the rectangle.
        unsafe { ClipCursor(Some(&raw as *const RECT)) }
            .map_err(|e| ConfinementError::failed(ConfinementOp::Restore, e.to_string()))
    }
}
