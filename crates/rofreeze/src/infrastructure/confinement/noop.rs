//! Inert confinement for platforms without a cursor clip API.

use rofreeze_core::ClipRect;

use super::{ConfinementError, CursorConfinement};

/// Never reports a clip and accepts every release/restore.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConfinement;

impl CursorConfinement for NoopConfinement {
    fn capture_current_clip(&self) -> Result<Option<ClipRect>, ConfinementError> {
        Ok(None)
    }

    fn release_clip(&self) -> Result<(), ConfinementError> {
        Ok(())
    }

    fn restore_clip(&self, _rect: ClipRect) -> Result<(), ConfinementError> {
        Ok(())
    }
}
