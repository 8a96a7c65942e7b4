//! Injector for platforms without a supported injection API.

use rofreeze_core::{Point, VirtualKey};

use super::{InjectionError, InputInjector};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedInjector;

impl InputInjector for UnsupportedInjector {
    fn cursor_position(&self) -> Result<Point, InjectionError> {
        Err(InjectionError::Unsupported)
    }

    fn move_cursor(&self, _point: Point) -> Result<(), InjectionError> {
        Err(InjectionError::Unsupported)
    }

    fn tap_key(&self, _key: VirtualKey) -> Result<(), InjectionError> {
        Err(InjectionError::Unsupported)
    }
}
