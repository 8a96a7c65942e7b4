//! Windows input injection via `SetCursorPos` and `SendInput`.
//!
//! Key taps are sent with both the virtual-key code and its scan code.  Many
//! games read the scan code only (DirectInput / raw input), so a VK-only
//! `KEYBDINPUT` would be invisible to them.

#![cfg(target_os = "windows")]

use rofreeze_core::{Point, VirtualKey};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    MapVirtualKeyW, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, KEYEVENTF_SCANCODE, MAPVK_VK_TO_VSC, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use super::{InjectionError, InputInjector};

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsInjector;

impl WindowsInjector {
    pub fn new() -> Self {
        Self
    }
}

fn key_input(vk: VirtualKey, scan: u16, key_up: bool) -> INPUT {
    let mut flags: KEYBD_EVENT_FLAGS = KEYEVENTF_SCANCODE;
    if vk.is_extended() {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(vk.code() as u16),
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

impl InputInjector for WindowsInjector {
    fn cursor_position(&self) -> Result<Point, InjectionError> {
        let mut pt = POINT::default();
        // SAFETY: pt is a valid, writable POINT.
        unsafe { GetCursorPos(&mut pt) }.map_err(|e| InjectionError::Platform(e.to_string()))?;
        Ok(Point::new(pt.x, pt.y))
    }

    fn move_cursor(&self, point: Point) -> Result<(), InjectionError> {
        // SAFETY: SetCursorPos takes plain integers.
        unsafe { SetCursorPos(point.x, point.y) }
            .map_err(|e| InjectionError::Platform(e.to_string()))
    }

    fn tap_key(&self, key: VirtualKey) -> Result<(), InjectionError> {
        // SAFETY: MapVirtualKeyW is a pure table lookup.
        let scan = unsafe { MapVirtualKeyW(key.code() as u32, MAPVK_VK_TO_VSC) } as u16;
        let inputs = [key_input(key, scan, false), key_input(key, scan, true)];

        // SAFETY: inputs holds two fully initialised KEYBDINPUT structures.
        let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            return Err(InjectionError::Platform(format!(
                "SendInput injected {sent} of {} events: {}",
                inputs.len(),
                std::io::Error::last_os_error()
            )));
        }
        Ok(())
    }
}
