//! # rofreeze-core
//!
//! Shared, OS-free foundation for RoFreeze: geometry types, the freeze
//! state and status vocabulary, the key-name table, and the edge-triggered
//! hotkey filter.
//!
//! # Architecture overview (for beginners)
//!
//! RoFreeze pins the cursor to a saved point and keeps tapping a key while a
//! "freeze" is active, all driven by two global hotkeys.  The part that
//! decides *what* happens lives in the `rofreeze` crate's application layer;
//! the part that talks to Windows lives in its infrastructure layer.  This
//! crate holds everything both sides need to agree on:
//!
//! - **`domain`** – Plain data: `Point`, `ClipRect`, `FreezeState`, the
//!   `Status` notifications, and the `HotkeyFilter` that turns raw key-down /
//!   key-up events into exactly one action per physical press.
//!
//! - **`keymap`** – Translation between human-readable key names (`"Q"`,
//!   `"F3"`, `"Space"`) used in the config file and Windows Virtual Key codes
//!   used by the hook and injection APIs.
//!
//! Nothing here touches the OS, so every type is unit-testable on any platform.

pub mod domain;
pub mod keymap;

pub use domain::geometry::{ClipRect, Point};
pub use domain::hotkey::{HotkeyAction, HotkeyBindings, HotkeyFilter};
pub use domain::session::{FreezeState, Status};
pub use keymap::{KeyParseError, VirtualKey};
