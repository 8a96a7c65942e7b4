//! Domain layer: pure data types and rules with no OS dependencies.
//!
//! - **`geometry`** – screen-space `Point` and the confinement `ClipRect`.
//! - **`hotkey`**   – hotkey bindings and the edge-triggered `HotkeyFilter`.
//! - **`session`**  – the three-state `FreezeState` and the `Status`
//!   notifications emitted on every transition.

pub mod geometry;
pub mod hotkey;
pub mod session;
