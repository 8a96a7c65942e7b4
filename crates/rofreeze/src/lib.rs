//! RoFreeze library crate.
//!
//! Exposes the application and infrastructure layers so the binary and the
//! integration tests in `tests/` share one implementation.
//!
//! # Layers
//!
//! - **`application`** – The freeze state machine and the repeat-press task.
//! - **`infrastructure`** – Windows hooks, cursor confinement, input
//!   injection, TOML config storage and the presentation bridge.

pub mod application;
pub mod infrastructure;
