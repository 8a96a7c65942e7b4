//! Application layer.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure data and rules in `rofreeze-core`) and the infrastructure (OS hooks,
//! files).  Code here:
//!
//! - **Orchestrates** the freeze: which adapter is called, in which order,
//!   and what is undone when a step fails.
//! - **Depends on abstractions** (the adapter traits) rather than on Win32,
//!   so every transition is unit-testable on any OS.
//!
//! # Sub-modules
//!
//! - **`freeze_control`** – The `FreezeSession` state machine driven by the
//!   two hotkeys.
//!
//! - **`repeat_press`** – The background loop that taps the repeat key while
//!   frozen.

pub mod freeze_control;
pub mod repeat_press;
