//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module handles:
//!
//! - Reading the TOML configuration file from the platform-appropriate directory.
//! - Writing the first-person flag back to disk when the user changes it.
//! - Providing sensible defaults when the file does not exist yet (first run).

pub mod config;
