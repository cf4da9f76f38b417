//! Configuration management for duopane.
//!
//! Pane state and appearance ([`settings::Config`]) are stored as a TOML
//! file and loaded at startup.

pub mod settings;
