//! File system layer for duopane.
//!
//! Directory listings ([`listing::read_directory`]) produce
//! [`entry::FileEntry`] values; [`engine`] performs the mutating
//! operations, consulting [`conflict`] before it overwrites anything.
//! [`permissions`] converts between mode bits and rwx flags, and
//! [`archive`] writes zip files.

pub mod archive;
pub mod conflict;
pub mod engine;
pub mod entry;
pub mod listing;
pub mod permissions;

pub use conflict::{Confirm, ConflictKind, Prompt, PromptKind, Resolution};
pub use engine::{execute, OperationOutcome, OperationRequest};
pub use permissions::{ModeSnapshot, PermissionBits, PermissionTriple};
