//! duopane core library: UI-agnostic logic for a dual-pane file manager.
//!
//! `duopane-core` owns the state of the two panes and the active selection,
//! and performs every filesystem mutation the user can ask for. A frontend
//! renders [`PaneState`] listings, records clicks with [`Session::select`],
//! turns dialogs into [`Command`]s and answers confirmation [`Prompt`]s
//! through a [`Confirm`] implementation.
//!
//! # Modules
//!
//! - [`fs`]: directory listings, the operation engine, conflict handling, permission bits, zip archives.
//! - [`nav`]: per-pane state ([`PaneState`]) and column visibility.
//! - [`session`]: both panes plus the selection; resolves and dispatches commands.
//! - [`config`]: TOML-persisted pane layout and appearance.
//! - [`action`]: catalogue of user-triggerable operations.
//! - [`event`]: command and event types for UI ↔ Core communication.
//! - [`error`]: unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod action;
pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod nav;
pub mod session;

pub use action::{OperationDescriptor, OperationKind};
pub use config::settings::{AppearanceConfig, Config, PaneConfig};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use event::{Command, Event, LogEvent, LogLevel};
pub use fs::conflict::{Confirm, ConflictKind, Prompt, PromptKind, Resolution};
pub use fs::engine::{execute, OperationOutcome, OperationRequest};
pub use fs::entry::{EntryKind, FileEntry};
pub use fs::listing::read_directory;
pub use fs::permissions::{read_mode, ModeSnapshot, PermissionBits, PermissionTriple};
pub use nav::panel::{ColumnKind, ColumnSet, PaneId, PaneState};
pub use session::{Selection, Session, TransferDefaults};

/// Normalises a string to NFC (composed) form.
///
/// macOS stores filenames in NFD (decomposed), which makes accented and
/// Hangul names compare unequal to what the user typed. This helper
/// re-composes them.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nfc_composes_decomposed_input() {
        let decomposed = "e\u{0301}";
        assert_eq!(nfc_string(decomposed), "\u{00e9}");
    }

    #[test]
    fn nfc_leaves_ascii_alone() {
        assert_eq!(nfc_string("plain.txt"), "plain.txt");
    }
}
