//! Messages exchanged between the UI and the core.
//!
//! The UI turns a dialog into a [`Command`] and hands it to
//! [`crate::Session::dispatch`]. The session answers with an
//! [`crate::OperationOutcome`] and queues [`Event`]s describing what to log
//! and which panes to re-read.

use std::fmt;
use std::path::PathBuf;

use crate::action::OperationKind;
use crate::fs::permissions::PermissionTriple;
use crate::nav::panel::PaneId;

/// A user-requested operation together with the fields of its dialog.
///
/// Commands flow **UI → Core**. Optional fields fall back to values derived
/// from the active selection and the pane layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move the selection; the destination defaults to the other pane.
    Move {
        destination_dir: Option<PathBuf>,
        new_name: Option<String>,
    },
    /// Copy the selected file; the destination defaults to the other pane.
    Copy {
        destination_dir: Option<PathBuf>,
        copy_name: Option<String>,
    },
    /// Rename the selection to the given path.
    Rename { new_path: PathBuf },
    Delete,
    /// Create an empty file; the directory defaults to the selection's pane.
    CreateFile {
        dir: Option<PathBuf>,
        name: String,
    },
    /// Create an empty folder; the directory defaults to the selection's pane.
    CreateDirectory {
        dir: Option<PathBuf>,
        name: String,
    },
    ChangePermissions {
        file: PermissionTriple,
        dir: PermissionTriple,
        recursive: bool,
    },
    Archive,
}

impl Command {
    pub fn kind(&self) -> OperationKind {
        match self {
            Command::Move { .. } => OperationKind::Move,
            Command::Copy { .. } => OperationKind::Copy,
            Command::Rename { .. } => OperationKind::Rename,
            Command::Delete => OperationKind::Delete,
            Command::CreateFile { .. } => OperationKind::CreateFile,
            Command::CreateDirectory { .. } => OperationKind::CreateDirectory,
            Command::ChangePermissions { .. } => OperationKind::ChangePermissions,
            Command::Archive => OperationKind::Archive,
        }
    }
}

/// Severity of a [`LogEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        })
    }
}

/// A structured log line for the host's log view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
}

impl LogEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
        }
    }

    /// Mirrors the event into `tracing` at the matching level.
    pub fn emit(&self) {
        match self.level {
            LogLevel::Info => tracing::info!("{}", self.message),
            LogLevel::Warn => tracing::warn!("{}", self.message),
            LogLevel::Error => tracing::error!("{}", self.message),
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.message)
    }
}

/// A notification the core sends back to the UI.
///
/// Events flow **Core → UI**.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Something worth showing in the log view.
    Log(LogEvent),
    /// The pane's directory changed on disk and its listing should be re-read.
    RefreshPane(PaneId),
}
