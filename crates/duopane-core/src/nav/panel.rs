//! State of one browsing pane.
//!
//! A [`PaneState`] holds the directory a pane shows, which listing columns
//! are visible and whether the pane's tree is hidden. Listings are never
//! cached: [`PaneState::list_entries`] reads the directory on every call.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;
use crate::fs::listing::read_directory;

/// Which of the two panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaneId {
    Left,
    Right,
}

impl PaneId {
    pub fn other(self) -> Self {
        match self {
            PaneId::Left => PaneId::Right,
            PaneId::Right => PaneId::Left,
        }
    }
}

/// A listing column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Name,
    Kind,
    Size,
    DateModified,
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 4] = [
        ColumnKind::Name,
        ColumnKind::Kind,
        ColumnKind::Size,
        ColumnKind::DateModified,
    ];

    /// Fixed position of the column in the listing (0–3).
    pub fn index(self) -> usize {
        match self {
            ColumnKind::Name => 0,
            ColumnKind::Kind => 1,
            ColumnKind::Size => 2,
            ColumnKind::DateModified => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Name => "Name",
            ColumnKind::Kind => "Kind",
            ColumnKind::Size => "Size",
            ColumnKind::DateModified => "Date Modified",
        }
    }
}

pub type ColumnSet = BTreeSet<ColumnKind>;

/// One pane: current directory, visible columns and tree visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneState {
    path: PathBuf,
    visible_columns: ColumnSet,
    hidden: bool,
}

impl PaneState {
    /// A visible pane at `path` showing only the Name column.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            visible_columns: ColumnSet::from([ColumnKind::Name]),
            hidden: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sets the path without checking it. Used when restoring from config.
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = path;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Flips tree visibility and returns the new hidden state.
    pub fn toggle_hidden(&mut self) -> bool {
        self.hidden = !self.hidden;
        self.hidden
    }

    pub fn visible_columns(&self) -> &ColumnSet {
        &self.visible_columns
    }

    pub fn is_column_visible(&self, kind: ColumnKind) -> bool {
        self.visible_columns.contains(&kind)
    }

    /// Replaces the visible set. Name is always kept.
    pub fn set_visible_columns(&mut self, columns: impl IntoIterator<Item = ColumnKind>) {
        self.visible_columns = columns.into_iter().collect();
        self.visible_columns.insert(ColumnKind::Name);
    }

    /// Flips `kind` in the visible set. Toggling Name does nothing.
    pub fn toggle_column(&mut self, kind: ColumnKind) -> &ColumnSet {
        if kind != ColumnKind::Name && !self.visible_columns.remove(&kind) {
            self.visible_columns.insert(kind);
        }
        &self.visible_columns
    }

    /// [`toggle_column`](Self::toggle_column) by column index.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidName`] if `index` is not 0–3.
    pub fn toggle_column_index(&mut self, index: usize) -> CoreResult<&ColumnSet> {
        let kind = ColumnKind::from_index(index)
            .ok_or_else(|| CoreError::InvalidName(format!("column index {index}")))?;
        Ok(self.toggle_column(kind))
    }

    /// Switches to `path` and returns its listing.
    ///
    /// Relative paths are resolved against the process working directory.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] if `path` is not an existing directory; the
    /// pane keeps its previous path.
    pub fn navigate(&mut self, path: &Path) -> CoreResult<Vec<FileEntry>> {
        let target = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        if !target.is_dir() {
            return Err(CoreError::InvalidPath(target));
        }
        let entries = read_directory(&target)?;
        tracing::debug!("pane navigated to {}", target.display());
        self.path = target;
        Ok(entries)
    }

    /// Moves to the parent directory. At the root nothing changes and `None` is returned.
    pub fn go_up(&mut self) -> CoreResult<Option<Vec<FileEntry>>> {
        match self.path.parent().map(Path::to_path_buf) {
            Some(parent) => self.navigate(&parent).map(Some),
            None => Ok(None),
        }
    }

    /// Moves to `$HOME`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPath`] if `HOME` is unset or not a directory.
    pub fn go_home(&mut self) -> CoreResult<Vec<FileEntry>> {
        let home = home_dir().ok_or_else(|| CoreError::InvalidPath(PathBuf::from("~")))?;
        self.navigate(&home)
    }

    /// Reads the current directory, directories first then by name.
    pub fn list_entries(&self) -> CoreResult<Vec<FileEntry>> {
        read_directory(&self.path)
    }
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
