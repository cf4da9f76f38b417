//! File entry representation.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What a listing entry is on disk. Symlinks are reported as such, never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
}

impl EntryKind {
    /// Classifies metadata obtained with `symlink_metadata`.
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        let ft = metadata.file_type();
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        }
    }

    /// Short label for the "Kind" column.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Dir => "folder",
            EntryKind::Symlink => "alias",
        }
    }
}

/// A single file or directory entry.
///
/// `FileEntry` is immutable. Directory sizes are reported as `0`.
///
/// # Examples
///
/// ```no_run
/// use duopane_core::FileEntry;
/// use std::fs;
///
/// let metadata = fs::symlink_metadata("Cargo.toml").unwrap();
/// let entry = FileEntry::new("Cargo.toml".into(), &metadata);
/// assert_eq!(entry.name(), "Cargo.toml");
/// assert!(!entry.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: String,
    kind: EntryKind,
    size: u64,
    modified: Option<SystemTime>,
}

impl FileEntry {
    /// Creates a new `FileEntry` from a path and its (non-following) metadata.
    ///
    /// The name is normalised to NFC so decomposed names from macOS display correctly.
    pub fn new(path: PathBuf, metadata: &std::fs::Metadata) -> Self {
        let name = path
            .file_name()
            .map(|n| crate::nfc_string(&n.to_string_lossy()))
            .unwrap_or_default();
        let kind = EntryKind::from_metadata(metadata);

        Self {
            path,
            name,
            kind,
            size: if kind == EntryKind::Dir { 0 } else { metadata.len() },
            modified: metadata.modified().ok(),
        }
    }

    /// Returns the full path of this entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file or directory name (last component of the path).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns the file size in bytes. Always `0` for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the last-modified time, if available.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn file_entry_from_regular_file() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("test.txt");
        fs::write(&file_path, "hello").unwrap();

        let metadata = fs::symlink_metadata(&file_path).unwrap();
        let entry = FileEntry::new(file_path.clone(), &metadata);

        assert_eq!(entry.name(), "test.txt");
        assert_eq!(entry.size(), 5);
        assert_eq!(entry.kind(), EntryKind::File);
        assert_eq!(entry.path(), file_path);
        assert!(entry.modified().is_some());
    }

    #[test]
    fn file_entry_dir_has_zero_size() {
        let tmp = TempDir::new().unwrap();
        let dir_path = tmp.path().join("mydir");
        fs::create_dir(&dir_path).unwrap();
        fs::write(dir_path.join("a.txt"), "data").unwrap();

        let metadata = fs::symlink_metadata(&dir_path).unwrap();
        let entry = FileEntry::new(dir_path, &metadata);

        assert!(entry.is_dir());
        assert_eq!(entry.size(), 0);
        assert_eq!(entry.kind().label(), "folder");
    }

    #[cfg(unix)]
    #[test]
    fn file_entry_symlink_is_not_followed() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("target");
        fs::create_dir(&target).unwrap();

        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let metadata = fs::symlink_metadata(&link).unwrap();
        let entry = FileEntry::new(link, &metadata);

        assert!(entry.is_symlink());
        assert!(!entry.is_dir());
        assert_eq!(entry.name(), "link");
    }

    #[test]
    fn file_entry_unicode_name() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("한글파일.txt");
        fs::write(&file_path, "내용").unwrap();

        let metadata = fs::symlink_metadata(&file_path).unwrap();
        let entry = FileEntry::new(file_path, &metadata);

        assert_eq!(entry.name(), "한글파일.txt");
    }
}
