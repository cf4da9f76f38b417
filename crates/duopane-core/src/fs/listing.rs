//! Directory reading.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;

/// Reads the immediate contents of a directory.
///
/// Every call hits the filesystem; nothing is cached. Entries come back
/// directories first, then by case-insensitive name, with the exact name as
/// a tie-break so two reads of an unchanged directory always agree.
/// Entries that vanish or cannot be stat'ed between `read_dir` and
/// `symlink_metadata` are skipped.
///
/// # Errors
///
/// - [`CoreError::NotFound`]: the path does not exist.
/// - [`CoreError::InvalidPath`]: the path is not a directory.
/// - [`CoreError::PermissionDenied`]: read access is denied.
/// - [`CoreError::Io`]: any other I/O error.
pub fn read_directory(path: &Path) -> CoreResult<Vec<FileEntry>> {
    let meta = std::fs::metadata(path).map_err(|e| CoreError::from_io(e, path))?;
    if !meta.is_dir() {
        return Err(CoreError::InvalidPath(path.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(path).map_err(|e| CoreError::from_io(e, path))?;

    let mut entries: Vec<FileEntry> = read_dir
        .filter_map(Result::ok)
        .filter_map(|dir_entry| {
            let entry_path = dir_entry.path();
            let metadata = std::fs::symlink_metadata(&entry_path).ok()?;
            Some(FileEntry::new(entry_path, &metadata))
        })
        .collect();

    entries.sort_by(compare_entries);
    Ok(entries)
}

fn compare_entries(a: &FileEntry, b: &FileEntry) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.name().cmp(b.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn read_directory_returns_single_level() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("subdir")).unwrap();
        fs::write(tmp.path().join("subdir").join("nested.txt"), "").unwrap();
        fs::write(tmp.path().join("top.txt"), "").unwrap();

        let entries = read_directory(tmp.path()).unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["subdir", "top.txt"]);
    }

    #[test]
    fn read_directory_orders_dirs_first_then_name() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "").unwrap();
        fs::write(tmp.path().join("A.txt"), "").unwrap();
        fs::write(tmp.path().join("a.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("zdir")).unwrap();

        let entries = read_directory(tmp.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();

        assert_eq!(names, vec!["zdir", "A.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn read_directory_is_stable_between_calls() {
        let tmp = TempDir::new().unwrap();
        for name in ["x", "Y", "z", "y"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }

        let first = read_directory(tmp.path()).unwrap();
        let second = read_directory(tmp.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn read_directory_reflects_new_files() {
        let tmp = TempDir::new().unwrap();
        assert!(read_directory(tmp.path()).unwrap().is_empty());

        fs::write(tmp.path().join("late.txt"), "").unwrap();

        assert_eq!(read_directory(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn read_directory_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = read_directory(&tmp.path().join("missing"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn read_directory_on_file_returns_invalid_path() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("not_a_dir.txt");
        fs::write(&file_path, "content").unwrap();

        let result = read_directory(&file_path);
        assert!(matches!(result.unwrap_err(), CoreError::InvalidPath(_)));
    }
}
