//! Destination conflict detection and the confirmation seam.
//!
//! Every operation that writes to a destination path asks [`check`] first.
//! An occupied destination is never overwritten on the core's own
//! authority: the host answers a [`Prompt`] through [`Confirm`], and only a
//! positive answer leads to [`replace`].

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::EntryKind;

/// How an incoming entry collides with what already sits at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    FileOverFile,
    FileOverDirectory,
    DirectoryOverFile,
    DirectoryOverDirectory,
}

impl ConflictKind {
    fn classify(incoming: EntryKind, existing: EntryKind) -> Self {
        match (incoming == EntryKind::Dir, existing == EntryKind::Dir) {
            (false, false) => ConflictKind::FileOverFile,
            (false, true) => ConflictKind::FileOverDirectory,
            (true, false) => ConflictKind::DirectoryOverFile,
            (true, true) => ConflictKind::DirectoryOverDirectory,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ConflictKind::FileOverFile => "a file with this name already exists",
            ConflictKind::FileOverDirectory => "a folder with this name already exists",
            ConflictKind::DirectoryOverFile => "a file already occupies this folder name",
            ConflictKind::DirectoryOverDirectory => "a folder with this name already exists",
        }
    }
}

/// Result of a destination check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Clear,
    RequiresConfirmation(ConflictKind),
}

/// Classifies the destination for an incoming entry of kind `incoming`.
///
/// Symlinks (dangling ones included) occupy their path like files do.
pub fn check(destination: &Path, incoming: EntryKind) -> CoreResult<Resolution> {
    match std::fs::symlink_metadata(destination) {
        Ok(meta) => {
            let existing = EntryKind::from_metadata(&meta);
            Ok(Resolution::RequiresConfirmation(ConflictKind::classify(
                incoming, existing,
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Resolution::Clear),
        Err(e) => Err(CoreError::from_io(e, destination)),
    }
}

/// Removes whatever occupies `destination`, recursively for directories.
pub fn replace(destination: &Path) -> CoreResult<()> {
    let meta =
        std::fs::symlink_metadata(destination).map_err(|e| CoreError::from_io(e, destination))?;
    let result = if meta.is_dir() {
        std::fs::remove_dir_all(destination)
    } else {
        std::fs::remove_file(destination)
    };
    result.map_err(|e| CoreError::from_io(e, destination))?;
    tracing::info!("removed pre-existing {}", destination.display());
    Ok(())
}

/// The question put to the host before a destructive step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NonEmptyDirectoryDelete,
    DestinationExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub path: PathBuf,
    pub conflict: Option<ConflictKind>,
}

impl Prompt {
    pub fn non_empty_delete(path: &Path) -> Self {
        Self {
            kind: PromptKind::NonEmptyDirectoryDelete,
            path: path.to_path_buf(),
            conflict: None,
        }
    }

    pub fn destination_exists(path: &Path, conflict: ConflictKind) -> Self {
        Self {
            kind: PromptKind::DestinationExists,
            path: path.to_path_buf(),
            conflict: Some(conflict),
        }
    }

    /// Text suitable for a yes/no dialog.
    pub fn message(&self) -> String {
        match self.kind {
            PromptKind::NonEmptyDirectoryDelete => format!(
                "Folder {} is not empty - do you want to continue with delete?",
                self.path.display()
            ),
            PromptKind::DestinationExists => format!(
                "{}: {} - delete existing and continue?",
                self.path.display(),
                self.conflict
                    .map(ConflictKind::describe)
                    .unwrap_or("destination already exists"),
            ),
        }
    }
}

/// Host-side answer to a [`Prompt`]. The core blocks on it and never assumes a default.
pub trait Confirm {
    fn confirm(&mut self, prompt: &Prompt) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Prompt) -> bool,
{
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn check_empty_destination_is_clear() {
        let tmp = TempDir::new().unwrap();
        let res = check(&tmp.path().join("free"), EntryKind::File).unwrap();
        assert_eq!(res, Resolution::Clear);
    }

    #[test]
    fn check_reports_each_mismatch_kind() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f");
        let dir = tmp.path().join("d");
        fs::write(&file, "").unwrap();
        fs::create_dir(&dir).unwrap();

        let cases = [
            (&file, EntryKind::File, ConflictKind::FileOverFile),
            (&dir, EntryKind::File, ConflictKind::FileOverDirectory),
            (&file, EntryKind::Dir, ConflictKind::DirectoryOverFile),
            (&dir, EntryKind::Dir, ConflictKind::DirectoryOverDirectory),
        ];
        for (dest, incoming, expected) in cases {
            assert_eq!(
                check(dest, incoming).unwrap(),
                Resolution::RequiresConfirmation(expected)
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn check_treats_dangling_symlink_as_occupied() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("dangling");
        std::os::unix::fs::symlink(tmp.path().join("gone"), &link).unwrap();

        let res = check(&link, EntryKind::File).unwrap();
        assert_eq!(res, Resolution::RequiresConfirmation(ConflictKind::FileOverFile));
    }

    #[test]
    fn replace_removes_non_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("full");
        fs::create_dir_all(dir.join("inner")).unwrap();
        fs::write(dir.join("inner").join("x"), "x").unwrap();

        replace(&dir).unwrap();

        assert!(!dir.exists());
    }

    #[test]
    fn replace_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = replace(&tmp.path().join("nothing")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn closures_act_as_confirmers() {
        let mut asked = Vec::new();
        let mut confirmer = |p: &Prompt| {
            asked.push(p.kind);
            false
        };
        let prompt = Prompt::non_empty_delete(Path::new("/tmp/x"));
        assert!(!confirmer.confirm(&prompt));
        assert_eq!(asked, vec![PromptKind::NonEmptyDirectoryDelete]);
    }

    #[test]
    fn prompt_message_mentions_path() {
        let prompt = Prompt::destination_exists(Path::new("/a/b"), ConflictKind::FileOverFile);
        let msg = prompt.message();
        assert!(msg.contains("/a/b"));
        assert!(msg.contains("already exists"));
    }
}
