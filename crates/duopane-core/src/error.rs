//! Error types for `duopane-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`. Callers that only need to
//! branch on the category of a failure use [`CoreError::kind`].

use std::fmt;
use std::path::{Path, PathBuf};

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to display
/// a meaningful message or take corrective action.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A directory was required but the path is missing or points elsewhere.
    #[error("not a directory: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A file or directory name is invalid (empty, contains path separators, etc.).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Source and destination disagree on being a directory.
    #[error("type mismatch: cannot place {} over {}", src.display(), dest.display())]
    TypeMismatch { src: PathBuf, dest: PathBuf },

    /// Something already occupies the destination path.
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// A directory still has entries and no recursive delete was authorised.
    #[error("directory not empty: {}", .0.display())]
    NotEmpty(PathBuf),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// Writing a zip archive failed.
    #[error("archive error: {0}")]
    Archive(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `duopane-core`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Coarse classification of a [`CoreError`], reported in operation outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidPath,
    TypeMismatch,
    AlreadyExists,
    PermissionDenied,
    NotEmpty,
    /// Native error message for anything without a dedicated kind.
    Other(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => f.write_str("not found"),
            ErrorKind::InvalidPath => f.write_str("invalid path"),
            ErrorKind::TypeMismatch => f.write_str("type mismatch"),
            ErrorKind::AlreadyExists => f.write_str("already exists"),
            ErrorKind::PermissionDenied => f.write_str("permission denied"),
            ErrorKind::NotEmpty => f.write_str("directory not empty"),
            ErrorKind::Other(msg) => f.write_str(msg),
        }
    }
}

impl CoreError {
    /// Converts an I/O error raised while touching `path` into a specific variant.
    pub fn from_io(err: std::io::Error, path: &Path) -> Self {
        use std::io::ErrorKind as Io;
        match err.kind() {
            Io::NotFound => CoreError::NotFound(path.to_path_buf()),
            Io::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            Io::AlreadyExists => CoreError::AlreadyExists(path.to_path_buf()),
            Io::NotADirectory => CoreError::InvalidPath(path.to_path_buf()),
            Io::DirectoryNotEmpty => CoreError::NotEmpty(path.to_path_buf()),
            _ => CoreError::Io(err),
        }
    }

    /// Returns the category used in [`crate::fs::engine::OperationOutcome::Failure`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound(_) => ErrorKind::NotFound,
            CoreError::InvalidPath(_) | CoreError::InvalidName(_) => ErrorKind::InvalidPath,
            CoreError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CoreError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            CoreError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            CoreError::NotEmpty(_) => ErrorKind::NotEmpty,
            CoreError::ConfigParse(msg) | CoreError::Archive(msg) => {
                ErrorKind::Other(msg.clone())
            }
            CoreError::Io(e) => ErrorKind::Other(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("/missing/file"));
        assert_eq!(err.to_string(), "path not found: /missing/file");
    }

    #[test]
    fn permission_denied_displays_path() {
        let err = CoreError::PermissionDenied(PathBuf::from("/secret"));
        assert_eq!(err.to_string(), "permission denied: /secret");
    }

    #[test]
    fn invalid_path_displays_path() {
        let err = CoreError::InvalidPath(PathBuf::from("/some/file.txt"));
        assert_eq!(err.to_string(), "not a directory: /some/file.txt");
    }

    #[test]
    fn type_mismatch_displays_both_paths() {
        let err = CoreError::TypeMismatch {
            src: PathBuf::from("/a/dir"),
            dest: PathBuf::from("/b/file"),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch: cannot place /a/dir over /b/file"
        );
    }

    #[test]
    fn from_io_classifies_common_kinds() {
        let path = Path::new("/x");
        let cases = [
            (std::io::ErrorKind::NotFound, ErrorKind::NotFound),
            (std::io::ErrorKind::PermissionDenied, ErrorKind::PermissionDenied),
            (std::io::ErrorKind::AlreadyExists, ErrorKind::AlreadyExists),
        ];
        for (io_kind, expected) in cases {
            let err = CoreError::from_io(std::io::Error::new(io_kind, "boom"), path);
            assert_eq!(err.kind(), expected);
        }
    }

    #[test]
    fn from_io_keeps_unclassified_errors() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Interrupted, "gone");
        let err = CoreError::from_io(io_err, Path::new("/x"));
        assert!(matches!(err, CoreError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Other("gone".to_string()));
    }

    #[test]
    fn invalid_name_maps_to_invalid_path_kind() {
        let err = CoreError::InvalidName("bad/name".to_string());
        assert_eq!(err.to_string(), "invalid name: bad/name");
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }

    #[test]
    fn config_parse_maps_to_other() {
        let err = CoreError::ConfigParse("unexpected token".to_string());
        assert_eq!(err.to_string(), "config parse error: unexpected token");
        assert_eq!(err.kind(), ErrorKind::Other("unexpected token".to_string()));
    }

    #[test]
    fn io_error_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "gone");
        let core_err: CoreError = io_err.into();
        assert!(matches!(core_err, CoreError::Io(_)));
        assert!(core_err.to_string().contains("gone"));
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::NotEmpty.to_string(), "directory not empty");
        assert_eq!(ErrorKind::Other("os error 5".into()).to_string(), "os error 5");
    }
}
