//! Filesystem mutations requested by the user.
//!
//! Each [`OperationRequest`] variant has its own entry point returning
//! `CoreResult<OperationOutcome>`; [`execute`] dispatches a request, folds
//! errors into [`OperationOutcome::Failure`] and logs the result. The engine
//! keeps no state between calls.
//!
//! Whenever an operation would land on an occupied path it goes through
//! `place_or_confirm`: the write is attempted without clobbering, and an
//! `AlreadyExists` answer triggers a [`Prompt`], a destructive replace of the
//! occupant and exactly one retry.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::action::OperationKind;
use crate::error::{CoreError, CoreResult, ErrorKind};
use crate::event::LogEvent;
use crate::fs::archive;
use crate::fs::conflict::{self, Confirm, Prompt, Resolution};
use crate::fs::entry::EntryKind;
use crate::fs::permissions::{self, PermissionTriple};

/// A fully resolved operation, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    Move {
        source: PathBuf,
        destination_dir: PathBuf,
        new_name: Option<String>,
    },
    Copy {
        source: PathBuf,
        destination_dir: PathBuf,
        copy_name: String,
    },
    Rename {
        source: PathBuf,
        new_path: PathBuf,
    },
    Delete {
        path: PathBuf,
    },
    CreateFile {
        dir: PathBuf,
        name: String,
    },
    CreateDirectory {
        dir: PathBuf,
        name: String,
    },
    ChangePermissions {
        path: PathBuf,
        file: PermissionTriple,
        dir: PermissionTriple,
        recursive: bool,
    },
    Archive {
        path: PathBuf,
    },
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRequest::Move { .. } => OperationKind::Move,
            OperationRequest::Copy { .. } => OperationKind::Copy,
            OperationRequest::Rename { .. } => OperationKind::Rename,
            OperationRequest::Delete { .. } => OperationKind::Delete,
            OperationRequest::CreateFile { .. } => OperationKind::CreateFile,
            OperationRequest::CreateDirectory { .. } => OperationKind::CreateDirectory,
            OperationRequest::ChangePermissions { .. } => OperationKind::ChangePermissions,
            OperationRequest::Archive { .. } => OperationKind::Archive,
        }
    }

    /// The entry the operation reads from, or the directory it creates in.
    pub fn source(&self) -> &Path {
        match self {
            OperationRequest::Move { source, .. }
            | OperationRequest::Copy { source, .. }
            | OperationRequest::Rename { source, .. } => source,
            OperationRequest::Delete { path }
            | OperationRequest::ChangePermissions { path, .. }
            | OperationRequest::Archive { path } => path,
            OperationRequest::CreateFile { dir, .. }
            | OperationRequest::CreateDirectory { dir, .. } => dir,
        }
    }

    /// The path the operation writes, when it writes somewhere other than `source`.
    pub fn destination(&self) -> Option<PathBuf> {
        match self {
            OperationRequest::Move {
                source,
                destination_dir,
                new_name,
            } => {
                let name = match new_name.as_deref().filter(|n| !n.is_empty()) {
                    Some(n) => OsString::from(n),
                    None => source.file_name()?.to_os_string(),
                };
                Some(destination_dir.join(name))
            }
            OperationRequest::Copy {
                destination_dir,
                copy_name,
                ..
            } => Some(destination_dir.join(copy_name)),
            OperationRequest::Rename { new_path, .. } => Some(new_path.clone()),
            OperationRequest::CreateFile { dir, name }
            | OperationRequest::CreateDirectory { dir, name } => Some(dir.join(name)),
            OperationRequest::Archive { path } => archive::archive_path_for(path).ok(),
            OperationRequest::Delete { .. } | OperationRequest::ChangePermissions { .. } => None,
        }
    }
}

impl fmt::Display for OperationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind().name(), self.source().display())?;
        if let Some(dest) = self.destination() {
            write!(f, " -> {}", dest.display())?;
        }
        Ok(())
    }
}

/// What became of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    Success(String),
    /// Nothing was changed, deliberately (declined prompt, no selection, no-op).
    Skipped(String),
    /// The destination was occupied and the user declined to replace it.
    ConflictAborted,
    Failure(ErrorKind, String),
}

impl OperationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success(_))
    }

    /// The log line reported to the host for this outcome of `request`.
    pub fn log_event(&self, request: &OperationRequest) -> LogEvent {
        match self {
            OperationOutcome::Success(msg) => LogEvent::info(msg.clone()),
            OperationOutcome::Skipped(reason) => {
                LogEvent::warn(format!("{request} skipped: {reason}"))
            }
            OperationOutcome::ConflictAborted => {
                LogEvent::warn(format!("{request} aborted: destination already exists"))
            }
            OperationOutcome::Failure(_, msg) => LogEvent::error(format!("{request} failed: {msg}")),
        }
    }
}

impl From<CoreError> for OperationOutcome {
    fn from(err: CoreError) -> Self {
        OperationOutcome::Failure(err.kind(), err.to_string())
    }
}

/// Runs `request`, asking `confirm` before anything destructive, and logs the outcome.
pub fn execute(request: &OperationRequest, confirm: &mut dyn Confirm) -> OperationOutcome {
    let result = match request {
        OperationRequest::Move {
            source,
            destination_dir,
            new_name,
        } => move_entry(source, destination_dir, new_name.as_deref(), confirm),
        OperationRequest::Copy {
            source,
            destination_dir,
            copy_name,
        } => copy_entry(source, destination_dir, copy_name, confirm),
        OperationRequest::Rename { source, new_path } => rename_entry(source, new_path, confirm),
        OperationRequest::Delete { path } => delete_entry(path, confirm),
        OperationRequest::CreateFile { dir, name } => create_file(dir, name, confirm),
        OperationRequest::CreateDirectory { dir, name } => create_directory(dir, name, confirm),
        OperationRequest::ChangePermissions {
            path,
            file,
            dir,
            recursive,
        } => change_permissions(path, *file, *dir, *recursive),
        OperationRequest::Archive { path } => archive_entry(path, confirm),
    };
    let outcome = result.unwrap_or_else(OperationOutcome::from);
    outcome.log_event(request).emit();
    outcome
}

/// Moves `source` into `destination_dir`, optionally under `new_name`.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `source` does not exist.
/// - [`CoreError::InvalidPath`] if `destination_dir` is not a directory,
///   lies inside `source`, or the destination is an ancestor of `source`.
/// - [`CoreError::InvalidName`] if `new_name` is not a plain file name.
/// - [`CoreError::TypeMismatch`] if the OS refuses a dir/non-dir swap.
/// - [`CoreError::PermissionDenied`] on access failure.
pub fn move_entry(
    source: &Path,
    destination_dir: &Path,
    new_name: Option<&str>,
    confirm: &mut dyn Confirm,
) -> CoreResult<OperationOutcome> {
    let incoming = entry_kind(source)?;
    require_dir(destination_dir)?;
    let name = match new_name.filter(|n| !n.is_empty()) {
        Some(n) => validated_name(n)?.to_string(),
        None => base_name(source)?,
    };
    let dest = destination_dir.join(&name);

    if dest == source {
        return Ok(OperationOutcome::Skipped(
            "source and destination are the same".to_string(),
        ));
    }
    if incoming == EntryKind::Dir && dest.starts_with(source) {
        return Err(CoreError::InvalidPath(dest));
    }
    // Replacing an ancestor would delete the source along with it.
    if source.starts_with(&dest) {
        return Err(CoreError::InvalidPath(dest));
    }

    let placed = place_or_confirm(&dest, incoming, confirm, || rename_no_clobber(source, &dest))?;
    if !placed {
        return Ok(OperationOutcome::ConflictAborted);
    }
    Ok(OperationOutcome::Success(format!(
        "Moved {} to {} as {}",
        source.display(),
        destination_dir.display(),
        name
    )))
}

/// Copies the regular file `source` to `destination_dir/copy_name`.
///
/// Directories are refused: only single files are copied.
pub fn copy_entry(
    source: &Path,
    destination_dir: &Path,
    copy_name: &str,
    confirm: &mut dyn Confirm,
) -> CoreResult<OperationOutcome> {
    let meta = std::fs::metadata(source).map_err(|e| CoreError::from_io(e, source))?;
    let name = if copy_name.is_empty() {
        base_name(source)?
    } else {
        validated_name(copy_name)?.to_string()
    };
    let dest = destination_dir.join(&name);

    if meta.is_dir() {
        return Ok(OperationOutcome::Failure(
            ErrorKind::TypeMismatch,
            format!("directory copy is not supported: {}", source.display()),
        ));
    }
    require_dir(destination_dir)?;
    if dest == source {
        return Ok(OperationOutcome::Skipped(
            "source and destination are the same".to_string(),
        ));
    }

    let placed = place_or_confirm(&dest, EntryKind::File, confirm, || {
        ensure_vacant(&dest)?;
        std::fs::copy(source, &dest)
            .map(|_| ())
            .map_err(|e| transfer_error(e, source, &dest))
    })?;
    if !placed {
        return Ok(OperationOutcome::ConflictAborted);
    }
    Ok(OperationOutcome::Success(format!(
        "Copied {} as {}",
        source.display(),
        dest.display()
    )))
}

/// Renames `source` to `new_path`.
///
/// An occupied `new_path` is reported to `confirm`; on approval the
/// occupant is deleted and the rename retried once. A `new_path` that is an
/// ancestor of `source`, or whose last component is not a plain file name,
/// is rejected before anything is touched.
pub fn rename_entry(
    source: &Path,
    new_path: &Path,
    confirm: &mut dyn Confirm,
) -> CoreResult<OperationOutcome> {
    let incoming = entry_kind(source)?;
    match new_path.file_name().and_then(|n| n.to_str()) {
        Some(name) if is_valid_filename(name) => {}
        _ => {
            return Err(CoreError::InvalidName(
                new_path.to_string_lossy().into_owned(),
            ))
        }
    }
    if new_path == source {
        return Ok(OperationOutcome::Skipped(
            "new name is the same as the current one".to_string(),
        ));
    }
    if incoming == EntryKind::Dir && new_path.starts_with(source) {
        return Err(CoreError::InvalidPath(new_path.to_path_buf()));
    }
    if source.starts_with(new_path) {
        return Err(CoreError::InvalidPath(new_path.to_path_buf()));
    }

    let placed = place_or_confirm(new_path, incoming, confirm, || {
        rename_no_clobber(source, new_path)
    })?;
    if !placed {
        return Ok(OperationOutcome::ConflictAborted);
    }
    Ok(OperationOutcome::Success(format!(
        "Renamed {} to {}",
        source.display(),
        new_path.display()
    )))
}

/// Deletes `path`. A non-empty directory is only removed after confirmation.
pub fn delete_entry(path: &Path, confirm: &mut dyn Confirm) -> CoreResult<OperationOutcome> {
    let kind = entry_kind(path)?;

    if kind != EntryKind::Dir {
        std::fs::remove_file(path).map_err(|e| CoreError::from_io(e, path))?;
        return Ok(OperationOutcome::Success(format!("{} removed", path.display())));
    }

    let is_empty = std::fs::read_dir(path)
        .map_err(|e| CoreError::from_io(e, path))?
        .next()
        .is_none();
    if is_empty {
        std::fs::remove_dir(path).map_err(|e| CoreError::from_io(e, path))?;
        return Ok(OperationOutcome::Success(format!("{} removed", path.display())));
    }

    if !confirm.confirm(&Prompt::non_empty_delete(path)) {
        return Ok(OperationOutcome::Skipped(format!(
            "{} is not empty",
            path.display()
        )));
    }
    std::fs::remove_dir_all(path).map_err(|e| CoreError::from_io(e, path))?;
    Ok(OperationOutcome::Success(format!(
        "{} and contents have been removed",
        path.display()
    )))
}

/// Creates an empty file with mode `0644` in `dir`.
pub fn create_file(dir: &Path, name: &str, confirm: &mut dyn Confirm) -> CoreResult<OperationOutcome> {
    let target = creation_target(dir, name)?;
    let placed = place_or_confirm(&target, EntryKind::File, confirm, || {
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| CoreError::from_io(e, &target))?;
        permissions::apply_mode(&target, PermissionTriple::FILE_DEFAULT)
            .map_err(|e| CoreError::from_io(e, &target))
    })?;
    if !placed {
        return Ok(OperationOutcome::Skipped(format!(
            "{} already exists",
            target.display()
        )));
    }
    Ok(OperationOutcome::Success(format!("Created file {}", target.display())))
}

/// Creates an empty directory with mode `0755` in `dir`.
pub fn create_directory(
    dir: &Path,
    name: &str,
    confirm: &mut dyn Confirm,
) -> CoreResult<OperationOutcome> {
    let target = creation_target(dir, name)?;
    let placed = place_or_confirm(&target, EntryKind::Dir, confirm, || {
        std::fs::create_dir(&target).map_err(|e| CoreError::from_io(e, &target))?;
        permissions::apply_mode(&target, PermissionTriple::DIR_DEFAULT)
            .map_err(|e| CoreError::from_io(e, &target))
    })?;
    if !placed {
        return Ok(OperationOutcome::Skipped(format!(
            "{} already exists",
            target.display()
        )));
    }
    Ok(OperationOutcome::Success(format!(
        "Created folder {}",
        target.display()
    )))
}

/// Applies `file` / `dir` modes to `path`, walking the subtree when `recursive`.
///
/// In a recursive walk a failing entry is logged and recorded, and the walk
/// carries on; the outcome is a `Failure` naming every entry that failed.
/// Children are processed before their parent so a restrictive directory
/// mode cannot lock the walk out of its own subtree. Symlinks are left alone.
pub fn change_permissions(
    path: &Path,
    file: PermissionTriple,
    dir: PermissionTriple,
    recursive: bool,
) -> CoreResult<OperationOutcome> {
    change_permissions_with(path, file, dir, recursive, permissions::apply_mode)
}

fn change_permissions_with<F>(
    path: &Path,
    file: PermissionTriple,
    dir: PermissionTriple,
    recursive: bool,
    mut apply: F,
) -> CoreResult<OperationOutcome>
where
    F: FnMut(&Path, PermissionTriple) -> io::Result<()>,
{
    let meta = std::fs::metadata(path).map_err(|e| CoreError::from_io(e, path))?;

    if !meta.is_dir() || !recursive {
        let triple = if meta.is_dir() { dir } else { file };
        apply(path, triple).map_err(|e| CoreError::from_io(e, path))?;
        return Ok(OperationOutcome::Success(format!(
            "Permissions of {} set to {}",
            path.display(),
            triple
        )));
    }

    std::fs::read_dir(path).map_err(|e| CoreError::from_io(e, path))?;

    let mut changed = 0usize;
    let mut failures: Vec<CoreError> = Vec::new();
    for entry in WalkDir::new(path).follow_links(false).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let at = e.path().unwrap_or(path).to_path_buf();
                tracing::warn!("cannot read {}: {}", at.display(), e);
                failures.push(match e.into_io_error() {
                    Some(io_err) => CoreError::from_io(io_err, &at),
                    None => CoreError::InvalidPath(at),
                });
                continue;
            }
        };
        let ft = entry.file_type();
        if ft.is_symlink() {
            continue;
        }
        let triple = if ft.is_dir() { dir } else { file };
        match apply(entry.path(), triple) {
            Ok(()) => changed += 1,
            Err(e) => {
                tracing::warn!("chmod {} on {} failed: {}", triple, entry.path().display(), e);
                failures.push(CoreError::from_io(e, entry.path()));
            }
        }
    }

    if failures.is_empty() {
        return Ok(OperationOutcome::Success(format!(
            "Permissions applied to {changed} entries under {} (files {file}, folders {dir})",
            path.display()
        )));
    }

    let kind = failures[0].kind();
    let listed = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Ok(OperationOutcome::Failure(
        kind,
        format!(
            "{} of {} entries under {} failed: {listed}",
            failures.len(),
            changed + failures.len(),
            path.display()
        ),
    ))
}

/// Zips `path` into `<stem>.zip` next to it.
pub fn archive_entry(path: &Path, confirm: &mut dyn Confirm) -> CoreResult<OperationOutcome> {
    entry_kind(path)?;
    let output = archive::archive_path_for(path)?;
    if output == path {
        return Err(CoreError::InvalidName(format!(
            "archive {} would overwrite its source",
            output.display()
        )));
    }

    let placed = place_or_confirm(&output, EntryKind::File, confirm, || {
        ensure_vacant(&output)?;
        archive::create_zip(path, &output).map_err(|e| match e {
            CoreError::Archive(_) => e,
            other => CoreError::Archive(other.to_string()),
        })
    })?;
    if !placed {
        return Ok(OperationOutcome::ConflictAborted);
    }
    Ok(OperationOutcome::Success(format!(
        "Zip file {} created",
        output.display()
    )))
}

/// Runs `place`; if it reports `AlreadyExists`, asks `confirm`, replaces the
/// occupant of `dest` and runs `place` exactly once more.
///
/// Returns `false` when the user declined.
fn place_or_confirm<F>(
    dest: &Path,
    incoming: EntryKind,
    confirm: &mut dyn Confirm,
    mut place: F,
) -> CoreResult<bool>
where
    F: FnMut() -> CoreResult<()>,
{
    match place() {
        Ok(()) => return Ok(true),
        Err(CoreError::AlreadyExists(_)) => {}
        Err(e) => return Err(e),
    }

    let conflict = match conflict::check(dest, incoming)? {
        Resolution::RequiresConfirmation(kind) => kind,
        // Occupant vanished in between.
        Resolution::Clear => {
            place()?;
            return Ok(true);
        }
    };
    tracing::info!("{} already exists", dest.display());
    if !confirm.confirm(&Prompt::destination_exists(dest, conflict)) {
        return Ok(false);
    }
    conflict::replace(dest)?;
    place()?;
    Ok(true)
}

/// `rename(2)` silently replaces files, so occupancy is checked first.
fn rename_no_clobber(source: &Path, dest: &Path) -> CoreResult<()> {
    ensure_vacant(dest)?;
    std::fs::rename(source, dest).map_err(|e| transfer_error(e, source, dest))
}

fn ensure_vacant(path: &Path) -> CoreResult<()> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Err(CoreError::AlreadyExists(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CoreError::from_io(e, path)),
    }
}

fn transfer_error(err: io::Error, source: &Path, dest: &Path) -> CoreError {
    match err.kind() {
        io::ErrorKind::IsADirectory | io::ErrorKind::NotADirectory => CoreError::TypeMismatch {
            src: source.to_path_buf(),
            dest: dest.to_path_buf(),
        },
        io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(source.to_path_buf()),
        io::ErrorKind::AlreadyExists | io::ErrorKind::DirectoryNotEmpty => {
            CoreError::AlreadyExists(dest.to_path_buf())
        }
        io::ErrorKind::NotFound => CoreError::NotFound(dest.to_path_buf()),
        _ => CoreError::Io(err),
    }
}

fn entry_kind(path: &Path) -> CoreResult<EntryKind> {
    let meta = std::fs::symlink_metadata(path).map_err(|e| CoreError::from_io(e, path))?;
    Ok(EntryKind::from_metadata(&meta))
}

fn require_dir(dir: &Path) -> CoreResult<()> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(CoreError::InvalidPath(dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(CoreError::InvalidPath(dir.to_path_buf()))
        }
        Err(e) => Err(CoreError::from_io(e, dir)),
    }
}

fn creation_target(dir: &Path, name: &str) -> CoreResult<PathBuf> {
    let name = validated_name(name)?;
    require_dir(dir)?;
    Ok(dir.join(name))
}

fn base_name(path: &Path) -> CoreResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CoreError::InvalidName(format!("{} has no file name", path.display())))
}

fn validated_name(name: &str) -> CoreResult<&str> {
    if is_valid_filename(name) {
        Ok(name)
    } else {
        Err(CoreError::InvalidName(name.to_string()))
    }
}

pub(crate) fn is_valid_filename(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.contains('/') || name.contains('\0') {
        return false;
    }
    #[cfg(windows)]
    if name.contains('\\') || name.contains(':') {
        return false;
    }
    true
}
