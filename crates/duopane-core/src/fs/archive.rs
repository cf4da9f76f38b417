//! Zip creation for a single selected entry.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{CoreError, CoreResult};

/// Where the archive for `source` goes: `<parent>/<base>.zip`.
///
/// `<base>` is the file name up to its first dot, so `a.tar.gz` archives to
/// `a.zip`. Names that start with a dot (`.bashrc`) are kept whole.
///
/// # Errors
///
/// [`CoreError::InvalidName`] if `source` has no file name (e.g. `/`).
pub fn archive_path_for(source: &Path) -> CoreResult<PathBuf> {
    let file_name = source
        .file_name()
        .ok_or_else(|| CoreError::InvalidName(format!("cannot archive {}", source.display())))?
        .to_string_lossy();
    let base = match file_name.split('.').next() {
        Some(head) if !head.is_empty() => head,
        _ => &*file_name,
    };
    Ok(parent_of(source).join(format!("{base}.zip")))
}

/// Writes `source` into a zip at `output`.
///
/// Entry names are relative to the source's parent, so a directory `docs`
/// is stored as `docs/`, `docs/a.txt`, ... and a lone file under its own
/// name. Symlinks are not followed. Any I/O or zip failure aborts the whole
/// archive and removes the partial output.
pub fn create_zip(source: &Path, output: &Path) -> CoreResult<()> {
    let result = write_zip(source, output);
    if result.is_err() {
        let _ = std::fs::remove_file(output);
    }
    result
}

fn write_zip(source: &Path, output: &Path) -> CoreResult<()> {
    let root = parent_of(source);
    let file = File::create(output).map_err(|e| CoreError::from_io(e, output))?;
    let mut writer = ZipWriter::new(file);
    let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| CoreError::Archive(e.to_string()))?;
        let rel = entry
            .path()
            .strip_prefix(&root)
            .map_err(|e| CoreError::Archive(e.to_string()))?;
        let name = zip_name(rel);
        let options = with_mode(base, entry.path());
        let ft = entry.file_type();

        if ft.is_dir() {
            writer
                .add_directory(format!("{name}/"), options)
                .map_err(|e| CoreError::Archive(format!("{name}: {e}")))?;
        } else if ft.is_symlink() {
            let target = std::fs::read_link(entry.path())
                .map_err(|e| CoreError::from_io(e, entry.path()))?;
            writer
                .add_symlink(name.clone(), target.to_string_lossy(), options)
                .map_err(|e| CoreError::Archive(format!("{name}: {e}")))?;
        } else {
            writer
                .start_file(name.clone(), options)
                .map_err(|e| CoreError::Archive(format!("{name}: {e}")))?;
            let mut src = File::open(entry.path()).map_err(|e| CoreError::from_io(e, entry.path()))?;
            io::copy(&mut src, &mut writer)?;
        }
    }

    writer
        .finish()
        .map_err(|e| CoreError::Archive(format!("{}: {e}", output.display())))?;
    Ok(())
}

fn parent_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn zip_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn with_mode(options: SimpleFileOptions, path: &Path) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::symlink_metadata(path) {
        Ok(meta) => options.unix_permissions(meta.permissions().mode() & 0o777),
        Err(_) => options,
    }
}

#[cfg(not(unix))]
fn with_mode(options: SimpleFileOptions, _path: &Path) -> SimpleFileOptions {
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn names_in(archive: &Path) -> Vec<String> {
        let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
        (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn archive_path_strips_extension() {
        let path = archive_path_for(Path::new("/data/report.txt")).unwrap();
        assert_eq!(path, PathBuf::from("/data/report.zip"));

        let dir = archive_path_for(Path::new("/data/photos")).unwrap();
        assert_eq!(dir, PathBuf::from("/data/photos.zip"));
    }

    #[test]
    fn archive_path_cuts_at_first_dot() {
        let path = archive_path_for(Path::new("/data/backup.tar.gz")).unwrap();
        assert_eq!(path, PathBuf::from("/data/backup.zip"));
    }

    #[test]
    fn archive_path_keeps_dotfile_name() {
        let path = archive_path_for(Path::new("/home/me/.bashrc")).unwrap();
        assert_eq!(path, PathBuf::from("/home/me/.bashrc.zip"));
    }

    #[test]
    fn archive_path_rejects_root() {
        assert!(archive_path_for(Path::new("/")).is_err());
    }

    #[test]
    fn zip_single_file_keeps_content() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("notes.txt");
        fs::write(&src, "hello zip").unwrap();
        let out = tmp.path().join("notes.zip");

        create_zip(&src, &out).unwrap();

        let mut zip = ZipArchive::new(File::open(&out).unwrap()).unwrap();
        let mut content = String::new();
        zip.by_name("notes.txt")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "hello zip");
    }

    #[test]
    fn zip_directory_prefixes_entries_with_dir_name() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("docs");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join("sub").join("b.txt"), "b").unwrap();
        let out = tmp.path().join("docs.zip");

        create_zip(&src, &out).unwrap();

        let names = names_in(&out);
        assert!(names.contains(&"docs/".to_string()));
        assert!(names.contains(&"docs/a.txt".to_string()));
        assert!(names.contains(&"docs/sub/b.txt".to_string()));
    }

    #[test]
    fn zip_missing_source_leaves_no_output() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("ghost.zip");

        let result = create_zip(&tmp.path().join("ghost"), &out);

        assert!(result.is_err());
        assert!(!out.exists());
    }
}
