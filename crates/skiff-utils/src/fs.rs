use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use tracing::trace;

use crate::error::{FileSystemError, FileSystemResult};

/// Creates a directory structure if it doesn't exist.
///
/// # Errors
///
/// * [`FileSystemError::Directory`] if the directory could not be created.
/// * [`FileSystemError::NotADirectory`] if the path exists but is not a directory.
pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|err| FileSystemError::Directory {
            path: path.to_path_buf(),
            action: "create",
            source: err,
        })?;
    } else if !path.is_dir() {
        return Err(FileSystemError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Reads a file into a string, returning `None` when it does not exist.
pub fn read_optional<P: AsRef<Path>>(path: P) -> FileSystemResult<Option<String>> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(FileSystemError::File {
                path: path.to_path_buf(),
                action: "read",
                source: err,
            })
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// Replaces the contents of `path` with `content` atomically.
///
/// The data is written to a hidden sibling file, flushed to disk and then
/// renamed over the target, so readers observe either the old or the new
/// contents and never a truncated file. Missing parent directories are
/// created.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> FileSystemResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }

    let staging = staging_path(path);
    let file_err = |action, source| {
        FileSystemError::File {
            path: staging.clone(),
            action,
            source,
        }
    };

    let mut file = File::create(&staging).map_err(|err| file_err("create", err))?;
    file.write_all(content)
        .map_err(|err| file_err("write", err))?;
    file.sync_all().map_err(|err| file_err("sync", err))?;
    drop(file);

    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(FileSystemError::File {
            path: path.to_path_buf(),
            action: "replace",
            source: err,
        });
    }

    trace!("wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_ensure_dir_exists() {
        let dir = tempdir().unwrap();
        let new_dir = dir.path().join("a/b");
        ensure_dir_exists(&new_dir).unwrap();
        assert!(new_dir.is_dir());

        ensure_dir_exists(&new_dir).unwrap();
    }

    #[test]
    fn test_ensure_dir_exists_file_collision() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("file.txt");
        fs::write(&file_path, "hello").unwrap();
        assert!(matches!(
            ensure_dir_exists(&file_path),
            Err(FileSystemError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_read_optional_missing() {
        let dir = tempdir().unwrap();
        let result = read_optional(dir.path().join("absent.txt")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_read_optional_existing() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("registry.txt");
        fs::write(&file_path, "remote0 http://u0 True\n").unwrap();
        assert_eq!(
            read_optional(&file_path).unwrap().as_deref(),
            Some("remote0 http://u0 True\n")
        );
    }

    #[test]
    fn test_atomic_write_creates_parents() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("nested/dir/registry.txt");
        atomic_write(&file_path, b"content").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "content");
    }

    #[test]
    fn test_atomic_write_replaces_and_cleans_up() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("registry.txt");
        fs::write(&file_path, "old content that is longer").unwrap();

        atomic_write(&file_path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("registry.txt")]);
    }

    #[test]
    fn test_atomic_write_into_file_parent_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let result = atomic_write(blocker.join("registry.txt"), b"data");
        assert!(result.is_err());
    }
}
