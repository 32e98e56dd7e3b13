//! Atomic filesystem writes.
//!
//! Every generated file is written through [`atomic_write`] so that a reader
//! of the output directory never observes a half-written file, even while
//! several workers are writing into the same directory.
//!
//! # Implementation Strategy
//!
//! 1. Create the full parent directory chain
//! 2. Write content to a temporary file in the same directory
//! 3. Sync the file to disk
//! 4. Rename it over the target
//!
//! On crash, a temporary file named `.{filename}.{pid}.{n}.tmp` may remain.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Failure while writing a file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The parent directory chain could not be created.
    #[error("failed to create directories for '{}': {source}", path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The target has no file name component.
    #[error("invalid file path '{}'", path.display())]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
    },

    /// Writing or syncing the temporary file failed.
    #[error("failed to write file '{}': {source}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Renaming the temporary file over the target failed.
    #[error("failed to replace '{}': {source}", path.display())]
    Replace {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Atomically write bytes to a file, creating parent directories as needed.
///
/// An existing file at `path` is replaced.
///
/// ```no_run
/// use scaffold_agent::fs::atomic_write;
/// use std::path::Path;
///
/// atomic_write(Path::new("output/go.mod"), b"module example.com/app\n")?;
/// # Ok::<(), scaffold_agent::fs::WriteError>(())
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<(), WriteError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = generate_temp_path(path)?;

    if let Err(source) = write_and_sync(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(WriteError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(WriteError::Replace {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

/// Generate a temporary file path in the same directory as the target.
fn generate_temp_path(target: &Path) -> Result<PathBuf, WriteError> {
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| WriteError::InvalidPath {
            path: target.to_path_buf(),
        })?;

    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let temp_name = format!(".{}.{}.{}.tmp", filename, std::process::id(), n);

    Ok(match target.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    })
}

/// Write content to a file and sync to disk.
fn write_and_sync(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"hello world").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "hello world");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");
        fs::write(&file_path, "original content").unwrap();

        atomic_write(&file_path, b"new content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new content");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("dirs").join("test.txt");

        atomic_write(&file_path, b"nested content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "nested content");
    }

    #[test]
    fn test_atomic_write_empty_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");

        atomic_write(&file_path, b"").unwrap();

        assert!(fs::read(&file_path).unwrap().is_empty());
    }

    #[test]
    fn test_atomic_write_binary_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("binary.bin");
        let binary_content: Vec<u8> = (0..256).map(|i| i as u8).collect();

        atomic_write(&file_path, &binary_content).unwrap();

        assert_eq!(fs::read(&file_path).unwrap(), binary_content);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.txt");

        atomic_write(&file_path, b"content").unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let target = Path::new("/some/path/file.txt");
        let a = generate_temp_path(target).unwrap();
        let b = generate_temp_path(target).unwrap();

        assert_ne!(a, b);
        assert_eq!(a.parent().unwrap(), Path::new("/some/path"));
        let name = a.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".file.txt."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_parent_is_a_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("blocker"), "x").unwrap();
        let file_path = temp_dir.path().join("blocker").join("child.txt");

        let err = atomic_write(&file_path, b"content").unwrap_err();
        assert!(matches!(err, WriteError::CreateDir { .. }));
    }

    #[test]
    fn test_target_is_a_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path().join("taken");
        fs::create_dir(&dir_path).unwrap();
        fs::write(dir_path.join("inner.txt"), "x").unwrap();

        let err = atomic_write(&dir_path, b"content").unwrap_err();
        assert!(matches!(err, WriteError::Replace { .. }));
    }

    #[test]
    fn test_atomic_write_concurrent_different_files() {
        let temp_dir = TempDir::new().unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let path = temp_dir.path().join(format!("file_{}.txt", i));
                let content = format!("content {}", i);
                std::thread::spawn(move || {
                    atomic_write(&path, content.as_bytes()).unwrap();
                    (path, content)
                })
            })
            .collect();

        for handle in handles {
            let (path, expected_content) = handle.join().unwrap();
            assert_eq!(fs::read_to_string(&path).unwrap(), expected_content);
        }
    }
}
