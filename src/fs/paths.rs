//! Normalization of task paths relative to the output root.
//!
//! Task paths come from templates and from model output, so they are
//! untrusted. A path is accepted only if, after resolving `.` and `..`
//! lexically, it still names a file strictly inside the root.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Reasons a task path is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path is empty or only whitespace.
    #[error("path is empty")]
    Empty,

    /// The path is absolute or carries a drive/UNC prefix.
    #[error("path '{0}' is absolute")]
    Absolute(String),

    /// The path climbs above the output root.
    #[error("path '{0}' escapes the output root")]
    EscapesRoot(String),

    /// The path resolves to the root itself.
    #[error("path '{0}' does not name a file")]
    NoFileName(String),
}

/// Normalize `raw` into a relative path contained in the output root.
///
/// Backslashes are treated as separators so model output written with Windows
/// separators behaves the same on every platform.
///
/// ```
/// use scaffold_agent::fs::normalize_task_path;
/// use std::path::PathBuf;
///
/// assert_eq!(normalize_task_path("./src/../src/main.go").unwrap(), PathBuf::from("src/main.go"));
/// assert!(normalize_task_path("../etc/passwd").is_err());
/// ```
pub fn normalize_task_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }

    let unified = trimmed.replace('\\', "/");
    let mut normalized = PathBuf::new();

    for component in Path::new(&unified).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(PathError::Absolute(raw.to_string()));
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(PathError::EscapesRoot(raw.to_string()));
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(PathError::NoFileName(raw.to_string()));
    }

    Ok(normalized)
}
