//! Filesystem side of a capture: target path construction and writes.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Name of the rewritten document inside the capture root.
pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("local path {0:?} escapes the output directory")]
    Escapes(String),
    #[error("create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Joins a `/`-separated local path under `root`.
///
/// Rejects absolute paths, `..` components and empty results, so the
/// returned path always lies strictly inside `root`.
pub fn safe_join(root: &Path, local: &str) -> Result<PathBuf, StorageError> {
    let mut out = root.to_path_buf();
    for part in contained_parts(local)? {
        out.push(part);
    }
    Ok(out)
}

/// Checks that `local` names a file strictly inside whatever root it is joined to.
pub fn check_contained(local: &str) -> Result<(), StorageError> {
    contained_parts(local).map(|_| ())
}

fn contained_parts(local: &str) -> Result<Vec<&std::ffi::OsStr>, StorageError> {
    let mut parts = Vec::new();
    for component in Path::new(local).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::Escapes(local.to_string()));
            }
        }
    }
    if parts.is_empty() {
        return Err(StorageError::Escapes(local.to_string()));
    }
    Ok(parts)
}

/// Creates `dir` and all parents.
pub fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Writes `bytes` to `target`, creating parent directories first.
/// An existing file is overwritten.
pub fn write_file(target: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = target.parent() {
        ensure_dir(parent)?;
    }
    fs::write(target, bytes).map_err(|source| StorageError::Write {
        path: target.to_path_buf(),
        source,
    })
}
