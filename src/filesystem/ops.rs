//! Recursive path operations: creating directory chains and deleting trees

use super::query::path_is_directory;
use super::scanner::{DirScanner, EntryType, TypedDirScanner};
use crate::error::{FsError, Result};
use crate::path::{canonicalize, is_absolute, make_absolute, split, NATIVE_SEPARATOR};
use crate::sys;
use std::io;
use tracing::{debug, error};

/// Create `path` and every missing directory above it
///
/// Prefixes that already exist as directories are left alone. Nothing is
/// rolled back if a later prefix fails.
///
/// # Parameters
///
/// * `path` - Directory chain to create, absolute or relative to the
///   working directory
///
/// # Errors
///
/// `DirCreate` on the first prefix that cannot be created, including one
/// that exists as something other than a directory.
///
/// # Examples
///
/// ```rust,no_run
/// use fsport::filesystem::{create_directories, path_is_directory};
///
/// # fn example() -> fsport::Result<()> {
/// create_directories("package/reels/audio")?;
/// assert!(path_is_directory("package/reels"));
/// # Ok(())
/// # }
/// ```
pub fn create_directories(path: &str) -> Result<()> {
    let mut prefix = String::new();
    if is_absolute(path, NATIVE_SEPARATOR) {
        prefix.push(NATIVE_SEPARATOR);
    }

    for component in split(path, NATIVE_SEPARATOR) {
        prefix.push_str(&component);
        if !path_is_directory(&prefix) {
            sys::create_dir(&prefix).map_err(|e| {
                error!("CreateDirectoriesInPath mkdir {}: {}", prefix, e);
                FsError::DirCreate
            })?;
        }
        prefix.push(NATIVE_SEPARATOR);
    }

    Ok(())
}

fn removal_error(op: &str, path: &str, err: &io::Error) -> FsError {
    if err.kind() == io::ErrorKind::DirectoryNotEmpty {
        return FsError::NotEmpty;
    }
    FsError::from_removal(err).unwrap_or_else(|| {
        error!("{} {}: {}", op, path, err);
        FsError::Fail
    })
}

/// Removal of single filesystem entries
///
/// [`delete_path`] walks a tree and hands each entry to an implementation of
/// this trait. [`HostRemove`] removes from the real filesystem.
pub trait RemoveEntry {
    /// Remove a file or symbolic link
    ///
    /// # Errors
    ///
    /// `NotAFile` if it does not exist, `NoPerm` if removal is denied, `Fail`
    /// otherwise.
    fn remove_file(&self, path: &str) -> Result<()>;

    /// Remove an empty directory
    ///
    /// # Errors
    ///
    /// `NotEmpty` if entries remain, otherwise as [`RemoveEntry::remove_file`].
    fn remove_dir(&self, path: &str) -> Result<()>;
}

/// Removals against the host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct HostRemove;

impl RemoveEntry for HostRemove {
    fn remove_file(&self, path: &str) -> Result<()> {
        std::fs::remove_file(path).map_err(|e| removal_error("DeleteFile", path, &e))
    }

    fn remove_dir(&self, path: &str) -> Result<()> {
        std::fs::remove_dir(path).map_err(|e| removal_error("DeletePath rmdir", path, &e))
    }
}

/// Remove a single file (or symbolic link)
///
/// # Errors
///
/// `NotAFile` if it does not exist, `NoPerm` if removal is denied, `Fail`
/// otherwise.
pub fn delete_file(path: &str) -> Result<()> {
    HostRemove.remove_file(path)
}

/// Remove `path` and, if it is a directory, everything beneath it
///
/// The path is canonicalized and made absolute first. Symbolic links are
/// removed as links; their targets are never touched. The walk stops at the
/// first failure and returns it, leaving whatever has not been reached yet
/// in place.
///
/// # Parameters
///
/// * `path` - File, link or directory tree to remove
///
/// # Returns
///
/// Returns `Ok(())` once `path` no longer exists
///
/// # Errors
///
/// `NullStr` for an empty path, otherwise the first error from scanning or
/// removal.
///
/// # Examples
///
/// ```rust,no_run
/// use fsport::filesystem::{create_directories, delete_path};
///
/// # fn example() -> fsport::Result<()> {
/// create_directories("scratch/reels/audio")?;
/// delete_path("scratch")?;
/// # Ok(())
/// # }
/// ```
pub fn delete_path(path: &str) -> Result<()> {
    delete_path_with(path, &HostRemove)
}

/// Remove `path` like [`delete_path`], with `remover` performing each removal
///
/// Directory listing and type checks still go to the host filesystem.
///
/// # Errors
///
/// `NullStr` for an empty path, otherwise the first error from scanning or
/// from `remover`.
pub fn delete_path_with<R: RemoveEntry + ?Sized>(path: &str, remover: &R) -> Result<()> {
    if path.is_empty() {
        return Err(FsError::NullStr);
    }

    let canonical = make_absolute(&canonicalize(path, NATIVE_SEPARATOR), NATIVE_SEPARATOR);
    debug!("DeletePath ({}) c({})", path, canonical);

    let meta = std::fs::symlink_metadata(&canonical)
        .map_err(|e| removal_error("DeletePath lstat", &canonical, &e))?;
    if !meta.is_dir() {
        return remover.remove_file(&canonical);
    }

    let mut stack = vec![(TypedDirScanner::open(&canonical)?, canonical)];
    while let Some((scanner, dirname)) = stack.last_mut() {
        let Some(entry) = scanner.next_entry()? else {
            let (_, done) = stack.pop().ok_or(FsError::State)?;
            remover.remove_dir(&done)?;
            continue;
        };

        if entry.name == "." || entry.name == ".." {
            continue;
        }

        let child = format!("{dirname}{NATIVE_SEPARATOR}{}", entry.name);
        if entry.kind == EntryType::Directory {
            let child_scanner = TypedDirScanner::open(&child)?;
            stack.push((child_scanner, child));
        } else {
            remover.remove_file(&child)?;
        }
    }

    Ok(())
}

/// Remove the directory at `path` only if it holds no entries
///
/// # Errors
///
/// `NotEmpty` if anything besides `.` and `..` is present, otherwise any
/// error from opening the directory or removing it.
pub fn delete_directory_if_empty(path: &str) -> Result<()> {
    let mut scanner = DirScanner::open(path)?;
    while let Some(name) = scanner.next_name()? {
        if name != "." && name != ".." {
            return Err(FsError::NotEmpty);
        }
    }
    scanner.close()?;

    delete_path(path)
}
