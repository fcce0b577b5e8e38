//! Filesystem query primitives
//!
//! Each query wraps a single `stat`-family call. Queries follow symbolic
//! links, and a path whose target is neither a regular file nor a directory
//! (a device, a FIFO, a dangling link) is reported as not existing.

use crate::error::Result;
use crate::sys;
use std::fs::Metadata;

/// Free and total capacity of a filesystem, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeSpace {
    /// Bytes available to unprivileged callers
    pub free: u64,
    /// Total size of the filesystem
    pub total: u64,
}

fn stat(path: &str) -> Option<Metadata> {
    if path.is_empty() {
        return None;
    }
    std::fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file() || meta.is_dir())
}

/// True if `path` names an existing regular file or directory
#[must_use]
pub fn path_exists(path: &str) -> bool {
    stat(path).is_some()
}

/// True if `path` names an existing regular file
#[must_use]
pub fn path_is_file(path: &str) -> bool {
    stat(path).is_some_and(|meta| meta.is_file())
}

/// True if `path` names an existing directory
#[must_use]
pub fn path_is_directory(path: &str) -> bool {
    stat(path).is_some_and(|meta| meta.is_dir())
}

/// Size in bytes of the regular file at `path`, or 0 for anything else
#[must_use]
pub fn file_size(path: &str) -> u64 {
    stat(path)
        .filter(Metadata::is_file)
        .map_or(0, |meta| meta.len())
}

/// Free and total space on the filesystem holding `path`
///
/// # Errors
///
/// `NotAFile` if the path does not exist, `NoPerm` on access denial, `Fail`
/// (logged) for anything else.
pub fn free_space_for_path(path: &str) -> Result<FreeSpace> {
    sys::free_space(path)
}
