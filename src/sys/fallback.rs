//! Portable implementation of the platform layer for non-unix targets
//!
//! std's `read_dir` hides `.` and `..`, so the cursor synthesizes them to keep
//! the scanner contract identical across platforms.

use super::RawEntry;
use crate::error::{FsError, Result};
use crate::filesystem::{EntryType, FreeSpace};
use std::fs::{OpenOptions, ReadDir};
use std::io;
use tracing::error;

/// Symbolic link resolution is an identity operation here
pub(crate) const HAS_SYMLINKS: bool = false;

/// An open directory stream
pub(crate) struct DirCursor {
    dots: std::vec::IntoIter<&'static str>,
    entries: ReadDir,
}

impl DirCursor {
    /// Open `dirname` for scanning
    ///
    /// # Errors
    ///
    /// `NotAFile` if the path is missing or not a directory, `NoPerm` on
    /// access denial, `Param` for malformed names, `Fail` (logged) otherwise.
    pub(crate) fn open(dirname: &str) -> Result<Self> {
        let entries = std::fs::read_dir(dirname).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => FsError::NotAFile,
            io::ErrorKind::PermissionDenied => FsError::NoPerm,
            io::ErrorKind::InvalidFilename | io::ErrorKind::InvalidInput => FsError::Param,
            _ => {
                error!("DirScanner::open({}): {}", dirname, e);
                FsError::Fail
            }
        })?;

        Ok(Self {
            dots: vec![".", ".."].into_iter(),
            entries,
        })
    }

    /// Next raw entry, or `None` once the stream is exhausted
    ///
    /// # Errors
    ///
    /// `ReadFail` if the underlying stream reports an error.
    pub(crate) fn next_raw(&mut self) -> Result<Option<RawEntry>> {
        if let Some(dot) = self.dots.next() {
            return Ok(Some(RawEntry {
                name: dot.to_owned(),
                hint: Some(EntryType::Directory),
            }));
        }

        match self.entries.next() {
            None => Ok(None),
            Some(Ok(entry)) => {
                let hint = entry.file_type().ok().map(EntryType::from);
                Ok(Some(RawEntry {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    hint,
                }))
            }
            Some(Err(e)) => {
                error!("read_dir: {}", e);
                Err(FsError::ReadFail)
            }
        }
    }
}

/// No symbolic links: every path reads as "not a link"
pub(crate) fn read_link(_path: &str) -> io::Result<Option<String>> {
    Ok(None)
}

/// Files are created with the platform default permissions
pub(crate) fn set_create_mode(_options: &mut OpenOptions) {}

/// Create a single directory
pub(crate) fn create_dir(path: &str) -> io::Result<()> {
    std::fs::create_dir(path)
}

/// Free-space queries are not available through std on this platform
///
/// # Errors
///
/// Always `Fail` (logged).
pub(crate) fn free_space(path: &str) -> Result<FreeSpace> {
    error!("FreeSpaceForPath {}: not supported on this platform", path);
    Err(FsError::Fail)
}
