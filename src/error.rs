//! Error types for fsport operations
//!
//! Every fallible operation returns [`Result`], whose error side is the closed
//! set of failure kinds in [`FsError`]. The kinds carry no payload: diagnostic
//! detail (the path involved, the OS error text) is written to the log at the
//! point of failure instead of being encoded in the value.
//!
//! End-of-file is deliberately *not* an error kind. Reads report it through
//! [`crate::filesystem::ReadStatus::EndOfFile`] and directory scanners report
//! it by returning `Ok(None)`.

use std::io;
use thiserror::Error;

/// Result type for fsport operations
pub type Result<T> = std::result::Result<T, FsError>;

/// Failure kinds reported by fsport operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum FsError {
    /// The handle is closed, or opening it failed
    #[error("file handle is not open or could not be opened")]
    FileOpen,

    /// A read (or position query) failed at the OS level
    #[error("read failed")]
    ReadFail,

    /// A write failed or wrote fewer bytes than requested
    #[error("write failed")]
    WriteFail,

    /// Repositioning the file offset failed
    #[error("seek failed")]
    BadSeek,

    /// The operation is invalid for the current open/closed state, or a
    /// process/system resource limit was exhausted
    #[error("invalid state for operation")]
    State,

    /// The path does not exist or a component is not a directory
    #[error("path does not name an existing file")]
    NotAFile,

    /// The path exists but is not a directory
    #[error("path is not a directory")]
    NotADirectory,

    /// Access was denied
    #[error("permission denied")]
    NoPerm,

    /// A malformed argument, such as a name that is too long
    #[error("invalid parameter")]
    Param,

    /// Creating a directory failed
    #[error("directory creation failed")]
    DirCreate,

    /// The directory still contains entries
    #[error("directory is not empty")]
    NotEmpty,

    /// A buffer could not be sized for the requested data
    #[error("buffer allocation failed")]
    Alloc,

    /// A required path argument was empty
    #[error("empty path argument")]
    NullStr,

    /// Symbolic link resolution exceeded its hop limit
    #[error("too many levels of symbolic links")]
    TooManyLinks,

    /// Any other failure (details are logged)
    #[error("operation failed")]
    Fail,
}

impl FsError {
    /// Classify a failed `unlink`/`rmdir`.
    ///
    /// Returns `None` for errors without a dedicated kind; callers log those
    /// and report [`FsError::Fail`].
    pub(crate) fn from_removal(err: &io::Error) -> Option<Self> {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Some(Self::NotAFile),
            io::ErrorKind::PermissionDenied
            | io::ErrorKind::ReadOnlyFilesystem
            | io::ErrorKind::ResourceBusy => Some(Self::NoPerm),
            _ => None,
        }
    }

    /// Classify a failed path lookup (link reads, filesystem queries).
    pub(crate) fn from_lookup(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::NotAFile,
            io::ErrorKind::PermissionDenied => Self::NoPerm,
            io::ErrorKind::InvalidFilename | io::ErrorKind::InvalidInput => Self::Param,
            _ => Self::Fail,
        }
    }
}
