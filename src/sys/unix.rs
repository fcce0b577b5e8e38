//! POSIX implementation of the platform layer

use super::RawEntry;
use crate::error::{FsError, Result};
use crate::filesystem::{EntryType, FreeSpace};
use nix::dir::{Dir, OwningIter, Type};
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::stat::Mode;
use std::fs::{DirBuilder, OpenOptions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};
use tracing::error;

/// This platform has symbolic links worth resolving
pub(crate) const HAS_SYMLINKS: bool = true;

/// Permission bits for newly created files (before umask)
const FILE_CREATE_MODE: u32 = 0o666;

/// Permission bits for newly created directories (before umask)
const DIR_CREATE_MODE: u32 = 0o777;

/// An open directory stream
///
/// Owns the underlying `DIR*`; it is closed when the cursor is dropped.
pub(crate) struct DirCursor {
    entries: OwningIter,
}

impl DirCursor {
    /// Open `dirname` for scanning
    ///
    /// # Errors
    ///
    /// `NotAFile` if the path is missing or not a directory, `NoPerm` on
    /// access denial, `Param` for over-long names or link loops, `State` on
    /// descriptor exhaustion, `Fail` (logged) otherwise.
    pub(crate) fn open(dirname: &str) -> Result<Self> {
        let dir = Dir::open(
            dirname,
            OFlag::O_RDONLY | OFlag::O_DIRECTORY | OFlag::O_CLOEXEC,
            Mode::empty(),
        )
        .map_err(|errno| match errno {
            Errno::ENOENT | Errno::ENOTDIR => FsError::NotAFile,
            Errno::EACCES => FsError::NoPerm,
            Errno::ELOOP | Errno::ENAMETOOLONG => FsError::Param,
            Errno::EMFILE | Errno::ENFILE => FsError::State,
            other => {
                error!("DirScanner::open({}): {}", dirname, other.desc());
                FsError::Fail
            }
        })?;

        Ok(Self {
            entries: dir.into_iter(),
        })
    }

    /// Next raw entry, or `None` once the stream is exhausted
    ///
    /// # Errors
    ///
    /// `ReadFail` if `readdir(3)` reports an error.
    pub(crate) fn next_raw(&mut self) -> Result<Option<RawEntry>> {
        match self.entries.next() {
            None => Ok(None),
            Some(Ok(entry)) => Ok(Some(RawEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                hint: entry.file_type().map(entry_type_from_hint),
            })),
            Some(Err(errno)) => {
                error!("readdir: {}", errno.desc());
                Err(FsError::ReadFail)
            }
        }
    }
}

fn entry_type_from_hint(kind: Type) -> EntryType {
    match kind {
        Type::Directory => EntryType::Directory,
        Type::File => EntryType::File,
        Type::Symlink => EntryType::Link,
        _ => EntryType::Device,
    }
}

/// Read the target of `path` if it is a symbolic link
///
/// `Ok(None)` means the path exists but is not a link (`EINVAL`).
pub(crate) fn read_link(path: &str) -> io::Result<Option<String>> {
    match std::fs::read_link(path) {
        Ok(target) => Ok(Some(target.to_string_lossy().into_owned())),
        Err(e) if e.raw_os_error() == Some(libc::EINVAL) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Apply the creation mode used for files opened for writing
pub(crate) fn set_create_mode(options: &mut OpenOptions) {
    options.mode(FILE_CREATE_MODE);
}

/// Create a single directory
pub(crate) fn create_dir(path: &str) -> io::Result<()> {
    DirBuilder::new().mode(DIR_CREATE_MODE).create(path)
}

/// Free and total bytes on the filesystem holding `path`
///
/// # Errors
///
/// `NotAFile` for a missing path, `NoPerm` on access denial, `Fail` (logged)
/// otherwise or when the filesystem reports an impossible size.
pub(crate) fn free_space(path: &str) -> Result<FreeSpace> {
    let stats = nix::sys::statvfs::statvfs(path).map_err(|errno| match errno {
        Errno::ENOENT | Errno::ENOTDIR => FsError::NotAFile,
        Errno::EACCES => FsError::NoPerm,
        other => {
            error!("FreeSpaceForPath statvfs {}: {}", path, other.desc());
            FsError::Fail
        }
    })?;

    let blocks = u64::from(stats.blocks());
    if blocks < 1 {
        error!("File system {} has impossible size: {}", path, blocks);
        return Err(FsError::Fail);
    }

    let unit = u64::from(stats.fragment_size());
    Ok(FreeSpace {
        free: unit * u64::from(stats.blocks_available()),
        total: unit * blocks,
    })
}
