//! Sequential and positioned file reading

use super::handle::{FileHandle, SeekPos};
use crate::error::{FsError, Result};
use std::fs::OpenOptions;
use std::io::Read;
use tracing::{debug, error};

/// Outcome of a successful [`FileReader::read`]
///
/// A short read is still `Bytes`; only a read that returns nothing at all is
/// `EndOfFile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// This many bytes were placed at the start of the buffer
    Bytes(usize),
    /// The file offset is at (or past) the end of the file
    EndOfFile,
}

impl ReadStatus {
    /// Number of bytes read (0 at end of file)
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Bytes(n) => n,
            Self::EndOfFile => 0,
        }
    }

    /// True at end of file
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::EndOfFile)
    }
}

/// A file opened for reading
///
/// Owns at most one OS handle. Dropping the reader closes it.
///
/// # Example
///
/// ```rust,no_run
/// use fsport::filesystem::{FileReader, ReadStatus};
///
/// # fn example() -> fsport::Result<()> {
/// let mut reader = FileReader::open("reel1.mxf")?;
/// let mut buf = [0u8; 4096];
/// while let ReadStatus::Bytes(n) = reader.read(&mut buf)? {
///     println!("read {n} bytes");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FileReader {
    handle: FileHandle,
}

impl FileReader {
    /// Create a closed reader
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reader and open `path`
    ///
    /// # Parameters
    ///
    /// * `path` - File to read; links are followed by the open
    ///
    /// # Returns
    ///
    /// Returns an open reader positioned at offset 0
    ///
    /// # Errors
    ///
    /// `FileOpen` if the file cannot be opened.
    pub fn open(path: &str) -> Result<Self> {
        let mut reader = Self::new();
        reader.open_read(path)?;
        Ok(reader)
    }

    /// Open `path` for reading, closing any file previously held
    ///
    /// # Errors
    ///
    /// `FileOpen` if the file cannot be opened.
    pub fn open_read(&mut self, path: &str) -> Result<()> {
        let mut options = OpenOptions::new();
        options.read(true);

        self.handle.open(path, &options).map_err(|e| {
            debug!("Error opening file {} for reading: {}", path, e);
            FsError::FileOpen
        })
    }

    /// Close the file
    ///
    /// # Errors
    ///
    /// `FileOpen` if the reader is already closed.
    pub fn close(&mut self) -> Result<()> {
        self.handle.close()
    }

    /// True while a file is open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Path given to the most recent open
    #[must_use]
    pub fn filename(&self) -> &str {
        self.handle.filename()
    }

    /// Size of the open file in bytes
    ///
    /// Returns 0 when closed, when the metadata query fails, or when the
    /// handle does not refer to a regular file.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.handle.size()
    }

    /// Move the file offset
    ///
    /// # Errors
    ///
    /// `State` if closed, `BadSeek` if the OS rejects the position.
    pub fn seek(&mut self, position: i64, whence: SeekPos) -> Result<()> {
        self.handle.seek(position, whence)
    }

    /// Current file offset
    ///
    /// # Errors
    ///
    /// `FileOpen` if closed, `ReadFail` if the offset cannot be queried.
    pub fn tell(&mut self) -> Result<u64> {
        self.handle.tell()
    }

    /// Read up to `buf.len()` bytes from the current offset
    ///
    /// # Parameters
    ///
    /// * `buf` - Destination; filled from the start
    ///
    /// # Returns
    ///
    /// Returns `Ok(ReadStatus::Bytes(n))` for any non-empty read, short reads
    /// included, and `Ok(ReadStatus::EndOfFile)` when nothing was left
    ///
    /// # Errors
    ///
    /// `FileOpen` if closed, `ReadFail` if the OS read fails.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<ReadStatus> {
        let file = self.handle.file_mut().ok_or(FsError::FileOpen)?;

        match file.read(buf) {
            Ok(0) => Ok(ReadStatus::EndOfFile),
            Ok(n) => Ok(ReadStatus::Bytes(n)),
            Err(e) => {
                error!("{}: read: {}", self.handle.filename(), e);
                Err(FsError::ReadFail)
            }
        }
    }
}
