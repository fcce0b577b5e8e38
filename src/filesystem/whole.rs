//! Whole-file helpers
//!
//! Move an entire file into or out of memory in one call. Reads are bounded
//! by a caller-supplied limit so an unexpectedly large file fails with
//! `Alloc` instead of exhausting memory.

use super::read::{FileReader, ReadStatus};
use super::write::FileWriter;
use crate::archive::{Archive, Unarchive};
use crate::error::{FsError, Result};
use tracing::error;

/// Default upper bound for whole-file reads (8 MiB)
pub const DEFAULT_MAX_READ_SIZE: u64 = 8 * 1024 * 1024;

/// Read the whole file at `path` into a byte buffer
///
/// The buffer is sized from the file's length up front, so `max_size` is
/// checked before anything is read.
///
/// # Parameters
///
/// * `path` - File to read
/// * `max_size` - Largest file accepted, in bytes (see
///   [`DEFAULT_MAX_READ_SIZE`])
///
/// # Returns
///
/// Returns `Ok(bytes)` holding the entire file
///
/// # Errors
///
/// `FileOpen` if the file cannot be opened, `Alloc` if it is larger than
/// `max_size` or a buffer of its size cannot be reserved, `ReadFail` if fewer
/// bytes than the file size could be read.
///
/// # Examples
///
/// ```rust,no_run
/// use fsport::filesystem::{read_file_into_buffer, DEFAULT_MAX_READ_SIZE};
///
/// # fn example() -> fsport::Result<()> {
/// let header = read_file_into_buffer("reel1.mxf", DEFAULT_MAX_READ_SIZE)?;
/// assert!(header.len() as u64 <= DEFAULT_MAX_READ_SIZE);
/// # Ok(())
/// # }
/// ```
pub fn read_file_into_buffer(path: &str, max_size: u64) -> Result<Vec<u8>> {
    let mut reader = FileReader::open(path)?;
    let size = reader.size();

    if size > max_size {
        error!("{}: exceeds available buffer size ({})", path, max_size);
        return Err(FsError::Alloc);
    }

    let size = usize::try_from(size).map_err(|_| FsError::Alloc)?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size).map_err(|_| {
        error!("{}: cannot reserve {} bytes", path, size);
        FsError::Alloc
    })?;
    buffer.resize(size, 0);

    let mut filled = 0;
    while filled < size {
        match reader.read(&mut buffer[filled..])? {
            ReadStatus::Bytes(n) => filled += n,
            ReadStatus::EndOfFile => break,
        }
    }

    if filled != size {
        error!("{}: read {} of {} bytes", path, filled, size);
        return Err(FsError::ReadFail);
    }

    Ok(buffer)
}

/// Read the whole file at `path` as UTF-8 text
///
/// # Returns
///
/// Returns `Ok(text)`; `max_size` bounds the byte length, not the character
/// count
///
/// # Errors
///
/// As [`read_file_into_buffer`], plus `ReadFail` if the contents are not
/// valid UTF-8.
pub fn read_file_into_string(path: &str, max_size: u64) -> Result<String> {
    let buffer = read_file_into_buffer(path, max_size)?;
    String::from_utf8(buffer).map_err(|e| {
        error!("{}: not valid UTF-8: {}", path, e);
        FsError::ReadFail
    })
}

/// Replace the contents of `path` with `buffer`
///
/// The file is created if missing and truncated otherwise.
///
/// # Parameters
///
/// * `buffer` - Bytes to store
/// * `path` - Destination file
///
/// # Errors
///
/// `FileOpen` if the file cannot be created, `WriteFail` if not every byte
/// was written.
pub fn write_buffer_into_file(buffer: &[u8], path: &str) -> Result<()> {
    let mut writer = FileWriter::create(path)?;
    if buffer.is_empty() {
        return Ok(());
    }
    writer.write(buffer).map(drop)
}

/// Replace the contents of `path` with `contents`
///
/// # Errors
///
/// Same as [`write_buffer_into_file`].
pub fn write_string_into_file(path: &str, contents: &str) -> Result<()> {
    write_buffer_into_file(contents.as_bytes(), path)
}

/// Rebuild `object` from the contents of `path`
///
/// # Errors
///
/// As [`read_file_into_buffer`] with [`DEFAULT_MAX_READ_SIZE`], plus
/// `ReadFail` if the object rejects the bytes.
pub fn read_file_into_object(path: &str, object: &mut dyn Unarchive) -> Result<()> {
    let buffer = read_file_into_buffer(path, DEFAULT_MAX_READ_SIZE)?;
    object.unarchive(&buffer).map_err(|e| {
        error!("{}: unarchive: {}", path, e);
        FsError::ReadFail
    })
}

/// Serialize `object` and write the result to `path`
///
/// # Errors
///
/// `WriteFail` if the object fails to serialize or writes more than its
/// [`Archive::archive_length`], otherwise as [`write_buffer_into_file`].
pub fn write_object_into_file(object: &dyn Archive, path: &str) -> Result<()> {
    let capacity = object.archive_length();
    let mut buffer = Vec::with_capacity(capacity);

    object.archive(&mut buffer).map_err(|e| {
        error!("{}: archive: {}", path, e);
        FsError::WriteFail
    })?;

    if buffer.len() > capacity {
        error!(
            "{}: archive wrote {} bytes, length bound is {}",
            path,
            buffer.len(),
            capacity
        );
        return Err(FsError::WriteFail);
    }

    write_buffer_into_file(&buffer, path)
}
