//! File writing with direct and deferred (scatter-gather) writes
//!
//! [`FileWriter::write`] goes straight to the OS. For deferred writes,
//! [`FileWriter::batch`] opens a [`Batch`]: [`Batch::enqueue`] records a
//! borrowed buffer without touching the file and [`Batch::flush`] submits
//! everything queued at once through the platform's [`NativeGather`]
//! strategy. A flush always drains the batch, successful or not; a caller
//! that wants to retry must enqueue again.
//!
//! Buffers are borrowed only for the life of the batch that queued them, so
//! a single buffer can be refilled and queued again once its batch is gone.

use super::gather::{GatherWrite, NativeGather};
use super::handle::{FileHandle, SeekPos};
use crate::error::{FsError, Result};
use crate::sys;
use std::fs::OpenOptions;
use std::io::{IoSlice, Write};
use tracing::{debug, error};

/// Maximum number of descriptors a batch queues before it must be flushed
pub const MAX_BATCH_ENTRIES: usize = 32;

/// A file opened for writing
///
/// Owns at most one OS handle. Dropping the writer closes it.
///
/// # Examples
///
/// ```rust,no_run
/// use fsport::filesystem::FileWriter;
///
/// # fn example() -> fsport::Result<()> {
/// let mut writer = FileWriter::create("out.mxf")?;
/// let mut payload = vec![0u8; 4096];
///
/// for packet in 0u8..4 {
///     payload.fill(packet);
///     let key = [0x06, 0x0e, 0x2b, 0x34, packet];
///
///     let mut batch = writer.batch()?;
///     batch.enqueue(&key)?;
///     batch.enqueue(&payload)?;
///     batch.flush()?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FileWriter {
    handle: FileHandle,
}

impl FileWriter {
    /// Create a closed writer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer and open `path` with truncation
    ///
    /// # Parameters
    ///
    /// * `path` - File to create or truncate
    ///
    /// # Returns
    ///
    /// Returns an open writer positioned at offset 0
    ///
    /// # Errors
    ///
    /// `FileOpen` if the file cannot be opened.
    pub fn create(path: &str) -> Result<Self> {
        let mut writer = Self::new();
        writer.open_write(path)?;
        Ok(writer)
    }

    /// Open `path` for writing, creating it and discarding existing contents
    ///
    /// Any file already held is closed first. New files get mode 0o666 on
    /// unix, subject to the process umask.
    ///
    /// # Errors
    ///
    /// `FileOpen` if the file cannot be opened.
    pub fn open_write(&mut self, path: &str) -> Result<()> {
        self.open_with(path, true)
    }

    /// Open `path` for writing, creating it but keeping existing contents
    ///
    /// The offset starts at 0, so writes overwrite in place until the caller
    /// seeks elsewhere.
    ///
    /// # Errors
    ///
    /// `FileOpen` if the file cannot be opened.
    pub fn open_modify(&mut self, path: &str) -> Result<()> {
        self.open_with(path, false)
    }

    fn open_with(&mut self, path: &str, truncate: bool) -> Result<()> {
        let mut options = OpenOptions::new();
        options
            .read(true)
            .write(true)
            .create(true)
            .truncate(truncate);
        sys::set_create_mode(&mut options);

        self.handle.open(path, &options).map_err(|e| {
            error!("Error opening file {}: {}", path, e);
            FsError::FileOpen
        })
    }

    /// Close the file
    ///
    /// # Errors
    ///
    /// `FileOpen` if the writer is already closed.
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

    /// Size of the open file in bytes (0 when closed)
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

    /// Write `buf` immediately at the current offset
    ///
    /// # Parameters
    ///
    /// * `buf` - Bytes to write
    ///
    /// # Returns
    ///
    /// Returns `Ok(buf.len())`; a partial write is reported as an error
    ///
    /// # Errors
    ///
    /// `State` if closed, `WriteFail` if the OS write fails or is short.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let file = self.handle.file_mut().ok_or(FsError::State)?;

        match file.write(buf) {
            Ok(written) if written == buf.len() => Ok(written),
            Ok(written) => {
                error!(
                    "{}: short write: {} of {} bytes",
                    self.handle.filename(),
                    written,
                    buf.len()
                );
                Err(FsError::WriteFail)
            }
            Err(e) => {
                error!("{}: write: {}", self.handle.filename(), e);
                Err(FsError::WriteFail)
            }
        }
    }

    /// Start a scatter-gather batch on this writer
    ///
    /// The writer stays mutably borrowed until the batch is dropped, so it
    /// cannot be closed or reopened underneath queued descriptors.
    ///
    /// # Returns
    ///
    /// Returns an empty [`Batch`] with room for [`MAX_BATCH_ENTRIES`]
    /// descriptors
    ///
    /// # Errors
    ///
    /// `State` if the writer is closed.
    pub fn batch<'b>(&mut self) -> Result<Batch<'_, 'b>> {
        if !self.handle.is_open() {
            return Err(FsError::State);
        }
        Ok(Batch {
            writer: self,
            pending: Vec::with_capacity(MAX_BATCH_ENTRIES),
        })
    }
}

/// Descriptors queued for one gathered write
///
/// `'b` bounds the queued buffers; they are borrowed, not copied, and only
/// for as long as the batch lives. Descriptors still queued when the batch is
/// dropped are discarded without being written.
#[derive(Debug)]
pub struct Batch<'w, 'b> {
    writer: &'w mut FileWriter,
    pending: Vec<IoSlice<'b>>,
}

impl<'b> Batch<'_, 'b> {
    /// Queue `buf` for the next flush without touching the file
    ///
    /// # Errors
    ///
    /// `WriteFail` if [`MAX_BATCH_ENTRIES`] descriptors are already queued;
    /// the queue is left as it was.
    pub fn enqueue(&mut self, buf: &'b [u8]) -> Result<()> {
        if self.pending.len() >= MAX_BATCH_ENTRIES {
            error!(
                "The write batch is full! Only {} entries allowed before a flush.",
                MAX_BATCH_ENTRIES
            );
            return Err(FsError::WriteFail);
        }

        self.pending.push(IoSlice::new(buf));
        Ok(())
    }

    /// Number of descriptors waiting for the next flush
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Write every queued descriptor contiguously, then empty the batch
    ///
    /// On unix this is a single `writev(2)`; elsewhere the descriptors are
    /// written one at a time, stopping at the first failure. The batch is
    /// cleared even when the write fails, and may be refilled afterwards.
    ///
    /// # Returns
    ///
    /// Returns the total number of bytes written (0 for an empty batch)
    ///
    /// # Errors
    ///
    /// `State` if the writer is closed, `WriteFail` if fewer bytes were
    /// written than queued.
    pub fn flush(&mut self) -> Result<usize> {
        let file = self.writer.handle.file_mut().ok_or(FsError::State)?;
        let result = NativeGather::write_batch(file, &self.pending);
        self.pending.clear();
        result
    }
}

impl Drop for Batch<'_, '_> {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            debug!(
                "{}: discarding {} unflushed descriptors",
                self.writer.filename(),
                self.pending.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::filesystem::FileReader;
    use std::fs;
    use tempfile::TempDir;

    fn scratch(temp_dir: &TempDir, name: &str) -> String {
        temp_dir.path().join(name).to_str().unwrap().to_owned()
    }

    #[test]
    fn test_direct_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "direct.bin");

        let mut writer = FileWriter::create(&path).unwrap();
        assert_eq!(writer.write(b"hello ").unwrap(), 6);
        assert_eq!(writer.write(b"world").unwrap(), 5);
        assert_eq!(writer.size(), 11);
        writer.close().unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn test_full_batch_flushes_and_empties() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "batch.bin");
        let chunks: Vec<Vec<u8>> = (0..MAX_BATCH_ENTRIES)
            .map(|i| vec![u8::try_from(i).unwrap(); i + 1])
            .collect();

        let mut writer = FileWriter::create(&path).unwrap();
        let mut batch = writer.batch().unwrap();
        for chunk in &chunks {
            batch.enqueue(chunk).unwrap();
        }
        assert_eq!(batch.pending(), MAX_BATCH_ENTRIES);

        let expected: Vec<u8> = chunks.concat();
        assert_eq!(batch.flush().unwrap(), expected.len());
        assert_eq!(batch.pending(), 0);
        drop(batch);
        drop(writer);

        assert_eq!(fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn test_overfull_batch_rejects_and_keeps_capacity() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "overfull.bin");
        let chunk = [0xAAu8; 8];

        let mut writer = FileWriter::create(&path).unwrap();
        let mut batch = writer.batch().unwrap();
        for _ in 0..MAX_BATCH_ENTRIES {
            batch.enqueue(&chunk).unwrap();
        }
        assert_eq!(batch.enqueue(&chunk), Err(FsError::WriteFail));
        assert_eq!(batch.pending(), MAX_BATCH_ENTRIES);

        // enqueue never touches the file
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);

        // the full batch still flushes, after which it accepts more
        assert_eq!(batch.flush().unwrap(), MAX_BATCH_ENTRIES * chunk.len());
        batch.enqueue(&chunk).unwrap();
        assert_eq!(batch.pending(), 1);
    }

    #[test]
    fn test_refilled_buffer_across_flushes() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "refill.bin");
        let mut chunk = [0u8; 16];
        let mut expected = Vec::new();

        let mut writer = FileWriter::create(&path).unwrap();
        for packet in 0u8..5 {
            chunk.fill(packet);
            let key = [0x06, 0x0e, 0x2b, 0x34, packet];

            let mut batch = writer.batch().unwrap();
            batch.enqueue(&key).unwrap();
            batch.enqueue(&chunk).unwrap();
            assert_eq!(batch.flush().unwrap(), key.len() + chunk.len());

            expected.extend_from_slice(&key);
            expected.extend_from_slice(&chunk);
        }
        writer.close().unwrap();

        assert_eq!(fs::read(&path).unwrap(), expected);
    }

    #[test]
    fn test_flush_interleaves_with_direct_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "mixed.bin");
        let key = b"KEY.";
        let len = b"LEN.";

        let mut writer = FileWriter::create(&path).unwrap();
        writer.write(b"head.").unwrap();
        let mut batch = writer.batch().unwrap();
        batch.enqueue(key).unwrap();
        batch.enqueue(len).unwrap();
        assert_eq!(batch.flush().unwrap(), 8);
        drop(batch);
        writer.write(b"value").unwrap();
        drop(writer);

        assert_eq!(fs::read(&path).unwrap(), b"head.KEY.LEN.value");
    }

    #[test]
    fn test_empty_flush() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "empty.bin");

        let mut writer = FileWriter::create(&path).unwrap();
        assert_eq!(writer.batch().unwrap().flush().unwrap(), 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_flush_still_drains_batch() {
        // Writes to /dev/full always fail with ENOSPC
        let mut writer = FileWriter::new();
        if writer.open_modify("/dev/full").is_err() {
            return;
        }
        let mut batch = writer.batch().unwrap();
        batch.enqueue(b"lost").unwrap();
        batch.enqueue(b"also lost").unwrap();

        assert_eq!(batch.flush(), Err(FsError::WriteFail));
        assert_eq!(batch.pending(), 0);
        drop(batch);
        assert_eq!(writer.write(b"x"), Err(FsError::WriteFail));
    }

    #[test]
    fn test_closed_writer_errors() {
        let mut writer = FileWriter::new();
        assert_eq!(writer.write(b"x"), Err(FsError::State));
        assert_eq!(writer.batch().unwrap_err(), FsError::State);
        assert_eq!(writer.seek(0, SeekPos::End), Err(FsError::State));
        assert_eq!(writer.close(), Err(FsError::FileOpen));
    }

    #[test]
    fn test_dropped_batch_discards_pending() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "discard.bin");

        let mut writer = FileWriter::create(&path).unwrap();
        let mut batch = writer.batch().unwrap();
        batch.enqueue(b"never written").unwrap();
        drop(batch);
        writer.close().unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_open_write_truncates_but_open_modify_preserves() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "modes.bin");
        fs::write(&path, b"0123456789").unwrap();

        let mut writer = FileWriter::new();
        writer.open_modify(&path).unwrap();
        writer.seek(2, SeekPos::Beginning).unwrap();
        writer.write(b"ab").unwrap();
        writer.close().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"01ab456789");

        writer.open_write(&path).unwrap();
        writer.write(b"z").unwrap();
        assert_eq!(writer.tell().unwrap(), 1);
        writer.close().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"z");
    }

    #[test]
    fn test_writer_output_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "roundtrip.bin");
        let parts: [&[u8]; 3] = [b"alpha", b"beta", b"gamma"];

        let mut writer = FileWriter::create(&path).unwrap();
        let mut batch = writer.batch().unwrap();
        for part in parts {
            batch.enqueue(part).unwrap();
        }
        batch.flush().unwrap();
        drop(batch);
        drop(writer);

        let mut reader = FileReader::open(&path).unwrap();
        let mut buf = vec![0u8; 64];
        let n = reader.read(&mut buf).unwrap().count();
        assert_eq!(&buf[..n], b"alphabetagamma");
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = scratch(&temp_dir, "missing/out.bin");
        assert_eq!(FileWriter::create(&path).unwrap_err(), FsError::FileOpen);
    }
}
