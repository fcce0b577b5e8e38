//! The OS file handle shared by [`super::FileReader`] and [`super::FileWriter`]
//!
//! A handle is either open (it owns a `std::fs::File`) or closed. Closing
//! happens on an explicit `close` or when the owner is dropped, whichever
//! comes first.

use crate::error::{FsError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom};

/// Origin for [`super::FileReader::seek`] and [`super::FileWriter::seek`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekPos {
    /// Offset from the start of the file
    #[default]
    Beginning,
    /// Offset from the current position
    Current,
    /// Offset from the end of the file
    End,
}

#[derive(Debug, Default)]
pub(crate) struct FileHandle {
    file: Option<File>,
    filename: String,
}

impl FileHandle {
    /// Open `path`, replacing (and closing) any file already held
    pub(crate) fn open(&mut self, path: &str, options: &OpenOptions) -> io::Result<()> {
        self.filename = path.to_owned();
        self.file = None;
        self.file = Some(options.open(path)?);
        Ok(())
    }

    pub(crate) fn file_mut(&mut self) -> Option<&mut File> {
        self.file.as_mut()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub(crate) fn filename(&self) -> &str {
        &self.filename
    }

    pub(crate) fn close(&mut self) -> Result<()> {
        self.file.take().map(drop).ok_or(FsError::FileOpen)
    }

    /// Size of the open regular file; 0 when closed, on error, or for other types
    pub(crate) fn size(&self) -> u64 {
        self.file
            .as_ref()
            .and_then(|file| file.metadata().ok())
            .filter(std::fs::Metadata::is_file)
            .map_or(0, |meta| meta.len())
    }

    pub(crate) fn seek(&mut self, position: i64, whence: SeekPos) -> Result<()> {
        let file = self.file.as_mut().ok_or(FsError::State)?;
        let target = match whence {
            SeekPos::Beginning => {
                SeekFrom::Start(u64::try_from(position).map_err(|_| FsError::BadSeek)?)
            }
            SeekPos::Current => SeekFrom::Current(position),
            SeekPos::End => SeekFrom::End(position),
        };
        file.seek(target).map(drop).map_err(|_| FsError::BadSeek)
    }

    pub(crate) fn tell(&mut self) -> Result<u64> {
        let file = self.file.as_mut().ok_or(FsError::FileOpen)?;
        file.stream_position().map_err(|_| FsError::ReadFail)
    }
}
