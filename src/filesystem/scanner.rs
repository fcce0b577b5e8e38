//! Directory scanning
//!
//! Two scanners share one platform cursor: [`DirScanner`] yields entry names,
//! [`TypedDirScanner`] yields names together with an [`EntryType`]. Both
//! report `.` and `..` like `readdir(3)` does; callers that walk trees must
//! skip them.

use crate::error::{FsError, Result};
use crate::sys::{DirCursor, RawEntry};
use std::fs::FileType;
use std::path::Path;
use tracing::debug;

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// A directory
    Directory,
    /// A regular file
    File,
    /// A symbolic link (never followed)
    Link,
    /// Anything else: devices, FIFOs, sockets
    Device,
}

impl From<FileType> for EntryType {
    fn from(kind: FileType) -> Self {
        if kind.is_dir() {
            Self::Directory
        } else if kind.is_symlink() {
            Self::Link
        } else if kind.is_file() {
            Self::File
        } else {
            Self::Device
        }
    }
}

/// One entry from a [`TypedDirScanner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name, relative to the scanned directory
    pub name: String,
    /// Entry kind
    pub kind: EntryType,
}

/// Lists the names in a directory
///
/// # Example
///
/// ```rust,no_run
/// use fsport::filesystem::DirScanner;
///
/// # fn example() -> fsport::Result<()> {
/// let mut scanner = DirScanner::open("/var/media")?;
/// while let Some(name) = scanner.next_name()? {
///     println!("{name}");
/// }
/// scanner.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct DirScanner {
    cursor: Option<DirCursor>,
}

impl std::fmt::Debug for DirScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirScanner")
            .field("open", &self.cursor.is_some())
            .finish_non_exhaustive()
    }
}

impl DirScanner {
    /// Open `dirname` for scanning
    ///
    /// Entries come back in directory-stream order, `.` and `..` included.
    ///
    /// # Parameters
    ///
    /// * `dirname` - Directory to list
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use fsport::filesystem::DirScanner;
    ///
    /// # fn example() -> fsport::Result<()> {
    /// let mut scanner = DirScanner::open("package")?;
    /// while let Some(name) = scanner.next_name()? {
    ///     println!("{name}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// `NotAFile` for a missing path or a non-directory, `NoPerm` on access
    /// denial, `Param` for malformed names, `State` when descriptors are
    /// exhausted, `Fail` otherwise.
    pub fn open(dirname: &str) -> Result<Self> {
        Ok(Self {
            cursor: Some(DirCursor::open(dirname)?),
        })
    }

    /// True until [`DirScanner::close`] is called
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.cursor.is_some()
    }

    /// Next entry name, or `None` at the end of the directory
    ///
    /// # Errors
    ///
    /// `FileOpen` if closed, `ReadFail` if the directory stream fails.
    pub fn next_name(&mut self) -> Result<Option<String>> {
        Ok(self.next_raw()?.map(|raw| raw.name))
    }

    pub(crate) fn next_raw(&mut self) -> Result<Option<RawEntry>> {
        self.cursor
            .as_mut()
            .ok_or(FsError::FileOpen)?
            .next_raw()
    }

    /// Release the directory stream
    ///
    /// # Errors
    ///
    /// `FileOpen` if the scanner is already closed.
    pub fn close(&mut self) -> Result<()> {
        self.cursor.take().map(drop).ok_or(FsError::FileOpen)
    }
}

impl Iterator for DirScanner {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.as_ref()?;
        match self.next_name() {
            Ok(name) => name.map(Ok),
            Err(e) => {
                self.cursor = None;
                Some(Err(e))
            }
        }
    }
}

/// Lists the names in a directory along with their entry types
///
/// Types come from the directory stream when the OS provides them and from a
/// non-following `lstat` of the entry otherwise.
#[derive(Debug, Default)]
pub struct TypedDirScanner {
    inner: DirScanner,
    dirname: String,
}

impl TypedDirScanner {
    /// Open `dirname` for scanning
    ///
    /// # Errors
    ///
    /// Same as [`DirScanner::open`].
    pub fn open(dirname: &str) -> Result<Self> {
        Ok(Self {
            inner: DirScanner::open(dirname)?,
            dirname: dirname.to_owned(),
        })
    }

    /// True until [`TypedDirScanner::close`] is called
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    /// Next entry, or `None` at the end of the directory
    ///
    /// # Errors
    ///
    /// `FileOpen` if closed, `ReadFail` if the directory stream fails or the
    /// entry's type cannot be determined.
    pub fn next_entry(&mut self) -> Result<Option<DirEntry>> {
        let Some(raw) = self.inner.next_raw()? else {
            return Ok(None);
        };

        let kind = match raw.hint {
            Some(kind) => kind,
            None => self.lookup_type(&raw.name)?,
        };

        Ok(Some(DirEntry {
            name: raw.name,
            kind,
        }))
    }

    fn lookup_type(&self, name: &str) -> Result<EntryType> {
        let full = Path::new(&self.dirname).join(name);
        std::fs::symlink_metadata(&full)
            .map(|meta| EntryType::from(meta.file_type()))
            .map_err(|e| {
                debug!("lstat {}: {}", full.display(), e);
                FsError::ReadFail
            })
    }

    /// Release the directory stream
    ///
    /// # Errors
    ///
    /// `FileOpen` if the scanner is already closed.
    pub fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}

impl Iterator for TypedDirScanner {
    type Item = Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.inner.is_open() {
            return None;
        }
        match self.next_entry() {
            Ok(entry) => entry.map(Ok),
            Err(e) => {
                self.inner.cursor = None;
                Some(Err(e))
            }
        }
    }
}
