//! Serialization seam for the whole-file object helpers
//!
//! The helpers in [`crate::filesystem::whole`] only move bytes; the object
//! decides how those bytes are laid out.

use std::io::{self, Write};

/// An object that can serialize itself to a byte stream
pub trait Archive {
    /// Upper bound, in bytes, of what [`Archive::archive`] will write
    fn archive_length(&self) -> usize;

    /// Serialize into `out`
    ///
    /// # Errors
    ///
    /// Any I/O error from `out`, or an error describing why the object cannot
    /// be serialized.
    fn archive(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// An object that can rebuild itself from a byte slice
pub trait Unarchive {
    /// Replace this object's state with the contents of `bytes`
    ///
    /// # Errors
    ///
    /// An error if `bytes` is not a valid encoding of the object.
    fn unarchive(&mut self, bytes: &[u8]) -> io::Result<()>;
}
