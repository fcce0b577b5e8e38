//! Platform layer
//!
//! Everything that differs between operating systems lives behind this
//! module. Exactly one implementation is compiled in:
//!
//! - `unix`: nix directory streams (which report `.` and `..` and carry a
//!   `d_type` hint), `readlink(2)`, `statvfs(2)`, explicit creation modes
//! - `fallback`: std-only equivalents for platforms without symbolic links
//!   or `readdir`-style streams
//!
//! Callers above this module never test `cfg` themselves.

use crate::filesystem::EntryType;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use unix::*;

#[cfg(not(unix))]
mod fallback;
#[cfg(not(unix))]
pub(crate) use fallback::*;

/// One entry as produced by a platform directory cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawEntry {
    /// Entry name, `.` and `..` included
    pub name: String,
    /// Entry type when the OS reported it alongside the name
    pub hint: Option<EntryType>,
}
