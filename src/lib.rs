//! fsport - portable path algebra and synchronous file I/O
//!
//! The building blocks a media toolkit needs beneath its container formats:
//!
//! - [`path`]: string paths over an explicit separator, lexical
//!   canonicalization, and bounded symbolic link resolution
//! - [`filesystem`]: existence and size queries, owned file readers and
//!   writers (with scatter-gather write batches), directory scanners,
//!   recursive create/delete, whole-file helpers
//! - [`find`]: name-pattern search over directory trees
//! - [`archive`]: the serialization seam used by the whole-file object helpers
//! - [`config`] and [`logging`]: glue for tools built on the crate
//!
//! Everything is synchronous and single-threaded. Every fallible operation
//! returns [`Result`] with one of the [`FsError`] kinds; OS detail is logged
//! through `tracing` rather than carried in the error.

pub mod archive;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod find;
pub mod logging;
pub mod path;
mod sys;

pub use error::{FsError, Result};
