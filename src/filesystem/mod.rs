//! Synchronous file and directory operations
//!
//! Everything here works on string paths and reports failures as
//! [`crate::FsError`] kinds, with OS detail going to the log.
//!
//! - [`query`]: existence, type, size and free-space checks
//! - [`read`] / [`write`]: owned file handles, including scatter-gather
//!   batches on the writer (see [`gather`])
//! - [`scanner`]: directory listing
//! - [`ops`]: recursive creation and deletion
//! - [`whole`]: whole-file reads and writes

pub mod gather;
mod handle;
pub mod ops;
pub mod query;
pub mod read;
pub mod scanner;
pub mod whole;
pub mod write;

pub use gather::{GatherWrite, NativeGather, SequentialGather, VectoredGather};
pub use handle::SeekPos;
pub use ops::{
    create_directories, delete_directory_if_empty, delete_file, delete_path, delete_path_with,
    HostRemove, RemoveEntry,
};
pub use query::{
    file_size, free_space_for_path, path_exists, path_is_directory, path_is_file, FreeSpace,
};
pub use read::{FileReader, ReadStatus};
pub use scanner::{DirEntry, DirScanner, EntryType, TypedDirScanner};
pub use whole::{
    read_file_into_buffer, read_file_into_object, read_file_into_string, write_buffer_into_file,
    write_object_into_file, write_string_into_file, DEFAULT_MAX_READ_SIZE,
};
pub use write::{Batch, FileWriter, MAX_BATCH_ENTRIES};
