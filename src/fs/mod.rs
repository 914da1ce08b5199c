//! Filesystem Module
//!
//! Plain filesystem operations. Callers validate paths with the access guard first.

mod metadata;
mod read;
mod search;
mod write;

pub use metadata::{file_metadata, mime_type, modified_time, FileMetadata};
pub use read::{
    count_lines, is_ignored_name, list_files, list_regular_files, read_file, FileContent,
    FileEntry, ListOptions, DEFAULT_IGNORE_PATTERNS,
};
pub use search::{search_files, search_text, SearchContext, SearchMatch, SearchOptions, SearchResult};
pub use write::{
    copy_file, create_directory, delete_file, modify_file, move_file, write_file, CopyResult,
    DeleteResult, ModifyResult, MoveResult, WriteResult,
};

// == Public Constants ==
/// Default upper bound for whole-file reads
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default chunk size for chunked reads
pub const DEFAULT_CHUNK_SIZE: u64 = 64 * 1024;
