//! Read every visible regular file of a directory as one seekable byte stream.
//!
//! Files are concatenated in natural order of their names, so `part2` comes
//! before `part10`.

pub mod core;
pub mod models;
pub mod services;

pub use crate::core::errors::{Error, Result};
pub use crate::models::file_entry::FileEntry;
pub use crate::services::fs::file_list::FileList;
pub use crate::services::fs::listing::{list_files, list_files_async};
pub use crate::services::fs::natural::natural_cmp;
pub use crate::services::stream::registry::{ProtocolRegistry, DEFAULT_PROTOCOL_NAME};
pub use crate::services::stream::{DirectoryStream, OpenMode, ReadableStream, Whence};
