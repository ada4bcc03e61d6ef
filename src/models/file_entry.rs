use serde::Serialize;
use std::path::PathBuf;

/// A regular file selected for the stream, with its size captured at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}
