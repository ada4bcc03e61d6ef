use crate::core::errors::Result;
use crate::models::file_entry::FileEntry;
use crate::services::fs::listing::list_files;
use std::path::Path;

/// Immutable, naturally ordered set of files backing a directory stream.
///
/// Sizes are the ones observed at listing time; files changing afterwards
/// are not tracked.
#[derive(Debug, Clone, Default)]
pub struct FileList {
    entries: Vec<FileEntry>,
}

impl FileList {
    /// Lists `dir` and freezes the result.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_entries(list_files(dir)?))
    }

    /// Wraps entries that are already in stream order.
    pub fn from_entries(entries: Vec<FileEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    /// Size of the file at `index`, or 0 past the end.
    pub fn size_of(&self, index: usize) -> u64 {
        self.entries.get(index).map_or(0, |e| e.size)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    /// Sum of the sizes of every file before `index`.
    pub fn size_before(&self, index: usize) -> u64 {
        self.entries.iter().take(index).map(|e| e.size).sum()
    }

    /// Finds the file holding logical position `target` and the offset inside it.
    ///
    /// The first file whose end is at or past `target` wins. A target sitting
    /// exactly on the boundary between two files therefore resolves to the end
    /// of the earlier file, not the start of the later one. Returns `None`
    /// when `target` lies beyond the total size.
    pub fn locate(&self, target: u64) -> Option<(usize, u64)> {
        let mut start = 0u64;
        for (index, entry) in self.entries.iter().enumerate() {
            if start + entry.size >= target {
                return Some((index, target - start));
            }
            start += entry.size;
        }
        None
    }
}

impl<'a> IntoIterator for &'a FileList {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
