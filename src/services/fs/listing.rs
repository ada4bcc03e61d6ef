use crate::core::errors::{Error, Result};
use crate::models::file_entry::FileEntry;
use crate::services::fs::natural::natural_cmp;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tokio::task;

const HIDDEN_MARKER: char = '.';

/// Lists the files of `path` that make up a directory stream, in natural order.
///
/// Hidden entries, anything that is not a regular file (symlinks are followed)
/// and files the caller cannot open for reading are left out.
pub fn list_files(path: impl AsRef<Path>) -> Result<Vec<FileEntry>> {
    list_files_impl(path.as_ref())
}

/// Async variant for callers running inside a tokio runtime.
pub async fn list_files_async(path: impl Into<PathBuf>) -> Result<Vec<FileEntry>> {
    // Directory scans are blocking; keep them off the async executor.
    let path = path.into();
    task::spawn_blocking(move || list_files_impl(&path))
        .await
        .map_err(|e| Error::Other(format!("listing task failed: {e}")))?
}

/// True when `path` is a directory whose entries the caller can enumerate.
pub fn is_readable_dir(path: &Path) -> bool {
    path.is_dir() && fs::read_dir(path).is_ok()
}

fn list_files_impl(dir: &Path) -> Result<Vec<FileEntry>> {
    let unreadable = || Error::DirectoryUnreadable(dir.to_path_buf());
    if !dir.is_dir() {
        return Err(unreadable());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|_| unreadable())? {
        let entry = entry?;
        let name = os_str_to_string(entry.file_name());
        let path = entry.path();

        if name.starts_with(HIDDEN_MARKER) {
            tracing::debug!("skipping hidden entry {:?}", path);
            continue;
        }

        let size = match fs::metadata(&path) {
            Ok(md) if md.is_file() => md.len(),
            Ok(_) => {
                tracing::debug!("skipping non-regular entry {:?}", path);
                continue;
            }
            Err(e) => {
                tracing::debug!("skipping entry {:?}: {}", path, e);
                continue;
            }
        };

        if let Err(e) = File::open(&path) {
            tracing::debug!("skipping unreadable file {:?}: {}", path, e);
            continue;
        }

        entries.push(FileEntry { name, path, size });
    }

    // Ties (names differing only by leading zeros) fall back to byte order so
    // the result does not depend on the directory's enumeration order.
    entries.sort_by(|a, b| natural_cmp(&a.name, &b.name).then_with(|| a.name.cmp(&b.name)));
    tracing::debug!("listed {} files in {:?}", entries.len(), dir);

    Ok(entries)
}

fn os_str_to_string(s: impl AsRef<OsStr>) -> String {
    s.as_ref().to_string_lossy().into_owned()
}
