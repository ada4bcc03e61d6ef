pub mod registry;

use crate::core::errors::{Error, Result};
use crate::models::file_entry::FileEntry;
use crate::services::fs::file_list::FileList;
use crate::services::fs::listing::is_readable_dir;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Reference point of a seek, mirroring `SEEK_SET`, `SEEK_CUR` and `SEEK_END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

impl Whence {
    fn with_offset(self, offset: i64) -> Option<SeekFrom> {
        match self {
            Whence::Start => u64::try_from(offset).ok().map(SeekFrom::Start),
            Whence::Current => Some(SeekFrom::Current(offset)),
            Whence::End => Some(SeekFrom::End(offset)),
        }
    }
}

/// Mode a stream was opened with. Directory streams are read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(mode: &str) -> Result<Self> {
        match mode {
            "r" | "rb" | "rt" => Ok(OpenMode::Read),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

/// Operations a host needs from a read-only stream.
pub trait ReadableStream {
    /// Opens `target` (optionally `scheme://`-prefixed) with the given mode.
    fn open(target: &str, mode: &str) -> Result<Self>
    where
        Self: Sized;

    /// Reads up to `max_bytes`. A short or empty result only means the end of
    /// the stream when `eof()` is true.
    fn read_chunk(&mut self, max_bytes: usize) -> io::Result<Vec<u8>>;

    /// Current logical position.
    fn tell(&self) -> u64;

    /// Moves to `offset` relative to `whence`. Returns false and leaves the
    /// position untouched when the target is out of range.
    fn seek_to(&mut self, offset: i64, whence: Whence) -> bool;

    fn eof(&self) -> bool;

    /// Releases the underlying handle. Calling it again is a no-op.
    fn close(&mut self);
}

/// The single file handle a stream holds, with its position tracked locally.
#[derive(Debug)]
struct OpenFile {
    file: File,
    offset: u64,
    size: u64,
    exhausted: bool,
}

impl OpenFile {
    fn open(entry: &FileEntry, offset: u64) -> io::Result<Self> {
        let mut file = File::open(&entry.path)?;
        if offset > 0 {
            file.seek(SeekFrom::Start(offset))?;
        }
        Ok(Self {
            file,
            offset,
            size: entry.size,
            exhausted: false,
        })
    }

    fn reposition(&mut self, offset: u64) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.offset = offset;
        self.exhausted = false;
        Ok(())
    }

    fn is_done(&self) -> bool {
        self.exhausted || self.offset >= self.size
    }

    /// Fills `buf` from the file without going past the listed size.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut read = 0;
        while read < buf.len() && !self.is_done() {
            let want = (self.size - self.offset).min((buf.len() - read) as u64) as usize;
            match self.file.read(&mut buf[read..read + want]) {
                // Shorter than listed: the file shrank after listing.
                Ok(0) => self.exhausted = true,
                Ok(n) => {
                    read += n;
                    self.offset += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(_) if read > 0 => break,
                Err(e) => return Err(e),
            }
        }
        Ok(read)
    }
}

/// `index` ranges over `0..=files.len()`; `files.len()` means end of stream.
/// `current`, when present, is always the handle of `files[index]`.
#[derive(Debug)]
struct Cursor {
    index: usize,
    current: Option<OpenFile>,
}

/// Every visible regular file of a directory, read as one continuous stream.
///
/// At most one file is open at a time. Crossing into the next file closes the
/// previous one.
#[derive(Debug)]
pub struct DirectoryStream {
    directory: PathBuf,
    files: FileList,
    cursor: Cursor,
}

impl DirectoryStream {
    /// Opens a stream over `dir`, positioned at its first byte.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let directory = dir.as_ref().to_path_buf();
        if !is_readable_dir(&directory) {
            return Err(Error::DirectoryUnreadable(directory));
        }

        let files = FileList::from_dir(&directory)?;
        let current = match files.get(0) {
            Some(entry) => Some(OpenFile::open(entry, 0)?),
            None => None,
        };
        tracing::debug!("opened {:?} with {} files", directory, files.len());

        Ok(Self {
            directory,
            files,
            cursor: Cursor { index: 0, current },
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn files(&self) -> &FileList {
        &self.files
    }

    /// Length of the whole stream, as listed when it was opened.
    pub fn total_size(&self) -> u64 {
        self.files.total_size()
    }

    fn at_end(&self) -> bool {
        self.cursor.index >= self.files.len()
    }

    /// Opens the handle for the current index if a previous advance failed to.
    fn ensure_open(&mut self) -> io::Result<()> {
        if self.cursor.current.is_none() {
            if let Some(entry) = self.files.get(self.cursor.index) {
                self.cursor.current = Some(OpenFile::open(entry, 0)?);
            }
        }
        Ok(())
    }

    fn advance(&mut self) -> io::Result<()> {
        self.cursor.current = None;
        self.cursor.index += 1;
        if let Some(entry) = self.files.get(self.cursor.index) {
            tracing::debug!("advancing to {:?}", entry.path);
            self.cursor.current = Some(OpenFile::open(entry, 0)?);
        }
        Ok(())
    }

    /// Reads from the current file and moves past it once it is used up.
    fn read_step(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.ensure_open()?;
        let n = match self.cursor.current.as_mut() {
            Some(current) => current.fill(buf)?,
            None => 0,
        };
        if self.cursor.current.as_ref().map_or(true, OpenFile::is_done) {
            if let Err(e) = self.advance() {
                if n == 0 {
                    return Err(e);
                }
            }
        }
        Ok(n)
    }

    fn resolve(&self, pos: SeekFrom) -> Option<u64> {
        let (base, offset) = match pos {
            SeekFrom::Start(target) => return Some(target),
            SeekFrom::Current(offset) => (self.tell(), offset),
            SeekFrom::End(offset) => (self.total_size(), offset),
        };
        base.checked_add_signed(offset)
    }

    /// Moves the cursor to logical position `target`. `Ok(false)` means the
    /// target is past the end and nothing changed.
    fn reposition(&mut self, target: u64) -> io::Result<bool> {
        let Some((index, offset)) = self.files.locate(target) else {
            // An empty stream has exactly one valid position.
            return Ok(self.files.is_empty() && target == 0);
        };

        if let Some(current) = self.cursor.current.as_mut() {
            if self.cursor.index == index {
                current.reposition(offset)?;
                return Ok(true);
            }
        }

        let Some(entry) = self.files.get(index) else {
            return Ok(false);
        };
        // Open the destination before letting go of the current handle so a
        // failure leaves the stream where it was.
        let file = OpenFile::open(entry, offset)?;
        tracing::debug!("seek to {} lands in {:?} at {}", target, entry.path, offset);
        self.cursor = Cursor {
            index,
            current: Some(file),
        };
        Ok(true)
    }
}

impl ReadableStream for DirectoryStream {
    fn open(target: &str, mode: &str) -> Result<Self> {
        mode.parse::<OpenMode>()?;
        Self::open_dir(registry::strip_scheme(target))
    }

    fn read_chunk(&mut self, max_bytes: usize) -> io::Result<Vec<u8>> {
        // Size the buffer by what is left, but keep at least one byte so a
        // cursor parked on a boundary still moves past trailing empty files.
        let remaining = self.total_size().saturating_sub(self.tell()).max(1);
        let budget = usize::try_from(remaining).map_or(max_bytes, |r| r.min(max_bytes));
        let mut buf = vec![0; budget];
        let n = self.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    fn tell(&self) -> u64 {
        let offset = self.cursor.current.as_ref().map_or(0, |f| f.offset);
        self.files.size_before(self.cursor.index) + offset
    }

    fn seek_to(&mut self, offset: i64, whence: Whence) -> bool {
        let Some(target) = whence.with_offset(offset).and_then(|pos| self.resolve(pos)) else {
            return false;
        };
        match self.reposition(target) {
            Ok(moved) => moved,
            Err(e) => {
                tracing::warn!("seek to {} in {:?} failed: {}", target, self.directory, e);
                false
            }
        }
    }

    fn eof(&self) -> bool {
        if self.at_end() {
            return true;
        }
        self.cursor.index + 1 == self.files.len()
            && self.cursor.current.as_ref().is_some_and(OpenFile::is_done)
    }

    fn close(&mut self) {
        self.cursor = Cursor {
            index: self.files.len(),
            current: None,
        };
    }
}

impl Read for DirectoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() && !self.at_end() {
            match self.read_step(&mut buf[filled..]) {
                Ok(n) => filled += n,
                // Hand back what was already read; the error resurfaces on the next call.
                Err(_) if filled > 0 => break,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl Seek for DirectoryStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = self.resolve(pos).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek before start of stream")
        })?;
        if self.reposition(target)? {
            Ok(self.tell())
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("seek to {target} past end of stream ({})", self.total_size()),
            ))
        }
    }
}
