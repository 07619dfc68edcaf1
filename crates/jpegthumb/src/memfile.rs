//! File-like access to in-memory images.
//!
//! A handle reads its JPEG through a [`Source`] and writes through a
//! [`Destination`]; either side may be a file or a memory buffer, and the
//! rest of the crate does not care which.
//!
//! A memory destination is a [`MemorySink`]: a shared, lock-protected
//! buffer. The caller keeps one clone, the handle writes into another, and
//! the encoded bytes are read back from the caller's clone after the encode.

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{ThumbError, ThumbResult};

/// Where a handle's JPEG bytes came from.
#[derive(Debug)]
pub(crate) enum Source {
    /// Read from a file at open time.
    File { path: PathBuf, data: Vec<u8> },
    /// Supplied by the caller.
    Memory { data: Vec<u8> },
}

impl Source {
    /// Reads a whole file.
    pub(crate) fn from_file(path: &Path) -> ThumbResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| ThumbError::OpenFailed(format!("{}: {e}", path.display())))?;
        Ok(Source::File {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Copies a caller buffer.
    pub(crate) fn from_memory(data: &[u8]) -> Self {
        Source::Memory {
            data: data.to_vec(),
        }
    }

    /// The raw JPEG bytes.
    pub(crate) fn bytes(&self) -> &[u8] {
        match self {
            Source::File { data, .. } | Source::Memory { data } => data,
        }
    }

    /// A fresh read stream over the JPEG bytes.
    pub(crate) fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes())
    }

    /// Path of a file-backed source.
    pub(crate) fn path(&self) -> Option<&Path> {
        match self {
            Source::File { path, .. } => Some(path),
            Source::Memory { .. } => None,
        }
    }
}

/// Shared in-memory output buffer.
///
/// Cloning yields another reference to the same buffer. Safe to share
/// between threads.
///
/// # Example
///
/// ```rust
/// use std::io::Write;
/// use jpegthumb::MemorySink;
///
/// let sink = MemorySink::new();
/// let mut writer = sink.clone();
/// writer.write_all(b"\xFF\xD8").unwrap();
/// assert_eq!(sink.bytes(), vec![0xFF, 0xD8]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink(Arc<Mutex<Vec<u8>>>);

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the accumulated bytes.
    pub fn bytes(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Moves the accumulated bytes out, leaving the sink empty.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of accumulated bytes.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where an encode sends its bytes.
#[derive(Debug, Clone)]
pub(crate) enum Destination {
    /// Created (or truncated) when the encode runs.
    File(PathBuf),
    /// Appended to a shared buffer.
    Memory(MemorySink),
}

impl Destination {
    /// Opens the write stream.
    pub(crate) fn open(&self) -> ThumbResult<Box<dyn Write>> {
        match self {
            Destination::File(path) => {
                let file = File::create(path)
                    .map_err(|e| ThumbError::EncodeFailed(format!("{}: {e}", path.display())))?;
                Ok(Box::new(BufWriter::new(file)))
            }
            Destination::Memory(sink) => Ok(Box::new(sink.clone())),
        }
    }

    /// Writes a finished stream in one go.
    pub(crate) fn deliver(&self, bytes: &[u8]) -> ThumbResult<()> {
        let mut out = self.open()?;
        out.write_all(bytes)
            .and_then(|_| out.flush())
            .map_err(|e| ThumbError::EncodeFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    /// Tests that clones share one buffer.
    #[test]
    fn test_sink_shared() {
        let sink = MemorySink::new();
        let dest = Destination::Memory(sink.clone());
        dest.deliver(b"abc").unwrap();
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.take(), b"abc");
        assert!(sink.is_empty());
    }

    /// Tests that the memory source reads back what it was given.
    #[test]
    fn test_memory_source_reader() {
        let src = Source::from_memory(&[1, 2, 3]);
        let mut out = Vec::new();
        src.reader().read_to_end(&mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
        assert!(src.path().is_none());
    }

    /// Tests file source and destination through a temp dir.
    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        Destination::File(path.clone()).deliver(b"xyz").unwrap();

        let src = Source::from_file(&path).unwrap();
        assert_eq!(src.bytes(), b"xyz");
        assert_eq!(src.path(), Some(path.as_path()));
    }

    /// Tests failure mapping for unreadable and unwritable paths.
    #[test]
    fn test_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.jpg");
        assert!(matches!(Source::from_file(&missing), Err(ThumbError::OpenFailed(_))));

        let bad = dir.path().join("no").join("such").join("dir.jpg");
        assert!(matches!(
            Destination::File(bad).deliver(b"x"),
            Err(ThumbError::EncodeFailed(_))
        ));
    }
}
