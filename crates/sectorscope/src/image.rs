//! Media image readers.
//!
//! The hex view reads one page at a time from the scanned image. Reads that
//! run past the end of the image return the bytes that exist (possibly none);
//! they are never an error.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;

/// Random access to the bytes of a media image.
pub trait ImageReader {
    /// Read up to `len` bytes starting at `offset`.
    ///
    /// Returns fewer than `len` bytes at the end of the image and an empty
    /// buffer when `offset` is at or beyond the end.
    fn read(&mut self, offset: u64, len: usize) -> Result<Vec<u8>>;

    /// Total image size in bytes.
    fn image_size(&self) -> u64;
}

/// Reader over a raw image file on disk.
#[derive(Debug)]
pub struct FileImageReader {
    file: File,
    size: u64,
}

impl FileImageReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }
}

impl ImageReader for FileImageReader {
    fn read(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        if offset >= self.size || len == 0 {
            return Ok(Vec::new());
        }
        let available = (self.size - offset).min(len as u64) as usize;
        let mut buf = Vec::with_capacity(available);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file
            .by_ref()
            .take(available as u64)
            .read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn image_size(&self) -> u64 {
        self.size
    }
}

/// Reader over an image held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageReader {
    bytes: Vec<u8>,
}

impl MemoryImageReader {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl ImageReader for MemoryImageReader {
    fn read(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX);
        if start >= self.bytes.len() {
            return Ok(Vec::new());
        }
        let end = start.saturating_add(len).min(self.bytes.len());
        Ok(self.bytes[start..end].to_vec())
    }

    fn image_size(&self) -> u64 {
        self.bytes.len() as u64
    }
}
