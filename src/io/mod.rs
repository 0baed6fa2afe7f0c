//! Whole-file loading for image scans.
//!
//! An [`Image`] is a read-only memory map of the input file. The size
//! reported by the file metadata is checked against the mapped length so
//! a file that shrinks between stat and map is reported as a short read.

pub mod error;

use crate::io::error::{IoError, Result};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resource limits for loading an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoLimits {
    /// The absolute maximum file size that will be mapped.
    pub max_file_size: u64,
}

impl Default for IoLimits {
    fn default() -> Self {
        Self {
            max_file_size: 256 * 1024 * 1024, // 256MB
        }
    }
}

/// A firmware image held as one contiguous read-only buffer.
#[derive(Debug)]
pub struct Image {
    path: PathBuf,
    mmap: Mmap,
}

impl Image {
    /// Opens and maps `path`.
    ///
    /// Empty files cannot be mapped and are reported as [`IoError::Empty`].
    pub fn open<P: AsRef<Path>>(path: P, limits: &IoLimits) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let file_size = file
            .metadata()
            .map_err(|source| IoError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        debug!(
            path = %path.display(),
            size = file_size,
            limits.max_file_size = limits.max_file_size,
            "Opening image"
        );

        if file_size > limits.max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                limit = limits.max_file_size,
                "File is too large"
            );
            return Err(IoError::FileTooLarge {
                limit: limits.max_file_size,
                found: file_size,
            });
        }
        if file_size == 0 {
            return Err(IoError::Empty {
                path: path.to_path_buf(),
            });
        }

        // Safety: the map is read-only. Truncating the file while it is
        // mapped is undefined behavior; images are inputs, not scratch files.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| IoError::Map {
            path: path.to_path_buf(),
            source,
        })?;

        if mmap.len() as u64 != file_size {
            return Err(IoError::ShortRead {
                expected: file_size,
                found: mmap.len() as u64,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }
}

impl Deref for Image {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.mmap
    }
}

impl AsRef<[u8]> for Image {
    fn as_ref(&self) -> &[u8] {
        &self.mmap
    }
}
