//! Dimension probe trait and shared types.
//!
//! The production implementation is
//! [`FileProbe`](super::file_probe::FileProbe), which reads image headers from
//! disk. Tests substitute a recording mock.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No image file at {}", .0.display())]
    Missing(PathBuf),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Reads the pixel dimensions of an image file.
pub trait DimensionProbe {
    /// Get image dimensions. A path that is not a regular file is
    /// [`BackendError::Missing`].
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;
}

impl<T: DimensionProbe + ?Sized> DimensionProbe for &T {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        (**self).identify(path)
    }
}
