//! On-disk dimension probe.
//!
//! Only headers are read; nothing is decoded.
//!
//! | Format | Crate / function |
//! |---|---|
//! | JPEG, PNG, TIFF, WebP, GIF | `image::image_dimensions` |
//! | AVIF | `avif-parse` primary item metadata |

use super::backend::{BackendError, DimensionProbe, Dimensions};
use std::path::Path;

/// Probe that reads image headers from the filesystem.
pub struct FileProbe;

impl FileProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileProbe {
    fn default() -> Self {
        Self::new()
    }
}

fn is_avif(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("avif"))
}

/// Extract dimensions from an AVIF file's container metadata.
fn identify_avif(path: &Path) -> Result<Dimensions, BackendError> {
    let file_data = std::fs::read(path)?;
    let avif = avif_parse::read_avif(&mut std::io::Cursor::new(&file_data)).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to parse AVIF {}: {e:?}", path.display()))
    })?;
    let meta = avif.primary_item_metadata().map_err(|e| {
        BackendError::ProcessingFailed(format!(
            "Failed to read AVIF metadata {}: {e:?}",
            path.display()
        ))
    })?;
    Ok(Dimensions {
        width: meta.max_frame_width.get(),
        height: meta.max_frame_height.get(),
    })
}

impl DimensionProbe for FileProbe {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        if !path.is_file() {
            return Err(BackendError::Missing(path.to_path_buf()));
        }
        if is_avif(path) {
            return identify_avif(path);
        }
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {e}",
                path.display()
            ))
        })?;
        Ok(Dimensions { width, height })
    }
}
