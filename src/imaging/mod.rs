//! Image dimension probing.
//!
//! | Format | Crate / function |
//! |---|---|
//! | JPEG, PNG, TIFF, WebP, GIF | `image::image_dimensions` (header only) |
//! | AVIF | `avif-parse` container metadata |
//!
//! The [`DimensionProbe`] trait is the seam between attribute resolution and
//! the filesystem; [`FileProbe`] is the production implementation.

pub mod backend;
pub mod file_probe;

pub use backend::{BackendError, DimensionProbe, Dimensions};
pub use file_probe::FileProbe;
