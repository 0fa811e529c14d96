//! Shared test utilities: place builders, timestamps and image fixtures.

use crate::place::{ImageField, Place, Status};
use chrono::{DateTime, Utc};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Parse an RFC 3339 timestamp. Panics on malformed input.
pub fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp
        .parse()
        .unwrap_or_else(|e| panic!("bad timestamp {timestamp:?}: {e}"))
}

/// Approved place with the given slug and publication date.
pub fn approved_place(slug: &str, published: &str) -> Place {
    Place {
        title: slug.replace('-', " "),
        slug: slug.to_string(),
        status: Status::Approved,
        published_date: Some(at(published)),
        ..Place::default()
    }
}

/// Draft place with a single image slot filled in.
pub fn place_with_image(slug: &str, image_type: &str, filename: &str) -> Place {
    let mut place = Place {
        title: slug.to_string(),
        slug: slug.to_string(),
        ..Place::default()
    };
    place.images.insert(
        image_type.to_string(),
        ImageField {
            filename: filename.to_string(),
            alt: String::new(),
        },
    );
    place
}

/// Write a solid PNG of the given size at `root/rel`, creating parent
/// directories. Returns the full path.
pub fn write_png(root: &Path, rel: &str, width: u32, height: u32) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_pixel(width, height, image::Rgb([200, 80, 40]))
        .save(&path)
        .unwrap();
    path
}
