//! Image attribute resolution.
//!
//! Computes `src`, `width` and `height` for a place's image slot at a given
//! size, and renders the `<img>` tag from them.
//!
//! ## Config Resolution
//!
//! Every property is read through [`ConfigLookup`] under one of three keys:
//!
//! ```text
//! size = none         images.<type>.<property>
//! size = "original"   images.<type>.original.<property>
//! size = <name>       images.<type>.sizes.<name>.<property>
//! ```
//!
//! The `original` size never falls through to `sizes.original`.
//!
//! ## Where Dimensions Come From
//!
//! The size's [`ResizeMethod`] decides whether each dimension is the configured
//! value or is read from the image file under `public_path`:
//!
//! | Method | width | height |
//! |---|---|---|
//! | `portrait` | file | config |
//! | `landscape` | config | file |
//! | `auto`, `fit`, `crop` | file | file |
//! | `fixed` (or unset) | config | config |
//!
//! A missing or unreadable file yields unknown (`None`) dimensions rather
//! than an error. An empty image slot yields `None` for everything, and the
//! file is never touched.

use crate::config::ConfigLookup;
use crate::imaging::{Dimensions, DimensionProbe};
use crate::place::Place;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Cropping/scaling policy of an image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMethod {
    Portrait,
    Landscape,
    Auto,
    Fit,
    Crop,
    Fixed,
}

impl ResizeMethod {
    /// Width floats with the file for portrait crops and free-form methods.
    pub fn width_from_file(self) -> bool {
        matches!(self, Self::Portrait | Self::Auto | Self::Fit | Self::Crop)
    }

    /// Height floats with the file for landscape crops and free-form methods.
    pub fn height_from_file(self) -> bool {
        matches!(self, Self::Landscape | Self::Auto | Self::Fit | Self::Crop)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
            Self::Auto => "auto",
            Self::Fit => "fit",
            Self::Crop => "crop",
            Self::Fixed => "fixed",
        }
    }
}

impl FromStr for ResizeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            "auto" => Ok(Self::Auto),
            "fit" => Ok(Self::Fit),
            "crop" => Ok(Self::Crop),
            "fixed" => Ok(Self::Fixed),
            other => Err(format!("unknown resize method: {other}")),
        }
    }
}

impl fmt::Display for ResizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rendering of an image slot is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSize {
    /// No size: the image type's own settings.
    Base,
    /// The uploaded original.
    Original,
    /// A named preset under `sizes`.
    Named(String),
}

impl ImageSize {
    /// `None` → [`Base`](Self::Base), `"original"` → [`Original`](Self::Original),
    /// anything else → [`Named`](Self::Named).
    pub fn parse(size: Option<&str>) -> Self {
        match size {
            None => Self::Base,
            Some("original") => Self::Original,
            Some(name) => Self::Named(name.to_string()),
        }
    }
}

impl From<Option<&str>> for ImageSize {
    fn from(size: Option<&str>) -> Self {
        Self::parse(size)
    }
}

impl From<&str> for ImageSize {
    fn from(size: &str) -> Self {
        Self::parse(Some(size))
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Original => f.write_str("original"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Per-size image setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageProperty {
    Dir,
    Method,
    Width,
    Height,
}

impl ImageProperty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dir => "dir",
            Self::Method => "method",
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

/// Dotted config key for one property of an image type at a size.
pub fn image_config_key(image_type: &str, size: &ImageSize, property: ImageProperty) -> String {
    let property = property.as_str();
    match size {
        ImageSize::Base => format!("images.{image_type}.{property}"),
        ImageSize::Original => format!("images.{image_type}.original.{property}"),
        ImageSize::Named(name) => format!("images.{image_type}.sizes.{name}.{property}"),
    }
}

/// Resolved rendering attributes of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttributes {
    pub src: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Resolves image attributes from injected configuration and a dimension
/// probe.
pub struct ImageAttributeResolver<'a, C: ConfigLookup + ?Sized, B: DimensionProbe> {
    config: &'a C,
    backend: B,
    public_root: PathBuf,
}

impl<'a, C: ConfigLookup + ?Sized, B: DimensionProbe> ImageAttributeResolver<'a, C, B> {
    /// Files are probed under the configured `public_path` (or the working
    /// directory when unset). [`load_config`](crate::config::load_config)
    /// has already anchored a relative `public_path` to the places directory.
    pub fn new(config: &'a C, backend: B) -> Self {
        let public_root = config
            .lookup_str("public_path")
            .map(PathBuf::from)
            .unwrap_or_default();
        Self {
            config,
            backend,
            public_root,
        }
    }

    pub fn with_public_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.public_root = root.into();
        self
    }

    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn method(&self, image_type: &str, size: &ImageSize) -> Option<ResizeMethod> {
        let key = image_config_key(image_type, size, ImageProperty::Method);
        self.config.lookup_str(&key)?.parse().ok()
    }

    fn configured(&self, image_type: &str, size: &ImageSize, property: ImageProperty) -> Option<u32> {
        self.config
            .lookup_u32(&image_config_key(image_type, size, property))
    }

    /// Value for the `src` attribute: the size's `dir` followed by the
    /// stored filename.
    pub fn src(&self, place: &Place, image_type: &str, size: &ImageSize) -> Option<String> {
        let filename = place.image_filename(image_type)?;
        let dir = self
            .config
            .lookup_str(&image_config_key(image_type, size, ImageProperty::Dir))
            .unwrap_or_default();
        Some(format!("{dir}{filename}"))
    }

    pub fn width(&self, place: &Place, image_type: &str, size: &ImageSize) -> Option<u32> {
        place.image_filename(image_type)?;
        if self
            .method(image_type, size)
            .is_some_and(ResizeMethod::width_from_file)
        {
            return self.measure(place, image_type, size).map(|d| d.width);
        }
        self.configured(image_type, size, ImageProperty::Width)
    }

    pub fn height(&self, place: &Place, image_type: &str, size: &ImageSize) -> Option<u32> {
        place.image_filename(image_type)?;
        if self
            .method(image_type, size)
            .is_some_and(ResizeMethod::height_from_file)
        {
            return self.measure(place, image_type, size).map(|d| d.height);
        }
        self.configured(image_type, size, ImageProperty::Height)
    }

    /// Dimensions of the file at `path`, or `None` when it is missing or
    /// cannot be identified.
    pub fn measure_image(&self, path: &Path) -> Option<Dimensions> {
        match self.backend.identify(path) {
            Ok(dims) => Some(dims),
            Err(e) => {
                log::debug!("No dimensions for {}: {e}", path.display());
                None
            }
        }
    }

    fn measure(&self, place: &Place, image_type: &str, size: &ImageSize) -> Option<Dimensions> {
        let src = self.src(place, image_type, size)?;
        self.measure_image(&self.public_root.join(src.trim_start_matches('/')))
    }

    /// All attributes at once. The file is probed at most once.
    pub fn attributes(
        &self,
        place: &Place,
        image_type: &str,
        size: &ImageSize,
    ) -> Option<ImageAttributes> {
        let src = self.src(place, image_type, size)?;
        let method = self.method(image_type, size);
        let width_from_file = method.is_some_and(ResizeMethod::width_from_file);
        let height_from_file = method.is_some_and(ResizeMethod::height_from_file);
        let measured = if width_from_file || height_from_file {
            self.measure(place, image_type, size)
        } else {
            None
        };

        let width = if width_from_file {
            measured.map(|d| d.width)
        } else {
            self.configured(image_type, size, ImageProperty::Width)
        };
        let height = if height_from_file {
            measured.map(|d| d.height)
        } else {
            self.configured(image_type, size, ImageProperty::Height)
        };

        Some(ImageAttributes {
            src,
            alt: place.image_alt(image_type).to_string(),
            width,
            height,
        })
    }

    /// `<img>` tag for the slot, or `None` when the slot is empty.
    ///
    /// Unknown dimensions leave the attribute out.
    pub fn img_tag(&self, place: &Place, image_type: &str, size: &ImageSize) -> Option<Markup> {
        let attrs = self.attributes(place, image_type, size)?;
        Some(html! {
            img src=(attrs.src) alt=(attrs.alt) width=[attrs.width] height=[attrs.height];
        })
    }
}
