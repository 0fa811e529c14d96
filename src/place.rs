//! The place record.
//!
//! A [`Place`] is a venue or point of interest. Records are read-only here:
//! the host persistence layer creates and mutates them, this crate only reads
//! them to answer questions like "is it live?" or "what is its image tag?".
//!
//! ## Place File Format
//!
//! Places loaded from disk (see [`crate::catalog::load_catalog`]) are one TOML
//! document each:
//!
//! ```toml
//! title = "Royal Albert Hall"
//! slug = "royal-albert-hall"
//! status = "APPROVED"                        # DRAFT | APPROVED
//! published_date = "2024-05-01T09:00:00Z"    # RFC 3339, quoted
//! marker_latitude = 51.5009
//! marker_longitude = -0.1774
//! map_zoom = 15                              # optional
//! you_tube_video_id = "dQw4w9WgXcQ"          # optional
//!
//! [images.main_image]
//! filename = "hall.jpg"
//! alt = "The hall from Kensington Gore"
//! ```

use crate::config::{ConfigLookup, PlacesConfig};
use crate::routes::{UrlGenerator, VIEW_ACTION};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Publication status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    Draft,
    Approved,
}

/// Stored filename and alt text of one image slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageField {
    pub filename: String,
    pub alt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Place {
    pub title: String,
    /// Unique URL key. Derived from the title by the host.
    pub slug: String,
    pub status: Status,
    /// Absent means the place has not been scheduled yet.
    pub published_date: Option<DateTime<Utc>>,
    /// Image slots keyed by configured image type.
    pub images: BTreeMap<String, ImageField>,
    /// 0 means "no marker".
    pub marker_latitude: f64,
    pub marker_longitude: f64,
    pub map_latitude: Option<f64>,
    pub map_longitude: Option<f64>,
    pub map_zoom: Option<u32>,
    pub you_tube_video_id: Option<String>,
}

impl Place {
    /// Approved and published at or before `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == Status::Approved && self.published_date.is_some_and(|date| date <= now)
    }

    /// Whether a marker has been placed. A zero latitude or longitude means
    /// the marker was never set.
    pub fn has_map(&self) -> bool {
        self.marker_latitude != 0.0 && self.marker_longitude != 0.0
    }

    /// Filename stored for `image_type`, or `None` when the slot is empty.
    pub fn image_filename(&self, image_type: &str) -> Option<&str> {
        self.images
            .get(image_type)
            .map(|field| field.filename.as_str())
            .filter(|filename| !filename.is_empty())
    }

    /// Alt text stored for `image_type` (empty when unset).
    pub fn image_alt(&self, image_type: &str) -> &str {
        self.images
            .get(image_type)
            .map(|field| field.alt.as_str())
            .unwrap_or_default()
    }

    /// Image slots that the config does not define.
    pub fn unknown_image_types<'a>(
        &'a self,
        config: &'a PlacesConfig,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.images
            .keys()
            .map(String::as_str)
            .filter(|name| !config.has_image_type(name))
    }

    /// Published date rendered with `views.published_date_format`.
    ///
    /// `None` when the place has no date, or the format is missing or invalid.
    pub fn formatted_published_date<C: ConfigLookup + ?Sized>(&self, config: &C) -> Option<String> {
        let date = self.published_date?;
        let format = config.lookup_str("views.published_date_format")?;
        let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            log::debug!("Invalid published date format {format:?}");
            return None;
        }
        Some(date.format_with_items(items.iter()).to_string())
    }

    /// URL of the place's view page, if the router exposes one.
    pub fn url(&self, routes: &impl UrlGenerator) -> Option<String> {
        routes.action_url(VIEW_ACTION, &self.slug)
    }
}
