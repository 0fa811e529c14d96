//! CLI output formatting.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! 001 Royal Albert Hall
//!     Slug: royal-albert-hall
//!     Status: live
//!     Published: 1 May 2024
//!     URL: /places/royal-albert-hall
//! ```
//!
//! ## Show
//!
//! ```text
//! Royal Albert Hall
//!     Slug: royal-albert-hall
//!     Status: live
//!     Published: 1 May 2024
//!     URL: /places/royal-albert-hall
//!     Map: 51.5009, -0.1774 (zoom 12)
//!     YouTube: <iframe ...></iframe>
//! Images
//!     main_image
//!         base: <img src="/uploads/places/main_image/hall.jpg" alt="The hall">
//!         thumbnail: <img src="..." alt="The hall" width="150" height="150">
//! ```
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout.

use crate::attributes::{ImageAttributeResolver, ImageSize};
use crate::config::{ConfigLookup, PlacesConfig};
use crate::imaging::DimensionProbe;
use crate::map;
use crate::place::{Place, Status};
use crate::routes::UrlGenerator;
use crate::youtube;
use chrono::{DateTime, Utc};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn status_label(place: &Place, now: DateTime<Utc>) -> &'static str {
    match place.status {
        Status::Draft => "draft",
        Status::Approved if place.is_live(now) => "live",
        Status::Approved if place.published_date.is_some() => "scheduled",
        Status::Approved => "unscheduled",
    }
}

/// Slug, status, date and URL lines shared by both views.
fn summary_lines<C: ConfigLookup + ?Sized>(
    place: &Place,
    config: &C,
    routes: &impl UrlGenerator,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = vec![
        format!("{}Slug: {}", indent(1), place.slug),
        format!("{}Status: {}", indent(1), status_label(place, now)),
    ];
    if let Some(date) = place.formatted_published_date(config) {
        lines.push(format!("{}Published: {}", indent(1), date));
    }
    if let Some(url) = place.url(routes) {
        lines.push(format!("{}URL: {}", indent(1), url));
    }
    lines
}

/// Format a list of places, one entity block each.
pub fn format_place_list<C: ConfigLookup + ?Sized>(
    places: &[&Place],
    config: &C,
    routes: &impl UrlGenerator,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, place) in places.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), place.title));
        lines.extend(summary_lines(place, config, routes, now));
    }
    lines.push(place_count(places.len()));
    lines
}

/// "1 place", "3 places".
pub fn place_count(n: usize) -> String {
    if n == 1 {
        "1 place".to_string()
    } else {
        format!("{n} places")
    }
}

/// Sizes to show for an image type: base, original (when configured), then
/// every named size.
fn sizes_for(config: &PlacesConfig, image_type: &str) -> Vec<ImageSize> {
    let mut sizes = vec![ImageSize::Base];
    if let Some(settings) = config.images.get(image_type) {
        if settings.original.is_some() {
            sizes.push(ImageSize::Original);
        }
        sizes.extend(settings.sizes.keys().cloned().map(ImageSize::Named));
    }
    sizes
}

/// Format every resolved attribute of a single place.
pub fn format_place_detail<C, B>(
    place: &Place,
    settings: &PlacesConfig,
    resolver: &ImageAttributeResolver<'_, C, B>,
    config: &C,
    routes: &impl UrlGenerator,
    now: DateTime<Utc>,
) -> Vec<String>
where
    C: ConfigLookup + ?Sized,
    B: DimensionProbe,
{
    let mut lines = vec![place.title.clone()];
    lines.extend(summary_lines(place, config, routes, now));

    if place.has_map() {
        let (lat, lng) = map::centre(place, config);
        let zoom = map::zoom(place, config)
            .map(|z| format!(" (zoom {z})"))
            .unwrap_or_default();
        lines.push(format!("{}Map: {lat}, {lng}{zoom}", indent(1)));
    }
    if let Some(embed) = youtube::embed_code(place, config) {
        lines.push(format!("{}YouTube: {}", indent(1), embed));
    }

    lines.push("Images".to_string());
    for image_type in settings.images.keys() {
        lines.push(format!("{}{}", indent(1), image_type));
        for size in sizes_for(settings, image_type) {
            let rendered = resolver
                .img_tag(place, image_type, &size)
                .map(|tag| tag.into_string())
                .unwrap_or_else(|| "(empty)".to_string());
            lines.push(format!("{}{}: {}", indent(2), size, rendered));
        }
    }
    lines
}

pub fn print_place_list<C: ConfigLookup + ?Sized>(
    places: &[&Place],
    config: &C,
    routes: &impl UrlGenerator,
    now: DateTime<Utc>,
) {
    for line in format_place_list(places, config, routes, now) {
        println!("{}", line);
    }
}

pub fn print_place_detail<C, B>(
    place: &Place,
    settings: &PlacesConfig,
    resolver: &ImageAttributeResolver<'_, C, B>,
    config: &C,
    routes: &impl UrlGenerator,
    now: DateTime<Utc>,
) where
    C: ConfigLookup + ?Sized,
    B: DimensionProbe,
{
    for line in format_place_detail(place, settings, resolver, config, routes, now) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use crate::imaging::backend::tests::MockProbe;
    use crate::routes::BuiltInRoutes;
    use crate::test_helpers::{approved_place, at};

    fn now() -> DateTime<Utc> {
        at("2024-06-01T12:00:00Z")
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn status_labels() {
        let mut place = approved_place("hall", "2024-05-01T09:00:00Z");
        assert_eq!(status_label(&place, now()), "live");
        place.published_date = Some(at("2025-01-01T00:00:00Z"));
        assert_eq!(status_label(&place, now()), "scheduled");
        place.published_date = None;
        assert_eq!(status_label(&place, now()), "unscheduled");
        place.status = Status::Draft;
        assert_eq!(status_label(&place, now()), "draft");
    }

    #[test]
    fn list_shows_entity_blocks() {
        let config = ConfigStore::default();
        let routes = BuiltInRoutes::from_config(&config);
        let mut hall = approved_place("royal-albert-hall", "2024-05-01T09:00:00Z");
        hall.title = "Royal Albert Hall".to_string();

        let lines = format_place_list(&[&hall], &config, &routes, now());
        assert_eq!(
            lines,
            vec![
                "001 Royal Albert Hall",
                "    Slug: royal-albert-hall",
                "    Status: live",
                "    Published: 1 May 2024",
                "    URL: /places/royal-albert-hall",
                "1 place",
            ]
        );
    }

    #[test]
    fn place_count_pluralizes() {
        assert_eq!(place_count(0), "0 places");
        assert_eq!(place_count(1), "1 place");
        assert_eq!(place_count(2), "2 places");
    }

    #[test]
    fn detail_lists_every_configured_size() {
        let config = ConfigStore::default();
        let routes = BuiltInRoutes::from_config(&config);
        let resolver = ImageAttributeResolver::new(&config, MockProbe::missing());
        let mut hall = approved_place("hall", "2024-05-01T09:00:00Z");
        hall.title = "Hall".to_string();
        hall.marker_latitude = 51.5;
        hall.marker_longitude = -0.17;
        hall.images.insert(
            "main_image".to_string(),
            crate::place::ImageField {
                filename: "hall.jpg".to_string(),
                alt: "Hall".to_string(),
            },
        );

        let lines = format_place_detail(
            &hall,
            config.settings(),
            &resolver,
            &config,
            &routes,
            now(),
        );
        assert!(lines.contains(&"    Map: 51.5, -0.17 (zoom 12)".to_string()));
        assert!(lines.contains(&"    main_image".to_string()));
        assert!(lines.contains(
            &r#"        base: <img src="/uploads/places/main_image/hall.jpg" alt="Hall">"#
                .to_string()
        ));
        assert!(lines.contains(
            &r#"        original: <img src="/uploads/places/main_image/original/hall.jpg" alt="Hall">"#
                .to_string()
        ));
        // resized is landscape: width from config, height unknown without the file
        assert!(lines.contains(
            &r#"        resized: <img src="/uploads/places/main_image/resized/hall.jpg" alt="Hall" width="600">"#
                .to_string()
        ));
        assert!(!lines.iter().any(|l| l.contains("YouTube")));
    }

    #[test]
    fn detail_marks_empty_slots() {
        let config = ConfigStore::default();
        let routes = BuiltInRoutes::from_config(&config);
        let resolver = ImageAttributeResolver::new(&config, MockProbe::missing());
        let hall = approved_place("hall", "2024-05-01T09:00:00Z");

        let lines = format_place_detail(
            &hall,
            config.settings(),
            &resolver,
            &config,
            &routes,
            now(),
        );
        assert!(lines.contains(&"        thumbnail: (empty)".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Map:")));
    }
}
