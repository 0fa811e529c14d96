//! Places configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the user file in the places directory; the merged tree is kept
//! around as a [`ConfigStore`] so consumers can read any setting by its dotted
//! key through the [`ConfigLookup`] trait.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! public_path = "public"    # Image file root, relative to the places directory
//!
//! [images.main_image]
//! dir = "/uploads/places/main_image/"
//!
//! [images.main_image.original]
//! dir = "/uploads/places/main_image/original/"
//!
//! [images.main_image.sizes.thumbnail]
//! dir = "/uploads/places/main_image/thumbnail/"
//! method = "crop"           # portrait | landscape | auto | fit | crop | fixed
//! width = 150
//! height = 150
//!
//! [you_tube]
//! thumbnail_code = "<img src=\"https://img.youtube.com/vi/%YOU_TUBE_VIDEO_ID%/0.jpg\" />"
//! embed_code = "<iframe src=\"https://www.youtube.com/embed/%YOU_TUBE_VIDEO_ID%\"></iframe>"
//!
//! [map]
//! variable_map_zoom = false
//! default_map_zoom = 12
//! map_centre_different_to_marker = false
//!
//! [views]
//! published_date_format = "%-d %B %Y"
//!
//! [routes]
//! use_built_in_routes = true
//! uri = "places"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Image type and size names
//! become segments of dotted lookup keys, so they may not contain dots.

use crate::attributes::ResizeMethod;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Highest zoom level offered by web map tile servers.
pub const MAX_MAP_ZOOM: u32 = 21;

/// Typed view of the places configuration.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacesConfig {
    /// Filesystem root that image `dir` prefixes are resolved against when
    /// probing dimensions.
    pub public_path: String,
    /// Image slots keyed by image type name (e.g. `main_image`).
    pub images: BTreeMap<String, ImageTypeConfig>,
    pub you_tube: YouTubeConfig,
    pub map: MapConfig,
    pub views: ViewsConfig,
    pub routes: RoutesConfig,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        let mut sizes = BTreeMap::new();
        sizes.insert(
            "thumbnail".to_string(),
            ImageSizeConfig {
                dir: Some("/uploads/places/main_image/thumbnail/".to_string()),
                method: Some(ResizeMethod::Crop),
                width: Some(150),
                height: Some(150),
            },
        );
        sizes.insert(
            "resized".to_string(),
            ImageSizeConfig {
                dir: Some("/uploads/places/main_image/resized/".to_string()),
                method: Some(ResizeMethod::Landscape),
                width: Some(600),
                height: Some(400),
            },
        );
        let mut images = BTreeMap::new();
        images.insert(
            "main_image".to_string(),
            ImageTypeConfig {
                dir: Some("/uploads/places/main_image/".to_string()),
                method: None,
                width: None,
                height: None,
                original: Some(ImageSizeConfig {
                    dir: Some("/uploads/places/main_image/original/".to_string()),
                    ..ImageSizeConfig::default()
                }),
                sizes,
            },
        );
        Self {
            public_path: "public".to_string(),
            images,
            you_tube: YouTubeConfig::default(),
            map: MapConfig::default(),
            views: ViewsConfig::default(),
            routes: RoutesConfig::default(),
        }
    }
}

impl PlacesConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, image_type) in &self.images {
            validate_segment("image type", name)?;
            for size in image_type.sizes.keys() {
                validate_segment("image size", size)?;
            }
        }
        if self.routes.uri.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "routes.uri must not be empty".into(),
            ));
        }
        if self.map.default_map_zoom > MAX_MAP_ZOOM {
            return Err(ConfigError::Validation(format!(
                "map.default_map_zoom must be 0-{MAX_MAP_ZOOM}"
            )));
        }
        if StrftimeItems::new(&self.views.published_date_format)
            .any(|item| matches!(item, Item::Error))
        {
            return Err(ConfigError::Validation(format!(
                "views.published_date_format is not a valid date format: {:?}",
                self.views.published_date_format
            )));
        }
        Ok(())
    }

    /// Returns true if `name` is a configured image type.
    pub fn has_image_type(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }
}

fn validate_segment(kind: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.contains('.') {
        return Err(ConfigError::Validation(format!(
            "{kind} name {name:?} must be non-empty and contain no dots"
        )));
    }
    Ok(())
}

/// Settings for one named image slot.
///
/// The top-level `dir`/`method`/`width`/`height` apply when no size is
/// requested; `original` and `sizes.<name>` apply to those sizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageTypeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ResizeMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<ImageSizeConfig>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sizes: BTreeMap<String, ImageSizeConfig>,
}

/// Directory, resize method and target dimensions of one image size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageSizeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ResizeMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// HTML templates for YouTube media. `%YOU_TUBE_VIDEO_ID%` is replaced with
/// the record's video id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YouTubeConfig {
    pub thumbnail_code: String,
    pub embed_code: String,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            thumbnail_code:
                r#"<img src="https://img.youtube.com/vi/%YOU_TUBE_VIDEO_ID%/0.jpg" alt="" />"#
                    .to_string(),
            embed_code: r#"<iframe width="560" height="315" src="https://www.youtube.com/embed/%YOU_TUBE_VIDEO_ID%" frameborder="0" allowfullscreen></iframe>"#
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Use each record's own `map_zoom` instead of `default_map_zoom`.
    pub variable_map_zoom: bool,
    pub default_map_zoom: u32,
    /// Use each record's `map_latitude`/`map_longitude` as the map centre
    /// instead of the marker position.
    pub map_centre_different_to_marker: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            variable_map_zoom: false,
            default_map_zoom: 12,
            map_centre_different_to_marker: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewsConfig {
    /// chrono strftime pattern for published dates.
    pub published_date_format: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            published_date_format: "%-d %B %Y".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    /// Whether the built-in `/{uri}` and `/{uri}/{slug}` routes are exposed.
    pub use_built_in_routes: bool,
    /// Base URI for the places.
    pub uri: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            use_built_in_routes: true,
            uri: "places".to_string(),
        }
    }
}

// =============================================================================
// Dotted-key lookup
// =============================================================================

/// Read access to configuration values by dotted key, e.g.
/// `images.main_image.sizes.thumbnail.width`.
///
/// Missing keys (and values of the wrong type) resolve to `None`, never an
/// error.
pub trait ConfigLookup {
    fn lookup(&self, key: &str) -> Option<&toml::Value>;

    fn lookup_str(&self, key: &str) -> Option<&str> {
        self.lookup(key).and_then(toml::Value::as_str)
    }

    fn lookup_bool(&self, key: &str) -> Option<bool> {
        self.lookup(key).and_then(toml::Value::as_bool)
    }

    fn lookup_u32(&self, key: &str) -> Option<u32> {
        self.lookup(key)
            .and_then(toml::Value::as_integer)
            .and_then(|n| u32::try_from(n).ok())
    }
}

impl ConfigLookup for toml::Value {
    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        key.split('.').try_fold(self, |node, segment| node.get(segment))
    }
}

/// Merged and validated configuration.
///
/// Holds both the raw merged TOML tree (for [`ConfigLookup`]) and its typed
/// [`PlacesConfig`] view. Both always describe the same settings.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    tree: toml::Value,
    settings: PlacesConfig,
}

impl ConfigStore {
    pub fn settings(&self) -> &PlacesConfig {
        &self.settings
    }

    pub fn tree(&self) -> &toml::Value {
        &self.tree
    }

    /// Resolve a relative `public_path` against `root`. Absolute paths are
    /// left alone.
    pub fn anchor_public_path(&mut self, root: &Path) {
        let public_path = Path::new(&self.settings.public_path);
        if public_path.is_absolute() {
            return;
        }
        let anchored = root.join(public_path).to_string_lossy().into_owned();
        if let toml::Value::Table(table) = &mut self.tree {
            table.insert(
                "public_path".to_string(),
                toml::Value::String(anchored.clone()),
            );
        }
        self.settings.public_path = anchored;
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        resolve_config(stock_defaults_value(), None).expect("stock defaults must validate")
    }
}

impl ConfigLookup for ConfigStore {
    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        self.tree.lookup(key)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PlacesConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    log::debug!("Merging user config from {}", config_path.display());
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ConfigStore, ConfigError> {
    let tree = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: PlacesConfig = tree.clone().try_into()?;
    settings.validate()?;
    Ok(ConfigStore { tree, settings })
}

/// Load config from `config.toml` in the given directory, on top of the stock
/// defaults. A relative `public_path` is taken relative to that directory.
pub fn load_config(root: &Path) -> Result<ConfigStore, ConfigError> {
    let mut store = resolve_config(stock_defaults_value(), load_raw_config(root)?)?;
    store.anchor_public_path(root);
    Ok(store)
}

/// Parse a config document held in memory, on top of the stock defaults.
pub fn config_from_str(content: &str) -> Result<ConfigStore, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Places Configuration
# ====================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Filesystem root that image dirs are resolved against when the width or
# height of an image has to be read from the file itself. A relative path is
# taken relative to the directory holding this file.
public_path = "public"

# ---------------------------------------------------------------------------
# Image types
# ---------------------------------------------------------------------------
# One table per image slot on a place. Each place stores a filename (and alt
# text) per image type. Settings are looked up as:
#   no size           -> images.<type>.<property>
#   size "original"   -> images.<type>.original.<property>
#   any other size    -> images.<type>.sizes.<size>.<property>
#
# method decides where width/height come from:
#   portrait            width is read from the file, height from config
#   landscape           height is read from the file, width from config
#   auto | fit | crop   both are read from the file
#   fixed               both come from config
[images.main_image]
dir = "/uploads/places/main_image/"

[images.main_image.original]
dir = "/uploads/places/main_image/original/"

[images.main_image.sizes.resized]
dir = "/uploads/places/main_image/resized/"
method = "landscape"
width = 600
height = 400

[images.main_image.sizes.thumbnail]
dir = "/uploads/places/main_image/thumbnail/"
method = "crop"
width = 150
height = 150

# ---------------------------------------------------------------------------
# YouTube
# ---------------------------------------------------------------------------
# %YOU_TUBE_VIDEO_ID% is replaced with the place's video id.
[you_tube]
thumbnail_code = '<img src="https://img.youtube.com/vi/%YOU_TUBE_VIDEO_ID%/0.jpg" alt="" />'
embed_code = '<iframe width="560" height="315" src="https://www.youtube.com/embed/%YOU_TUBE_VIDEO_ID%" frameborder="0" allowfullscreen></iframe>'

# ---------------------------------------------------------------------------
# Map
# ---------------------------------------------------------------------------
[map]
# Let each place set its own zoom level (otherwise default_map_zoom is used).
variable_map_zoom = false
# Zoom level 0-21.
default_map_zoom = 12
# Let each place centre its map away from its marker.
map_centre_different_to_marker = false

# ---------------------------------------------------------------------------
# Views
# ---------------------------------------------------------------------------
[views]
# strftime pattern, e.g. "%-d %B %Y" -> "5 May 2024".
published_date_format = "%-d %B %Y"

# ---------------------------------------------------------------------------
# Routes
# ---------------------------------------------------------------------------
[routes]
# Expose /<uri> and /<uri>/<slug>.
use_built_in_routes = true
uri = "places"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_main_image() {
        let config = PlacesConfig::default();
        let main = &config.images["main_image"];
        assert_eq!(main.dir.as_deref(), Some("/uploads/places/main_image/"));
        assert_eq!(main.sizes["thumbnail"].method, Some(ResizeMethod::Crop));
        assert_eq!(main.sizes["thumbnail"].width, Some(150));
    }

    #[test]
    fn default_config_passes_validation() {
        assert!(PlacesConfig::default().validate().is_ok());
    }

    #[test]
    fn stock_config_toml_matches_defaults() {
        let parsed: PlacesConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(parsed, PlacesConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[map]
variable_map_zoom = true
"#;
        let config: PlacesConfig = toml::from_str(toml).unwrap();
        assert!(config.map.variable_map_zoom);
        assert_eq!(config.map.default_map_zoom, 12);
        assert_eq!(config.routes.uri, "places");
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<PlacesConfig, _> = toml::from_str("[map]\nzoom = 3\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_image_property_rejected() {
        let toml = r#"
[images.banner]
dri = "/banners/"
"#;
        let result: Result<PlacesConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_method_rejected() {
        let toml = r#"
[images.banner.sizes.wide]
method = "stretch"
"#;
        let result: Result<PlacesConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_dotted_image_type() {
        let mut config = PlacesConfig::default();
        config
            .images
            .insert("hero.wide".to_string(), ImageTypeConfig::default());
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_dotted_size_name() {
        let mut config = PlacesConfig::default();
        config
            .images
            .get_mut("main_image")
            .unwrap()
            .sizes
            .insert("x.y".to_string(), ImageSizeConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_uri() {
        let mut config = PlacesConfig::default();
        config.routes.uri = "/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zoom_boundary() {
        let mut config = PlacesConfig::default();
        config.map.default_map_zoom = MAX_MAP_ZOOM;
        assert!(config.validate().is_ok());
        config.map.default_map_zoom = MAX_MAP_ZOOM + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_date_format() {
        let mut config = PlacesConfig::default();
        config.views.published_date_format = "%Y-%!".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("a = 10").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn merge_adds_image_type_alongside_stock() {
        let store = config_from_str(
            r#"
[images.banner]
dir = "/banners/"
"#,
        )
        .unwrap();
        assert!(store.settings().has_image_type("banner"));
        assert!(store.settings().has_image_type("main_image"));
        assert_eq!(store.lookup_str("images.banner.dir"), Some("/banners/"));
    }

    #[test]
    fn lookup_walks_dotted_keys() {
        let store = ConfigStore::default();
        assert_eq!(
            store.lookup_u32("images.main_image.sizes.thumbnail.width"),
            Some(150)
        );
        assert_eq!(store.lookup_bool("map.variable_map_zoom"), Some(false));
        assert_eq!(store.lookup_str("routes.uri"), Some("places"));
    }

    #[test]
    fn lookup_missing_key_is_none() {
        let store = ConfigStore::default();
        assert!(store.lookup("images.main_image.sizes.huge.width").is_none());
        assert!(store.lookup("").is_none());
        assert!(store.lookup("map.default_map_zoom.extra").is_none());
    }

    #[test]
    fn lookup_wrong_type_is_none() {
        let store = ConfigStore::default();
        assert_eq!(store.lookup_u32("routes.uri"), None);
        assert_eq!(store.lookup_str("map.default_map_zoom"), None);
    }

    #[test]
    fn lookup_negative_integer_is_not_u32() {
        let value: toml::Value = toml::from_str("width = -5").unwrap();
        assert_eq!(value.lookup_u32("width"), None);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let store = load_config(tmp.path()).unwrap();
        let expected = PlacesConfig {
            public_path: tmp.path().join("public").to_string_lossy().into_owned(),
            ..PlacesConfig::default()
        };
        assert_eq!(store.settings(), &expected);
    }

    #[test]
    fn load_config_anchors_relative_public_path_to_root() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "public_path = \"site/www\"\n").unwrap();
        let store = load_config(tmp.path()).unwrap();
        let expected = tmp.path().join("site/www");
        assert_eq!(Path::new(&store.settings().public_path), expected);
        assert_eq!(
            store.lookup_str("public_path").map(Path::new),
            Some(expected.as_path())
        );
    }

    #[test]
    fn config_from_str_keeps_relative_public_path() {
        let store = config_from_str("public_path = \"www\"").unwrap();
        assert_eq!(store.settings().public_path, "www");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
public_path = "/srv/www"

[views]
published_date_format = "%Y-%m-%d"
"#,
        )
        .unwrap();
        let store = load_config(tmp.path()).unwrap();
        assert_eq!(store.settings().public_path, "/srv/www");
        assert_eq!(store.lookup_str("views.published_date_format"), Some("%Y-%m-%d"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not toml [[[").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[map]\ndefault_map_zoom = 40\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }
}
