//! Map centre and zoom for a place.
//!
//! By default every map is centred on the place's marker at
//! `map.default_map_zoom`. Two switches hand control to the individual record:
//!
//! - `map.variable_map_zoom`: use the record's `map_zoom`.
//! - `map.map_centre_different_to_marker`: use the record's
//!   `map_latitude`/`map_longitude` as the centre.
//!
//! A record that leaves an enabled override empty falls back to the default.

use crate::config::ConfigLookup;
use crate::place::Place;

const VARIABLE_ZOOM: &str = "map.variable_map_zoom";
const DEFAULT_ZOOM: &str = "map.default_map_zoom";
const CENTRE_DIFFERS: &str = "map.map_centre_different_to_marker";

fn centre_differs<C: ConfigLookup + ?Sized>(config: &C) -> bool {
    config.lookup_bool(CENTRE_DIFFERS).unwrap_or(false)
}

pub fn zoom<C: ConfigLookup + ?Sized>(place: &Place, config: &C) -> Option<u32> {
    if config.lookup_bool(VARIABLE_ZOOM).unwrap_or(false) && place.map_zoom.is_some() {
        return place.map_zoom;
    }
    config.lookup_u32(DEFAULT_ZOOM)
}

pub fn latitude<C: ConfigLookup + ?Sized>(place: &Place, config: &C) -> f64 {
    match place.map_latitude {
        Some(lat) if centre_differs(config) => lat,
        _ => place.marker_latitude,
    }
}

pub fn longitude<C: ConfigLookup + ?Sized>(place: &Place, config: &C) -> f64 {
    match place.map_longitude {
        Some(lng) if centre_differs(config) => lng,
        _ => place.marker_longitude,
    }
}

/// `(latitude, longitude)` of the map centre.
pub fn centre<C: ConfigLookup + ?Sized>(place: &Place, config: &C) -> (f64, f64) {
    (latitude(place, config), longitude(place, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigStore, config_from_str};

    fn hall() -> Place {
        Place {
            marker_latitude: 51.5009,
            marker_longitude: -0.1774,
            map_latitude: Some(51.4995),
            map_longitude: Some(-0.1749),
            map_zoom: Some(17),
            ..Place::default()
        }
    }

    fn overrides_enabled() -> ConfigStore {
        config_from_str(
            r#"
[map]
variable_map_zoom = true
map_centre_different_to_marker = true
default_map_zoom = 10
"#,
        )
        .unwrap()
    }

    #[test]
    fn defaults_ignore_record_overrides() {
        let config = ConfigStore::default();
        let place = hall();
        assert_eq!(zoom(&place, &config), Some(12));
        assert_eq!(centre(&place, &config), (51.5009, -0.1774));
    }

    #[test]
    fn enabled_overrides_use_record_values() {
        let config = overrides_enabled();
        let place = hall();
        assert_eq!(zoom(&place, &config), Some(17));
        assert_eq!(latitude(&place, &config), 51.4995);
        assert_eq!(longitude(&place, &config), -0.1749);
    }

    #[test]
    fn enabled_but_empty_overrides_fall_back() {
        let config = overrides_enabled();
        let place = Place {
            map_latitude: None,
            map_longitude: None,
            map_zoom: None,
            ..hall()
        };
        assert_eq!(zoom(&place, &config), Some(10));
        assert_eq!(centre(&place, &config), (51.5009, -0.1774));
    }

    #[test]
    fn missing_map_table_falls_back_to_marker() {
        let raw: toml::Value = toml::from_str("[views]\n").unwrap();
        let place = hall();
        assert_eq!(zoom(&place, &raw), None);
        assert_eq!(centre(&place, &raw), (51.5009, -0.1774));
    }
}
