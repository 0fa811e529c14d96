//! YouTube thumbnail and embed markup.
//!
//! Both are config templates (`you_tube.thumbnail_code`,
//! `you_tube.embed_code`) with [`VIDEO_ID_PLACEHOLDER`] replaced by the
//! record's video id. The result is inserted into pages unescaped, so only ids
//! made of YouTube's id alphabet (`A-Z a-z 0-9 - _`) are substituted.

use crate::config::ConfigLookup;
use crate::place::Place;

pub const VIDEO_ID_PLACEHOLDER: &str = "%YOU_TUBE_VIDEO_ID%";

fn video_id(place: &Place) -> Option<&str> {
    let id = place.you_tube_video_id.as_deref()?.trim();
    if id.is_empty() {
        return None;
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        log::debug!("Ignoring malformed YouTube id {id:?} on {:?}", place.slug);
        return None;
    }
    Some(id)
}

fn render<C: ConfigLookup + ?Sized>(place: &Place, config: &C, key: &str) -> Option<String> {
    let id = video_id(place)?;
    let template = config.lookup_str(key)?;
    Some(template.replace(VIDEO_ID_PLACEHOLDER, id))
}

/// Thumbnail markup, or `None` when the place has no (valid) video.
pub fn thumbnail_image<C: ConfigLookup + ?Sized>(place: &Place, config: &C) -> Option<String> {
    render(place, config, "you_tube.thumbnail_code")
}

/// Player embed markup, or `None` when the place has no (valid) video.
pub fn embed_code<C: ConfigLookup + ?Sized>(place: &Place, config: &C) -> Option<String> {
    render(place, config, "you_tube.embed_code")
}
