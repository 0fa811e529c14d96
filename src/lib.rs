//! # Places
//!
//! Place records (venues, points of interest) for content-managed sites. A
//! place has a title and slug, a publication status and date, image slots,
//! a map marker and an optional YouTube video. This crate answers the
//! read-side questions a site asks about them:
//!
//! - Is this place live? (approved and published at or before now)
//! - What `<img>` tag does its banner get at the thumbnail size?
//! - Where is its map centred, and at what zoom?
//! - What is its URL, its formatted publication date, its video embed?
//!
//! Everything is driven by `config.toml` and injected collaborators; nothing
//! here writes a record.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, merging, validation and dotted-key lookup |
//! | [`place`] | The [`Place`](place::Place) record, liveness, map presence, date formatting |
//! | [`attributes`] | Image `src`/`width`/`height` resolution and `<img>` rendering |
//! | [`imaging`] | Image dimension probing from disk |
//! | [`map`] | Map centre and zoom with per-record overrides |
//! | [`youtube`] | YouTube thumbnail and embed templates |
//! | [`routes`] | Reverse URL generation for place pages |
//! | [`catalog`] | In-memory collection: unique slugs, live query, relationship filtering |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Collaborators Are Injected
//!
//! Config ([`config::ConfigLookup`]), the filesystem
//! ([`imaging::DimensionProbe`]), the router ([`routes::UrlGenerator`]) and
//! relationship filtering ([`catalog::RelationshipFilter`]) are all traits
//! passed in by the caller. There is no global state, so every operation can
//! be tested against an in-memory config and a mock probe.
//!
//! ## Soft Failure
//!
//! An empty image slot, an unknown size or a missing image file is not an
//! error. Resolution returns `None` and the `<img>` tag simply leaves out what
//! it does not know. Errors are reserved for loading: bad TOML, invalid
//! settings, duplicate slugs, undeclared image types.
//!
//! ## Validated at Load
//!
//! Resize methods, date formats, zoom range and image-slot names are checked
//! when `config.toml` and the place files are read, so rendering never meets
//! a malformed setting.

pub mod attributes;
pub mod catalog;
pub mod config;
pub mod imaging;
pub mod map;
pub mod output;
pub mod place;
pub mod routes;
pub mod youtube;

#[cfg(test)]
pub(crate) mod test_helpers;
