//! In-memory place collection.
//!
//! [`Catalog`] plays the host persistence layer's part: it enforces unique
//! slugs on insert, answers the "live" query, and filters by relationship
//! through a [`RelationshipFilter`] supplied at construction time.
//!
//! ## Directory Layout
//!
//! [`load_catalog`] reads one TOML file per place:
//!
//! ```text
//! places/
//! ├── config.toml                # Places configuration (not a place)
//! ├── royal-albert-hall.toml
//! └── venues/
//!     └── wigmore-hall.toml      # Nested directories are fine
//! ```
//!
//! Files are read in path order, so the catalog order is stable.

use crate::config::PlacesConfig;
use crate::place::Place;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Place {0:?} has no slug")]
    MissingSlug(String),
    #[error("Duplicate slug {0:?}")]
    DuplicateSlug(String),
    #[error("Place {slug:?} uses unknown image type {image_type:?}")]
    UnknownImageType { slug: String, image_type: String },
    #[error("No relationship filter configured; construct the catalog with one")]
    RelationshipFilterMissing,
}

/// Narrows places down to those related to an identifier (a category slug,
/// a region id, ...). What "related" means belongs to the host application.
pub trait RelationshipFilter {
    fn filter<'a>(
        &self,
        places: &'a [Place],
        relationship: &str,
    ) -> Result<Vec<&'a Place>, CatalogError>;
}

impl<F> RelationshipFilter for F
where
    F: Fn(&Place, &str) -> bool,
{
    fn filter<'a>(
        &self,
        places: &'a [Place],
        relationship: &str,
    ) -> Result<Vec<&'a Place>, CatalogError> {
        Ok(places
            .iter()
            .filter(|place| self(*place, relationship))
            .collect())
    }
}

/// Filter for applications without relationships. Every query fails with
/// [`CatalogError::RelationshipFilterMissing`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrelated;

impl RelationshipFilter for Unrelated {
    fn filter<'a>(
        &self,
        _places: &'a [Place],
        _relationship: &str,
    ) -> Result<Vec<&'a Place>, CatalogError> {
        Err(CatalogError::RelationshipFilterMissing)
    }
}

#[derive(Debug)]
pub struct Catalog<F> {
    places: Vec<Place>,
    relationships: F,
}

impl<F: RelationshipFilter> Catalog<F> {
    pub fn new(relationships: F) -> Self {
        Self {
            places: Vec::new(),
            relationships,
        }
    }

    /// Add a place. Slugs must be present and unique across the catalog,
    /// whatever the status of the place holding them.
    pub fn insert(&mut self, place: Place) -> Result<(), CatalogError> {
        if place.slug.trim().is_empty() {
            return Err(CatalogError::MissingSlug(place.title));
        }
        if self.find_by_slug(&place.slug).is_some() {
            return Err(CatalogError::DuplicateSlug(place.slug));
        }
        self.places.push(place);
        Ok(())
    }

    /// [`insert`](Self::insert), after checking that every image slot on the
    /// place is a configured image type.
    pub fn insert_validated(
        &mut self,
        place: Place,
        config: &PlacesConfig,
    ) -> Result<(), CatalogError> {
        if let Some(image_type) = place.unknown_image_types(config).next() {
            return Err(CatalogError::UnknownImageType {
                slug: place.slug.clone(),
                image_type: image_type.to_string(),
            });
        }
        self.insert(place)
    }

    /// Places that are approved and published at or before `now`.
    pub fn live(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Place> + '_ {
        self.places.iter().filter(move |place| place.is_live(now))
    }

    pub fn by_relationship(&self, relationship: &str) -> Result<Vec<&Place>, CatalogError> {
        self.relationships.filter(&self.places, relationship)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Place> {
        self.places.iter().find(|place| place.slug == slug)
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

fn is_place_file(root: &Path, path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("toml")
        && path != root.join("config.toml")
}

/// Read a single place document.
pub fn load_place(path: &Path) -> Result<Place, CatalogError> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every place file under `root` into a catalog.
///
/// Image slots are checked against the configured image types here, so
/// attribute resolution later never meets an undeclared slot.
pub fn load_catalog<F: RelationshipFilter>(
    root: &Path,
    config: &PlacesConfig,
    relationships: F,
) -> Result<Catalog<F>, CatalogError> {
    let mut catalog = Catalog::new(relationships);
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_place_file(root, path) {
            continue;
        }
        let place = load_place(path)?;
        log::debug!("Loaded place {:?} from {}", place.slug, path.display());
        catalog.insert_validated(place, config)?;
    }
    Ok(catalog)
}
