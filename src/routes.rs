//! Reverse URL generation.
//!
//! The host router is represented by [`UrlGenerator`]. [`BuiltInRoutes`] is
//! the stock router configured by the `[routes]` table:
//!
//! ```text
//! index   /{uri}
//! view    /{uri}/{slug}
//! ```

use crate::config::ConfigLookup;

/// Action that shows a single place.
pub const VIEW_ACTION: &str = "view";
/// Action that lists places.
pub const INDEX_ACTION: &str = "index";

/// Builds URLs for named actions.
pub trait UrlGenerator {
    /// URL for `action` with the given slug parameter, or `None` if the
    /// router has no such route.
    fn action_url(&self, action: &str, slug: &str) -> Option<String>;
}

/// Routes mounted under a base URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltInRoutes {
    uri: String,
    enabled: bool,
}

impl BuiltInRoutes {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.trim_matches('/').to_string(),
            enabled: true,
        }
    }

    /// Reads `routes.uri` and `routes.use_built_in_routes`.
    pub fn from_config<C: ConfigLookup + ?Sized>(config: &C) -> Self {
        let mut routes = Self::new(config.lookup_str("routes.uri").unwrap_or("places"));
        routes.enabled = config
            .lookup_bool("routes.use_built_in_routes")
            .unwrap_or(true);
        routes
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn index_url(&self) -> Option<String> {
        self.enabled.then(|| format!("/{}", self.uri))
    }
}

impl UrlGenerator for BuiltInRoutes {
    fn action_url(&self, action: &str, slug: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }
        match action {
            VIEW_ACTION if !slug.is_empty() => Some(format!("/{}/{}", self.uri, slug)),
            INDEX_ACTION => self.index_url(),
            _ => None,
        }
    }
}
