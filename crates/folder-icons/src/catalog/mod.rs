//! The catalog of folder icons offered by the chooser.
//!
//! The catalog lists every icon of the active theme that looks like a
//! folder (`folder`, `folder-music`, ...) together with a rendered preview.
//! Rendering a whole theme takes a while, so [`CatalogLoader`] builds it on
//! a background thread and hands it over exactly once.

mod filter;
mod loader;

use folder_icons_theme::{IconContext, IconName, IconTheme, Preview};
use tracing::{debug, info};

pub use filter::matches;
pub use loader::{CatalogHandle, CatalogLoader, CatalogStatus};

use crate::logging::targets;

/// Default preview edge length in pixels.
pub const DEFAULT_PREVIEW_SIZE: u32 = 64;

/// Default name of the catalog worker thread.
pub const DEFAULT_THREAD_NAME: &str = "folder-icons-catalog";

/// One selectable icon.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    identifier: String,
    preview: Preview,
}

impl CatalogEntry {
    pub fn new(identifier: impl Into<String>, preview: Preview) -> Self {
        Self {
            identifier: identifier.into(),
            preview,
        }
    }

    /// The theme icon name.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }
}

/// Folder icons sorted by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, sorting `entries` by identifier.
    pub fn new(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        entries.dedup_by(|a, b| a.identifier == b.identifier);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// The entry called `identifier`.
    pub fn get(&self, identifier: &str) -> Option<&CatalogEntry> {
        self.entries
            .binary_search_by(|e| e.identifier.as_str().cmp(identifier))
            .ok()
            .map(|index| &self.entries[index])
    }

    /// All identifiers, in order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.entries.iter().map(CatalogEntry::identifier).collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Configuration for building a catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Preview edge length in pixels.
    pub preview_size: u32,
    /// Name of the worker thread.
    pub thread_name: String,
    /// Theme context enumerated.
    pub context: IconContext,
    /// Leave out icons that are symlinks to other icons.
    pub skip_aliases: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            preview_size: DEFAULT_PREVIEW_SIZE,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            context: IconContext::Places,
            skip_aliases: true,
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preview_size(mut self, size: u32) -> Self {
        self.preview_size = size;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn context(mut self, context: IconContext) -> Self {
        self.context = context;
        self
    }

    pub fn skip_aliases(mut self, skip: bool) -> Self {
        self.skip_aliases = skip;
        self
    }
}

/// Build the catalog on the calling thread.
///
/// Icons that fail to render get a placeholder preview. A theme without
/// icons yields an empty catalog.
pub fn load_catalog(theme: &dyn IconTheme, config: &CatalogConfig) -> Catalog {
    info!(target: targets::CATALOG, context = config.context.as_str(), "loading icon catalog");

    let entries: Vec<_> = theme
        .list_icons(Some(config.context))
        .into_iter()
        .filter(|name| IconName::new(name.as_str()).is_folder_like())
        .filter(|name| !(config.skip_aliases && theme.is_alias(name)))
        .map(|name| {
            let preview = match theme.load_icon(&name, config.preview_size) {
                Ok(preview) => preview,
                Err(err) => {
                    debug!(target: targets::CATALOG, icon = %name, error = %err, "using placeholder preview");
                    Preview::placeholder(config.preview_size)
                }
            };
            CatalogEntry::new(name, preview)
        })
        .collect();

    let catalog = Catalog::new(entries);
    info!(target: targets::CATALOG, icons = catalog.len(), "icon catalog loaded");
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use folder_icons_theme::{EmptyTheme, StaticTheme};

    #[test]
    fn test_load_catalog_selects_folders() {
        let theme = StaticTheme::new(&[
            "folder-videos",
            "Folder-Music",
            "folder",
            "folder-music-symbolic",
            "user-home",
        ]);
        let catalog = load_catalog(&theme, &CatalogConfig::default());
        assert_eq!(catalog.identifiers(), ["Folder-Music", "folder", "folder-videos"]);
        assert!(catalog.get("folder").is_some());
        assert!(catalog.get("user-home").is_none());
    }

    #[test]
    fn test_render_failure_uses_placeholder() {
        let theme = StaticTheme::new(&["folder"]).with_broken("folder-broken");
        let catalog = load_catalog(&theme, &CatalogConfig::new().preview_size(16));
        assert_eq!(catalog.len(), 2);
        let broken = catalog.get("folder-broken").unwrap();
        assert_eq!(broken.preview(), &Preview::placeholder(16));
        assert_ne!(catalog.get("folder").unwrap().preview(), &Preview::placeholder(16));
    }

    #[test]
    fn test_skip_aliases() {
        let theme = StaticTheme::new(&["folder"]).with_alias("folder-link");
        let skipped = load_catalog(&theme, &CatalogConfig::default());
        assert_eq!(skipped.identifiers(), ["folder"]);
        let kept = load_catalog(&theme, &CatalogConfig::new().skip_aliases(false));
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_empty_theme() {
        assert!(load_catalog(&EmptyTheme, &CatalogConfig::default()).is_empty());
    }
}
