//! The theme query surface consumed by the folder icon core.
//!
//! Everything above this layer talks to an [`IconTheme`] trait object, so the
//! active theme is injected rather than read from a process-wide default.
//! [`FreedesktopTheme`] is the real implementation; [`EmptyTheme`] is the
//! degraded mode used when no theme is installed.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::loader::{IconThemeLoader, detect_desktop_theme};
use crate::logging::targets;
use crate::preview::{Preview, render_file};
use crate::resolver::{FALLBACK_THEME, IconResolver, list_icons_in};
use crate::types::{IconContext, IconThemeInfo};

/// Read-only queries against an icon theme.
pub trait IconTheme: Send + Sync {
    /// Whether the theme (or one it inherits from) has an icon called `name`.
    fn has_icon(&self, name: &str) -> bool;

    /// All icon names in the theme chain, optionally restricted to a context.
    fn list_icons(&self, context: Option<IconContext>) -> Vec<String>;

    /// Render the icon called `name` at `size` pixels.
    fn load_icon(&self, name: &str, size: u32) -> crate::Result<Preview>;

    /// Whether `name` is only an alias (symlink) of another icon.
    fn is_alias(&self, _name: &str) -> bool {
        false
    }
}

/// Configuration for discovering the active theme.
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    /// Directories scanned for installed themes.
    pub search_paths: Vec<PathBuf>,
    /// Theme to activate. `None` asks the desktop, then falls back to `hicolor`.
    pub theme: Option<String>,
    /// Maximum number of memoized lookups.
    pub cache_limit: usize,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            search_paths: IconThemeLoader::default_search_paths(),
            theme: None,
            cache_limit: 1000,
        }
    }
}

impl ThemeConfig {
    /// Configuration that only searches the given paths.
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths: paths,
            ..Default::default()
        }
    }

    /// Activate a specific theme.
    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Set the lookup cache limit.
    pub fn cache_limit(mut self, limit: usize) -> Self {
        self.cache_limit = limit;
        self
    }
}

/// An installed freedesktop icon theme.
#[derive(Debug)]
pub struct FreedesktopTheme {
    resolver: Mutex<IconResolver>,
    // Enumeration reads this copy, so lookups are never held up by a scan
    chain: Vec<IconThemeInfo>,
}

impl FreedesktopTheme {
    /// Discover installed themes and activate the configured one.
    ///
    /// Fails with [`crate::Error::ThemeUnavailable`] when neither the
    /// requested theme nor `hicolor` is installed.
    pub fn discover(config: ThemeConfig) -> crate::Result<Self> {
        let mut loader = IconThemeLoader::with_paths(config.search_paths);
        loader.discover_themes();

        let theme_id = config
            .theme
            .or_else(detect_desktop_theme)
            .unwrap_or_else(|| FALLBACK_THEME.to_string());

        let mut resolver = IconResolver::new(loader, theme_id)?;
        resolver.set_cache_limit(config.cache_limit);
        info!(target: targets::THEME, theme = resolver.current_theme_id(), "icon theme activated");

        let chain = resolver.chain_snapshot();
        Ok(Self {
            resolver: Mutex::new(resolver),
            chain,
        })
    }

    /// The id of the active theme.
    pub fn theme_id(&self) -> String {
        self.resolver.lock().current_theme_id().to_string()
    }

    /// Drop memoized lookups, e.g. after icons were installed.
    pub fn clear_cache(&self) {
        self.resolver.lock().clear_cache();
    }
}

impl IconTheme for FreedesktopTheme {
    fn has_icon(&self, name: &str) -> bool {
        self.resolver.lock().has_icon(name)
    }

    fn list_icons(&self, context: Option<IconContext>) -> Vec<String> {
        list_icons_in(&self.chain, context)
    }

    fn load_icon(&self, name: &str, size: u32) -> crate::Result<Preview> {
        // The lock only covers the lookup; decoding runs unlocked.
        let path = self
            .resolver
            .lock()
            .resolve_path(name, size)
            .ok_or_else(|| crate::Error::icon_not_found(name))?;
        render_file(&path, size)
    }

    fn is_alias(&self, name: &str) -> bool {
        let Some(path) = self.resolver.lock().resolve_path(name, 48) else {
            return false;
        };
        fs::symlink_metadata(&path).is_ok_and(|m| m.file_type().is_symlink())
    }
}

/// A theme with no icons.
///
/// Validation against it always fails and its catalog is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTheme;

impl IconTheme for EmptyTheme {
    fn has_icon(&self, _name: &str) -> bool {
        false
    }

    fn list_icons(&self, _context: Option<IconContext>) -> Vec<String> {
        Vec::new()
    }

    fn load_icon(&self, name: &str, _size: u32) -> crate::Result<Preview> {
        Err(crate::Error::icon_not_found(name))
    }
}

/// An in-memory theme with a fixed set of icon names.
///
/// Every icon renders as a solid square. Useful for embedding hosts that
/// resolve icons elsewhere, and for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTheme {
    icons: BTreeSet<String>,
    broken: HashSet<String>,
    aliases: HashSet<String>,
}

impl StaticTheme {
    /// A theme containing exactly `names`.
    pub fn new(names: &[&str]) -> Self {
        Self {
            icons: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Make `name` exist but fail to render.
    pub fn with_broken(mut self, name: &str) -> Self {
        self.icons.insert(name.to_string());
        self.broken.insert(name.to_string());
        self
    }

    /// Make `name` exist as an alias of another icon.
    pub fn with_alias(mut self, name: &str) -> Self {
        self.icons.insert(name.to_string());
        self.aliases.insert(name.to_string());
        self
    }
}

impl IconTheme for StaticTheme {
    fn has_icon(&self, name: &str) -> bool {
        self.icons.contains(name)
    }

    fn list_icons(&self, _context: Option<IconContext>) -> Vec<String> {
        self.icons.iter().cloned().collect()
    }

    fn load_icon(&self, name: &str, size: u32) -> crate::Result<Preview> {
        if !self.icons.contains(name) {
            return Err(crate::Error::icon_not_found(name));
        }
        if self.broken.contains(name) {
            return Err(crate::Error::render(name, "broken icon"));
        }
        let size = size.max(1);
        Ok(Preview::from_image(RgbaImage::from_pixel(
            size,
            size,
            Rgba([74, 134, 232, 255]),
        )))
    }

    fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains(name)
    }
}

/// Discover the active theme, degrading to [`EmptyTheme`] when none exists.
pub fn load_default_theme(config: ThemeConfig) -> Arc<dyn IconTheme> {
    match FreedesktopTheme::discover(config) {
        Ok(theme) => Arc::new(theme),
        Err(err) => {
            warn!(target: targets::THEME, error = %err, "no icon theme available, icon names will not validate");
            debug!(target: targets::THEME, "using empty icon theme");
            Arc::new(EmptyTheme)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_theme() {
        let theme = EmptyTheme;
        assert!(!theme.has_icon("folder"));
        assert!(theme.list_icons(Some(IconContext::Places)).is_empty());
        assert!(theme.load_icon("folder", 48).is_err());
        assert!(!theme.is_alias("folder"));
    }

    #[test]
    fn test_discover_without_themes_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = ThemeConfig::with_paths(vec![dir.path().to_path_buf()]).theme("Adwaita");
        let err = FreedesktopTheme::discover(config).unwrap_err();
        assert!(matches!(err, crate::Error::ThemeUnavailable { .. }));
    }

    #[test]
    fn test_load_default_theme_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let config = ThemeConfig::with_paths(vec![dir.path().to_path_buf()]).theme("Adwaita");
        let theme = load_default_theme(config);
        assert!(!theme.has_icon("folder"));
    }

    #[test]
    fn test_enumeration_runs_while_lookups_are_locked() {
        let dir = tempfile::tempdir().unwrap();
        let hicolor = dir.path().join("hicolor");
        fs::create_dir_all(hicolor.join("48x48/places")).unwrap();
        fs::write(
            hicolor.join("index.theme"),
            "[Icon Theme]\nDirectories=48x48/places\n\n[48x48/places]\nSize=48\nContext=Places\n",
        )
        .unwrap();
        fs::write(hicolor.join("48x48/places/folder.png"), b"").unwrap();

        let config = ThemeConfig::with_paths(vec![dir.path().to_path_buf()]).theme("hicolor");
        let theme = Arc::new(FreedesktopTheme::discover(config).unwrap());

        // A lookup in progress on another thread holds the resolver
        let lookup = theme.resolver.lock();
        let (sender, receiver) = crossbeam_channel::bounded(1);
        let worker = {
            let theme = theme.clone();
            std::thread::spawn(move || {
                let _ = sender.send(theme.list_icons(Some(IconContext::Places)));
            })
        };
        let names = receiver
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("enumeration blocked on the lookup lock");
        drop(lookup);
        worker.join().unwrap();

        assert_eq!(names, ["folder"]);
        assert!(theme.has_icon("folder"));
    }

    #[test]
    fn test_static_theme() {
        let theme = StaticTheme::new(&["folder", "folder-music"])
            .with_broken("folder-broken")
            .with_alias("folder-link");

        assert!(theme.has_icon("folder-music"));
        assert!(!theme.has_icon("folder-xyz"));
        assert_eq!(theme.list_icons(None).len(), 4);
        assert_eq!(theme.load_icon("folder", 8).unwrap().width(), 8);
        assert!(matches!(
            theme.load_icon("folder-broken", 8),
            Err(crate::Error::Render { .. })
        ));
        assert!(theme.is_alias("folder-link"));
    }

    #[test]
    fn test_config_builder() {
        let config = ThemeConfig::with_paths(Vec::new())
            .theme("Papirus")
            .cache_limit(10);
        assert_eq!(config.theme.as_deref(), Some("Papirus"));
        assert_eq!(config.cache_limit, 10);
        assert!(config.search_paths.is_empty());
    }
}
