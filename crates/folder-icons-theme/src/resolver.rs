//! Icon resolution and caching.
//!
//! This module provides the [`IconResolver`] which looks up icon names in the
//! active theme and its inheritance chain, resolving them to image files.
//! Lookups are memoized because the chooser validates on every keystroke.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::logging::targets;
use crate::loader::IconThemeLoader;
use crate::types::{IconContext, IconThemeInfo};

/// Theme every other theme implicitly inherits from.
pub const FALLBACK_THEME: &str = "hicolor";

/// File extensions a theme may use for an icon, in lookup order.
const ICON_EXTENSIONS: [&str; 3] = ["png", "svg", "xpm"];

/// Cache key for resolved icons.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    name: String,
    size: u32,
}

/// Cached resolution result.
#[derive(Debug, Clone)]
enum CacheEntry {
    /// Found icon at this path
    Found(PathBuf),
    /// Icon not found
    NotFound,
}

/// Icon resolver with caching.
#[derive(Debug)]
pub struct IconResolver {
    /// Theme loader holding the discovered themes
    loader: IconThemeLoader,
    /// Current theme ID
    current_theme: String,
    /// Resolution cache
    cache: HashMap<CacheKey, CacheEntry>,
    /// Maximum cache entries
    cache_limit: usize,
}

impl IconResolver {
    /// Create a resolver over already-discovered themes.
    ///
    /// Fails with [`crate::Error::ThemeUnavailable`] when neither `theme_id`
    /// nor the `hicolor` fallback has been discovered.
    pub fn new(loader: IconThemeLoader, theme_id: impl Into<String>) -> crate::Result<Self> {
        let theme_id = theme_id.into();
        let current_theme = if loader.has_theme(&theme_id) {
            theme_id
        } else if loader.has_theme(FALLBACK_THEME) {
            FALLBACK_THEME.to_string()
        } else {
            return Err(crate::Error::theme_unavailable(theme_id));
        };

        Ok(Self {
            loader,
            current_theme,
            cache: HashMap::new(),
            cache_limit: 1000,
        })
    }

    /// Get the current theme ID.
    pub fn current_theme_id(&self) -> &str {
        &self.current_theme
    }

    /// Clear the resolution cache.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Set the cache limit.
    pub fn set_cache_limit(&mut self, limit: usize) {
        self.cache_limit = limit;
        while self.cache.len() > self.cache_limit {
            // Remove arbitrary entry (HashMap doesn't preserve order)
            if let Some(key) = self.cache.keys().next().cloned() {
                self.cache.remove(&key);
            }
        }
    }

    /// Resolve an icon by name, preferring files closest to `size`.
    ///
    /// Returns the path to the icon file, or None if not found.
    pub fn resolve_path(&mut self, name: &str, size: u32) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }

        let cache_key = CacheKey {
            name: name.to_string(),
            size,
        };

        if let Some(entry) = self.cache.get(&cache_key) {
            return match entry {
                CacheEntry::Found(path) => Some(path.clone()),
                CacheEntry::NotFound => None,
            };
        }

        let result = self
            .theme_chain()
            .into_iter()
            .find_map(|theme| find_icon_in_theme(theme, name, size));
        trace!(target: targets::RESOLVER, name, size, found = result.is_some(), "resolved icon");

        if self.cache.len() < self.cache_limit {
            let entry = match &result {
                Some(path) => CacheEntry::Found(path.clone()),
                None => CacheEntry::NotFound,
            };
            self.cache.insert(cache_key, entry);
        }

        result
    }

    /// Check if an icon exists at any size.
    pub fn has_icon(&mut self, name: &str) -> bool {
        self.resolve_path(name, DEFAULT_LOOKUP_SIZE).is_some()
    }

    /// An owned copy of the inheritance chain, current theme first.
    ///
    /// Enumeration works on this copy so it never holds up lookups.
    pub fn chain_snapshot(&self) -> Vec<IconThemeInfo> {
        self.theme_chain().into_iter().cloned().collect()
    }

    /// Build the inheritance chain, current theme first, `hicolor` last.
    fn theme_chain(&self) -> Vec<&IconThemeInfo> {
        let mut themes_to_check = vec![self.current_theme.clone()];
        let mut visited = HashSet::new();
        let mut idx = 0;

        while idx < themes_to_check.len() {
            let theme_id = &themes_to_check[idx];
            if visited.insert(theme_id.clone())
                && let Some(theme) = self.loader.get_theme(theme_id)
            {
                for parent in &theme.inherits {
                    if !visited.contains(parent) {
                        themes_to_check.push(parent.clone());
                    }
                }
            }
            idx += 1;
        }

        if !visited.contains(FALLBACK_THEME) {
            themes_to_check.push(FALLBACK_THEME.to_string());
        }

        let mut seen = HashSet::new();
        themes_to_check
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| self.loader.get_theme(id))
            .collect()
    }
}

/// Size used when the caller only cares whether an icon exists.
const DEFAULT_LOOKUP_SIZE: u32 = 48;

/// Find an icon in a specific theme.
fn find_icon_in_theme(theme: &IconThemeInfo, name: &str, size: u32) -> Option<PathBuf> {
    let mut directories: Vec<_> = theme.directories.iter().filter(|d| d.scale == 1).collect();

    // Closest size first
    directories.sort_by_key(|d| d.size_distance(size));

    for dir in directories {
        for base_path in &theme.base_paths {
            let dir_path = base_path.join(&dir.path);
            for ext in ICON_EXTENSIONS {
                let icon_path = dir_path.join(format!("{name}.{ext}"));
                if icon_path.exists() {
                    return Some(icon_path);
                }
            }
        }
    }

    None
}

/// List every icon name in `chain` for a context.
///
/// Names are deduplicated and returned in lexicographic order.
pub(crate) fn list_icons_in<'a>(
    chain: impl IntoIterator<Item = &'a IconThemeInfo>,
    context: Option<IconContext>,
) -> Vec<String> {
    let mut names = BTreeSet::new();

    for theme in chain {
        for dir in theme.directories_for(context) {
            for base_path in &theme.base_paths {
                collect_icon_names(&base_path.join(&dir.path), &mut names);
            }
        }
    }

    names.into_iter().collect()
}

/// Add the stem of every icon file in `dir` to `names`.
fn collect_icon_names(dir: &Path, names: &mut BTreeSet<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let has_icon_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| ICON_EXTENSIONS.contains(&e));

        if has_icon_ext && let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.insert(stem.to_string());
        }
    }
}
