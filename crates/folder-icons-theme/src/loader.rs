//! Icon theme discovery and loading.
//!
//! Themes are discovered by scanning the search paths for directories that
//! carry an `index.theme` file. The same theme id may appear under several
//! search paths (user and system installs); their base paths are merged.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, trace};

use crate::logging::targets;
use crate::types::{IconContext, IconSizeType, IconThemeDirectory, IconThemeInfo};

/// Icon theme loader that discovers and loads icon themes from the filesystem.
#[derive(Debug)]
pub struct IconThemeLoader {
    /// Search paths for icon themes
    search_paths: Vec<PathBuf>,
    /// Discovered themes (theme_id -> info)
    themes: HashMap<String, IconThemeInfo>,
}

impl IconThemeLoader {
    /// Create a loader with custom search paths.
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths: paths,
            themes: HashMap::new(),
        }
    }

    /// Discover all available icon themes.
    ///
    /// Scans all search paths and parses `index.theme` files. Unreadable
    /// search paths and malformed themes are skipped.
    pub fn discover_themes(&mut self) -> usize {
        self.themes.clear();
        let mut count = 0;

        for search_path in &self.search_paths {
            let entries = match fs::read_dir(search_path) {
                Ok(e) => e,
                Err(_) => continue,
            };

            for entry in entries.flatten() {
                let path = entry.path();
                if !path.join("index.theme").is_file() {
                    continue;
                }

                match parse_theme(&path) {
                    Ok(info) => {
                        if let Some(existing) = self.themes.get_mut(&info.id) {
                            for bp in info.base_paths {
                                if !existing.base_paths.contains(&bp) {
                                    existing.base_paths.push(bp);
                                }
                            }
                        } else {
                            trace!(target: targets::LOADER, theme = %info.id, name = %info.name, path = %path.display(), "found icon theme");
                            self.themes.insert(info.id.clone(), info);
                            count += 1;
                        }
                    }
                    Err(err) => {
                        debug!(target: targets::LOADER, error = %err, "skipping unreadable icon theme");
                    }
                }
            }
        }

        debug!(target: targets::LOADER, count, "icon theme discovery finished");
        count
    }

    /// Get a discovered theme by ID.
    pub fn get_theme(&self, id: &str) -> Option<&IconThemeInfo> {
        self.themes.get(id)
    }

    /// Check if a theme exists.
    pub fn has_theme(&self, id: &str) -> bool {
        self.themes.contains_key(id)
    }

    /// Get default search paths for the current platform.
    #[cfg(target_os = "linux")]
    pub fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // User icons (XDG_DATA_HOME/icons or ~/.local/share/icons)
        if let Some(data_home) = dirs::data_dir() {
            paths.push(data_home.join("icons"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".icons"));
        }

        // System icons (XDG_DATA_DIRS/icons)
        if let Ok(data_dirs) = std::env::var("XDG_DATA_DIRS") {
            for dir in data_dirs.split(':').filter(|d| !d.is_empty()) {
                paths.push(PathBuf::from(dir).join("icons"));
            }
        } else {
            paths.push(PathBuf::from("/usr/local/share/icons"));
            paths.push(PathBuf::from("/usr/share/icons"));
        }

        // Pixmaps fallback
        paths.push(PathBuf::from("/usr/share/pixmaps"));

        paths
    }

    /// Fallback for other platforms.
    #[cfg(not(target_os = "linux"))]
    pub fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(data) = dirs::data_local_dir() {
            paths.push(data.join("icons"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".local/share/icons"));
            paths.push(home.join(".icons"));
        }

        paths
    }
}

impl Default for IconThemeLoader {
    fn default() -> Self {
        Self::with_paths(Self::default_search_paths())
    }
}

/// Ask the desktop which icon theme is active.
///
/// Reads the GNOME interface setting; returns `None` when `gsettings` is not
/// installed or the key is unset.
pub fn detect_desktop_theme() -> Option<String> {
    let output = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "icon-theme"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_gsettings_string(&String::from_utf8_lossy(&output.stdout))
}

/// Strip the GVariant quoting from a `gsettings get` string value.
fn parse_gsettings_string(output: &str) -> Option<String> {
    let value = output.trim().trim_matches('\'').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parse a theme directory.
fn parse_theme(theme_path: &Path) -> crate::Result<IconThemeInfo> {
    let theme_id = theme_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let index_path = theme_path.join("index.theme");
    let content =
        fs::read_to_string(&index_path).map_err(|e| crate::Error::io(&index_path, e))?;

    let mut info = parse_index(&theme_id, &content);
    info.base_paths.push(theme_path.to_path_buf());
    Ok(info)
}

/// Parse the INI-style contents of an `index.theme` file.
fn parse_index(theme_id: &str, content: &str) -> IconThemeInfo {
    let mut info = IconThemeInfo::new(theme_id);

    let mut current_section = String::new();
    let mut directory_sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut directories_list: Vec<String> = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            current_section = line[1..line.len() - 1].to_string();
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if current_section == "Icon Theme" {
            match key {
                "Name" => info.name = value.to_string(),
                "Inherits" => {
                    info.inherits = value
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                }
                "Directories" | "ScaledDirectories" => {
                    for dir in value.split(',') {
                        let dir = dir.trim().to_string();
                        if !dir.is_empty() && !directories_list.contains(&dir) {
                            directories_list.push(dir);
                        }
                    }
                }
                _ => {}
            }
        } else if !current_section.is_empty() {
            directory_sections
                .entry(current_section.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
        }
    }

    for dir_path in directories_list {
        if let Some(section) = directory_sections.get(&dir_path)
            && let Some(dir) = parse_directory_section(&dir_path, section)
        {
            info.directories.push(dir);
        }
    }

    if info.name.is_empty() {
        info.name = info.id.clone();
    }

    info
}

/// Parse a directory section from index.theme.
fn parse_directory_section(
    path: &str,
    section: &HashMap<String, String>,
) -> Option<IconThemeDirectory> {
    // Size is required
    let size: u32 = section.get("Size")?.parse().ok()?;

    let scale = section
        .get("Scale")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);

    let context = section.get("Context").and_then(|s| IconContext::from_str(s));

    let size_type = section
        .get("Type")
        .map(|s| match s.to_lowercase().as_str() {
            "fixed" => IconSizeType::Fixed,
            "scalable" => IconSizeType::Scalable,
            _ => IconSizeType::Threshold,
        })
        .unwrap_or_default();

    let min_size = section.get("MinSize").and_then(|s| s.parse().ok());
    let max_size = section.get("MaxSize").and_then(|s| s.parse().ok());
    let threshold = section
        .get("Threshold")
        .and_then(|s| s.parse().ok())
        .unwrap_or(2);

    Some(IconThemeDirectory {
        path: path.to_string(),
        size,
        scale,
        context,
        size_type,
        min_size,
        max_size,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "\
[Icon Theme]
Name=Test Theme
Comment=Used by tests
Inherits=Adwaita, hicolor
Directories=48x48/places,scalable/places,16x16/actions

# comment line
[48x48/places]
Size=48
Context=Places
Type=Fixed

[scalable/places]
Size=64
MinSize=16
MaxSize=512
Context=Places
Type=Scalable

[16x16/actions]
Context=Actions
";

    #[test]
    fn test_parse_index() {
        let info = parse_index("test", INDEX);

        assert_eq!(info.name, "Test Theme");
        assert_eq!(info.inherits, vec!["Adwaita", "hicolor"]);
        // 16x16/actions has no Size and is dropped
        assert_eq!(info.directories.len(), 2);

        let scalable = &info.directories[1];
        assert_eq!(scalable.path, "scalable/places");
        assert_eq!(scalable.size_type, IconSizeType::Scalable);
        assert_eq!(scalable.min_size, Some(16));
        assert_eq!(scalable.max_size, Some(512));
        assert_eq!(scalable.context, Some(IconContext::Places));
    }

    #[test]
    fn test_parse_index_defaults_name_to_id() {
        let info = parse_index("bare", "[Icon Theme]\nDirectories=\n");
        assert_eq!(info.name, "bare");
        assert!(info.directories.is_empty());
    }

    #[test]
    fn test_parse_gsettings_string() {
        assert_eq!(
            parse_gsettings_string("'Adwaita'\n"),
            Some("Adwaita".to_string())
        );
        assert_eq!(parse_gsettings_string("''\n"), None);
    }
}
