//! Core types for the icon theme layer.
//!
//! This module provides:
//! - Icon names used by the folder icon chooser
//! - Icon context categories (Places, Actions, etc.)
//! - Theme metadata parsed from `index.theme`

use std::path::PathBuf;

/// Icon name following freedesktop naming conventions.
///
/// # Examples
///
/// ```
/// use folder_icons_theme::IconName;
///
/// let icon = IconName::new("folder-music");
/// assert_eq!(icon.symbolic_variant().as_str(), "folder-music-symbolic");
/// assert!(!icon.is_symbolic());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconName(String);

impl IconName {
    /// Generic folder
    pub const FOLDER: &'static str = "folder";
    /// Shown when an icon cannot be resolved or decoded
    pub const IMAGE_MISSING: &'static str = "image-missing";
    /// Suffix of monochrome companion icons
    pub const SYMBOLIC_SUFFIX: &'static str = "-symbolic";

    /// Create a new icon name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the icon name as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is a symbolic (`-symbolic` suffixed) icon.
    pub fn is_symbolic(&self) -> bool {
        self.0.ends_with(Self::SYMBOLIC_SUFFIX)
    }

    /// The conventional symbolic companion of this icon.
    pub fn symbolic_variant(&self) -> IconName {
        if self.is_symbolic() {
            return self.clone();
        }
        Self(format!("{}{}", self.0, Self::SYMBOLIC_SUFFIX))
    }

    /// Whether this icon belongs to the folder family shown in the chooser.
    ///
    /// Folder-like icons start with `folder` and are not symbolic variants.
    pub fn is_folder_like(&self) -> bool {
        let lower = self.0.to_lowercase();
        lower.starts_with(Self::FOLDER) && !lower.ends_with(Self::SYMBOLIC_SUFFIX)
    }
}

impl From<&str> for IconName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for IconName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for IconName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Icon context/category following the freedesktop specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconContext {
    /// Icons for user actions (copy, save, etc.)
    Actions,
    /// Loading and processing animations
    Animations,
    /// Application icons
    Applications,
    /// Program menu categories
    Categories,
    /// Hardware devices
    Devices,
    /// File/folder emblems and tags
    Emblems,
    /// Emoticons for chat
    Emotes,
    /// Country flags
    International,
    /// File type icons (MIME types)
    MimeTypes,
    /// Filesystem locations
    Places,
    /// System status indicators
    Status,
}

impl IconContext {
    /// Get the freedesktop context name.
    pub fn as_str(&self) -> &'static str {
        match self {
            IconContext::Actions => "actions",
            IconContext::Animations => "animations",
            IconContext::Applications => "apps",
            IconContext::Categories => "categories",
            IconContext::Devices => "devices",
            IconContext::Emblems => "emblems",
            IconContext::Emotes => "emotes",
            IconContext::International => "intl",
            IconContext::MimeTypes => "mimetypes",
            IconContext::Places => "places",
            IconContext::Status => "status",
        }
    }

    /// Parse a context from an `index.theme` `Context=` value.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "actions" => Some(IconContext::Actions),
            "animations" => Some(IconContext::Animations),
            "apps" | "applications" => Some(IconContext::Applications),
            "categories" => Some(IconContext::Categories),
            "devices" => Some(IconContext::Devices),
            "emblems" => Some(IconContext::Emblems),
            "emotes" => Some(IconContext::Emotes),
            "intl" | "international" => Some(IconContext::International),
            "mimetypes" | "mime-types" => Some(IconContext::MimeTypes),
            "places" => Some(IconContext::Places),
            "status" => Some(IconContext::Status),
            _ => None,
        }
    }
}

/// Size type for icon theme directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSizeType {
    /// Fixed size icons - must match exactly
    Fixed,
    /// Scalable icons (typically SVG)
    Scalable,
    /// Threshold-based sizing - matches within a range
    #[default]
    Threshold,
}

/// Information about an icon theme directory.
#[derive(Debug, Clone)]
pub struct IconThemeDirectory {
    /// Directory path relative to theme root
    pub path: String,
    /// Nominal icon size
    pub size: u32,
    /// Scale factor (1 for normal, 2 for HiDPI, etc.)
    pub scale: u32,
    /// Icon context
    pub context: Option<IconContext>,
    /// Size type
    pub size_type: IconSizeType,
    /// Minimum size (for Scalable)
    pub min_size: Option<u32>,
    /// Maximum size (for Scalable)
    pub max_size: Option<u32>,
    /// Size threshold (for Threshold type)
    pub threshold: u32,
}

impl IconThemeDirectory {
    /// Calculate size distance (for finding best match).
    pub fn size_distance(&self, target: u32) -> u32 {
        match self.size_type {
            IconSizeType::Fixed => self.size.abs_diff(target),
            IconSizeType::Scalable => {
                let min = self.min_size.unwrap_or(self.size);
                let max = self.max_size.unwrap_or(self.size);
                if target < min {
                    min - target
                } else if target > max {
                    target - max
                } else {
                    0
                }
            }
            IconSizeType::Threshold => {
                let diff = self.size.abs_diff(target);
                diff.saturating_sub(self.threshold)
            }
        }
    }

    /// Whether this directory can hold icons of the given context.
    ///
    /// Directories without a declared context match every context.
    pub fn matches_context(&self, context: Option<IconContext>) -> bool {
        context.is_none() || self.context.is_none() || self.context == context
    }
}

/// Icon theme metadata.
#[derive(Debug, Clone)]
pub struct IconThemeInfo {
    /// Unique theme identifier (directory name)
    pub id: String,
    /// Human-readable theme name
    pub name: String,
    /// Parent themes for inheritance (fallback chain)
    pub inherits: Vec<String>,
    /// Theme directories
    pub directories: Vec<IconThemeDirectory>,
    /// Theme base paths (where theme was found)
    pub base_paths: Vec<PathBuf>,
}

impl IconThemeInfo {
    /// Create a new theme info with just an ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            inherits: Vec::new(),
            directories: Vec::new(),
            base_paths: Vec::new(),
        }
    }

    /// Directories that may contain icons of the given context, at scale 1.
    pub fn directories_for(&self, context: Option<IconContext>) -> Vec<&IconThemeDirectory> {
        self.directories
            .iter()
            .filter(|d| d.scale == 1 && d.matches_context(context))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(size_type: IconSizeType, context: Option<IconContext>) -> IconThemeDirectory {
        IconThemeDirectory {
            path: "48x48/places".to_string(),
            size: 48,
            scale: 1,
            context,
            size_type,
            min_size: Some(16),
            max_size: Some(256),
            threshold: 2,
        }
    }

    #[test]
    fn test_symbolic_variant() {
        let icon = IconName::new("folder-music");
        assert_eq!(icon.symbolic_variant().as_str(), "folder-music-symbolic");
        assert_eq!(
            icon.symbolic_variant().symbolic_variant().as_str(),
            "folder-music-symbolic"
        );
    }

    #[test]
    fn test_folder_like() {
        assert!(IconName::new("folder").is_folder_like());
        assert!(IconName::new("Folder-Videos").is_folder_like());
        assert!(!IconName::new("folder-videos-symbolic").is_folder_like());
        assert!(!IconName::new("user-home").is_folder_like());
    }

    #[test]
    fn test_icon_context_from_str() {
        assert_eq!(IconContext::from_str("Places"), Some(IconContext::Places));
        assert_eq!(
            IconContext::from_str("applications"),
            Some(IconContext::Applications)
        );
        assert_eq!(IconContext::from_str("unknown"), None);
    }

    #[test]
    fn test_size_distance() {
        let fixed = directory(IconSizeType::Fixed, None);
        assert_eq!(fixed.size_distance(48), 0);
        assert_eq!(fixed.size_distance(64), 16);

        let scalable = directory(IconSizeType::Scalable, None);
        assert_eq!(scalable.size_distance(16), 0);
        assert_eq!(scalable.size_distance(512), 256);

        let threshold = directory(IconSizeType::Threshold, None);
        assert_eq!(threshold.size_distance(50), 0);
        assert_eq!(threshold.size_distance(64), 14);
    }

    #[test]
    fn test_matches_context() {
        let places = directory(IconSizeType::Fixed, Some(IconContext::Places));
        assert!(places.matches_context(Some(IconContext::Places)));
        assert!(places.matches_context(None));
        assert!(!places.matches_context(Some(IconContext::Actions)));

        let untagged = directory(IconSizeType::Fixed, None);
        assert!(untagged.matches_context(Some(IconContext::Actions)));
    }
}
