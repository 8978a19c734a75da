//! Icon existence checks and live previews.
//!
//! The chooser validates the candidate on every keystroke, so both checks
//! are cheap: a path check is two `stat`-level operations and a name check
//! hits the theme's memoized resolver.

use std::path::Path;
use std::sync::Arc;

use folder_icons_theme::{IconName, IconTheme, Preview, render_file};
use tracing::debug;

use crate::identifier::{IconIdentifier, has_supported_extension};
use crate::logging::targets;

/// Decides whether an identifier resolves to a displayable icon.
#[derive(Clone)]
pub struct IconValidator {
    theme: Arc<dyn IconTheme>,
}

impl IconValidator {
    /// Create a validator against the given theme.
    pub fn new(theme: Arc<dyn IconTheme>) -> Self {
        Self { theme }
    }

    /// The theme names are checked against.
    pub fn theme(&self) -> &Arc<dyn IconTheme> {
        &self.theme
    }

    /// Whether `id` currently resolves to an icon.
    ///
    /// Paths must exist and end in `.svg` or `.png`; names must exist in the
    /// active theme.
    pub fn validate(&self, id: &IconIdentifier) -> bool {
        match id {
            IconIdentifier::PathRef(path) => {
                has_supported_extension(path) && Path::new(path).exists()
            }
            IconIdentifier::Named(name) => !name.is_empty() && self.theme.has_icon(name),
        }
    }

    /// Render `id` for display, never failing.
    ///
    /// Invalid identifiers and decode failures show the theme's
    /// `image-missing` icon, or a drawn placeholder if the theme lacks it.
    pub fn preview(&self, id: &IconIdentifier, size: u32) -> Preview {
        if !self.validate(id) {
            return self.missing(size);
        }

        let rendered = match id {
            IconIdentifier::PathRef(path) => render_file(Path::new(path), size),
            IconIdentifier::Named(name) => self.theme.load_icon(name, size),
        };

        match rendered {
            Ok(preview) => preview,
            Err(err) => {
                debug!(target: targets::VALIDATOR, icon = %id, error = %err, "preview failed");
                self.missing(size)
            }
        }
    }

    /// The "missing image" stand-in at `size`.
    pub fn missing(&self, size: u32) -> Preview {
        self.theme
            .load_icon(IconName::IMAGE_MISSING, size)
            .unwrap_or_else(|_| Preview::placeholder(size))
    }
}

impl std::fmt::Debug for IconValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconValidator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::classify;
    use folder_icons_theme::{EmptyTheme, StaticTheme};

    #[test]
    fn test_validate_named() {
        let validator = IconValidator::new(Arc::new(StaticTheme::new(&["folder-videos"])));
        assert!(validator.validate(&classify("folder-videos")));
        assert!(!validator.validate(&classify("folder-xyz")));
        assert!(!validator.validate(&classify("")));
    }

    #[test]
    fn test_validate_path() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("icon.PNG");
        let jpg = dir.path().join("icon.jpg");
        std::fs::write(&png, b"").unwrap();
        std::fs::write(&jpg, b"").unwrap();

        let validator = IconValidator::new(Arc::new(EmptyTheme));
        assert!(validator.validate(&classify(png.to_str().unwrap())));
        assert!(!validator.validate(&classify(jpg.to_str().unwrap())));
        assert!(!validator.validate(&classify("/nonexistent/icon.png")));
    }

    #[test]
    fn test_unavailable_theme_rejects_names() {
        let validator = IconValidator::new(Arc::new(EmptyTheme));
        assert!(!validator.validate(&classify("folder")));
    }

    #[test]
    fn test_preview_falls_back_to_placeholder() {
        let validator = IconValidator::new(Arc::new(EmptyTheme));
        let preview = validator.preview(&classify("folder-xyz"), 32);
        assert_eq!(preview, Preview::placeholder(32));
    }

    #[test]
    fn test_preview_named_icon() {
        let validator = IconValidator::new(Arc::new(StaticTheme::new(&["folder"])));
        let preview = validator.preview(&classify("folder"), 16);
        assert_eq!(preview.width(), 16);
        assert_ne!(preview, Preview::placeholder(16));
    }
}
