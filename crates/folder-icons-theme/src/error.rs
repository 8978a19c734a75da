//! Error types for the icon theme layer.

use std::path::PathBuf;

/// Result type alias for theme operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while discovering themes or rendering icons.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither the requested theme nor the `hicolor` fallback is installed.
    #[error("Icon theme '{theme}' is not available")]
    ThemeUnavailable { theme: String },

    /// The icon name does not resolve in the active theme chain.
    #[error("Icon '{name}' not found in the active theme")]
    IconNotFound { name: String },

    /// The icon file was found but could not be decoded.
    #[error("Failed to render icon '{name}': {message}")]
    Render { name: String, message: String },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a theme-unavailable error.
    pub fn theme_unavailable(theme: impl Into<String>) -> Self {
        Self::ThemeUnavailable {
            theme: theme.into(),
        }
    }

    /// Create an icon-not-found error.
    pub fn icon_not_found(name: impl Into<String>) -> Self {
        Self::IconNotFound { name: name.into() }
    }

    /// Create a render error.
    pub fn render(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            name: name.into(),
            message: message.into(),
        }
    }
}
