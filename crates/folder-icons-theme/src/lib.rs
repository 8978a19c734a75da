//! Icon theme layer for Folder Icons.
//!
//! This crate answers the three questions the folder icon chooser asks of the
//! desktop's icon theme, following the freedesktop icon theme specification:
//!
//! - **Existence**: does an icon called `folder-music` exist?
//! - **Enumeration**: which icons live in the *Places* context?
//! - **Rendering**: give me `folder-music` as a 64px preview.
//!
//! Themes are discovered under the XDG data directories, inheritance chains
//! are followed with `hicolor` as the final fallback, and lookups are cached.
//!
//! # Example
//!
//! ```no_run
//! use folder_icons_theme::{IconContext, IconTheme, ThemeConfig, load_default_theme};
//!
//! let theme = load_default_theme(ThemeConfig::default());
//! if theme.has_icon("folder-music") {
//!     let preview = theme.load_icon("folder-music", 64)?;
//!     println!("{}x{}", preview.width(), preview.height());
//! }
//! let places = theme.list_icons(Some(IconContext::Places));
//! # Ok::<(), folder_icons_theme::Error>(())
//! ```

mod error;
mod loader;
pub mod logging;
mod preview;
mod resolver;
mod theme;
mod types;

pub use error::{Error, Result};
pub use loader::{IconThemeLoader, detect_desktop_theme};
pub use preview::{Preview, render_file};
pub use resolver::{FALLBACK_THEME, IconResolver};
pub use theme::{
    EmptyTheme, FreedesktopTheme, IconTheme, StaticTheme, ThemeConfig, load_default_theme,
};
pub use types::{IconContext, IconName, IconSizeType, IconThemeDirectory, IconThemeInfo};
