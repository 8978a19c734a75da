//! Folder Icons - custom icons for directories in GNOME file managers.
//!
//! A user picks a theme icon (`folder-music`) or an image file for one or
//! more directories. This crate holds everything behind that chooser:
//!
//! - [`classify`] turns user input into an [`IconIdentifier`].
//! - [`IconValidator`] checks that an identifier resolves to an icon.
//! - [`FolderIconStore`] reads, writes and restores the persisted icon
//!   attributes of a directory.
//! - [`CatalogLoader`] builds the catalog of folder icons in the background;
//!   [`Catalog::filter`] narrows it while the user types.
//! - [`SelectionSession`] ties these together for one chooser run.
//!
//! The icon theme is injected as an [`IconTheme`](folder_icons_theme::IconTheme)
//! trait object from the `folder-icons-theme` crate.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use folder_icons::{FolderIconStore, IconValidator, SelectionSession};
//! use folder_icons_theme::{ThemeConfig, load_default_theme};
//!
//! let theme = load_default_theme(ThemeConfig::default());
//! let store = FolderIconStore::gio(theme.clone());
//! let mut session = SelectionSession::new(
//!     vec![PathBuf::from("/home/user/Music")],
//!     store,
//!     IconValidator::new(theme),
//! );
//!
//! if session.propose("folder-music")? {
//!     for (dir, result) in session.confirm(|| println!("reload the view"))? {
//!         if let Err(err) = result {
//!             eprintln!("{}: {err}", dir.display());
//!         }
//!     }
//! }
//! # Ok::<(), folder_icons::SessionError>(())
//! ```

pub mod catalog;
mod error;
mod identifier;
pub mod logging;
pub mod metadata;
mod session;
mod validator;

pub use catalog::{
    Catalog, CatalogConfig, CatalogEntry, CatalogHandle, CatalogLoader, CatalogStatus,
    load_catalog, matches,
};
pub use error::{ErrorKind, MetadataError, Result};
pub use identifier::{
    IconIdentifier, SUPPORTED_EXTENSIONS, canonicalize, classify, extension,
    has_supported_extension,
};
pub use metadata::{
    AttributeBackend, AttributeChange, AttributeSet, FolderIconRecord, FolderIconStore,
    GioBackend, MemoryBackend,
};
pub use session::{BatchResult, SelectionSession, SessionError, SessionState};
pub use validator::IconValidator;
