//! Persisted folder icon metadata.
//!
//! A directory's icon lives in four file-manager attributes:
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `standard::icon` | The icon the file manager would show anyway (read-only) |
//! | `metadata::custom-icon-name` | A theme icon name chosen by the user |
//! | `metadata::custom-icon` | A `file://` URI of an image chosen by the user |
//! | `metadata::symbolic-icon` | The symbolic companion of the custom name |
//!
//! [`FolderIconStore`] keeps the two custom fields mutually exclusive and
//! maintains the symbolic companion. Storage goes through an
//! [`AttributeBackend`], either [`GioBackend`] on a real desktop or
//! [`MemoryBackend`] for embedding and tests.

mod gio;
mod memory;
mod store;

use std::collections::BTreeMap;
use std::path::Path;

pub use gio::GioBackend;
pub use memory::MemoryBackend;
pub use store::{FolderIconRecord, FolderIconStore};

use crate::error::{MetadataError, Result};

/// The icon the file manager derives from the directory's content type.
pub const STANDARD_ICON: &str = "standard::icon";
/// User-chosen theme icon name.
pub const CUSTOM_ICON_NAME: &str = "metadata::custom-icon-name";
/// User-chosen image, as a `file://` URI.
pub const CUSTOM_ICON: &str = "metadata::custom-icon";
/// Symbolic variant of the custom icon name.
pub const SYMBOLIC_ICON: &str = "metadata::symbolic-icon";

/// The writable attributes, in the order they are written.
pub const CUSTOM_ATTRIBUTES: [&str; 3] = [CUSTOM_ICON_NAME, CUSTOM_ICON, SYMBOLIC_ICON];

/// Attribute name used for failures that are not tied to one attribute.
pub const ANY_ATTRIBUTE: &str = "*";

/// String attribute values read from one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    values: BTreeMap<String, String>,
}

impl AttributeSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of `key`, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Store `value` under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Whether `key` has a value.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply one change in place.
    pub fn apply(&mut self, change: &AttributeChange) {
        match change {
            AttributeChange::Set(key, value) => self.insert(key.clone(), value.clone()),
            AttributeChange::Unset(key) => {
                self.remove(key);
            }
        }
    }
}

/// One attribute write.
///
/// Clearing is an explicit [`AttributeChange::Unset`]; an empty string is
/// never written as a stand-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeChange {
    /// Store a string value.
    Set(String, String),
    /// Remove the attribute.
    Unset(String),
}

impl AttributeChange {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Set(key.into(), value.into())
    }

    pub fn unset(key: impl Into<String>) -> Self {
        Self::Unset(key.into())
    }

    /// The attribute this change touches.
    pub fn key(&self) -> &str {
        match self {
            Self::Set(key, _) | Self::Unset(key) => key,
        }
    }
}

/// Storage for per-directory attributes.
pub trait AttributeBackend: Send + Sync {
    /// Read the icon attributes of `dir`.
    ///
    /// Themed icon values are reduced to their first name.
    fn query(&self, dir: &Path) -> Result<AttributeSet>;

    /// Attempt every change on `dir`, independently.
    ///
    /// Returns the failed changes with their errors; empty means all
    /// succeeded. A failure that prevents every change is reported once
    /// under [`ANY_ATTRIBUTE`].
    fn apply(&self, dir: &Path, changes: &[AttributeChange]) -> Vec<(String, MetadataError)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_set_apply() {
        let mut set = AttributeSet::new();
        set.apply(&AttributeChange::set(CUSTOM_ICON_NAME, "folder-music"));
        set.apply(&AttributeChange::unset(CUSTOM_ICON));
        assert_eq!(set.get(CUSTOM_ICON_NAME), Some("folder-music"));
        assert_eq!(set.len(), 1);

        set.apply(&AttributeChange::unset(CUSTOM_ICON_NAME));
        assert!(set.is_empty());
    }

    #[test]
    fn test_change_key() {
        assert_eq!(AttributeChange::set(CUSTOM_ICON, "file:///a.png").key(), CUSTOM_ICON);
        assert_eq!(AttributeChange::unset(SYMBOLIC_ICON).key(), SYMBOLIC_ICON);
    }
}
