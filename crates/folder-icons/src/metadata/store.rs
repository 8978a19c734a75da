use std::path::{Path, PathBuf};
use std::sync::Arc;

use folder_icons_theme::{IconName, IconTheme};
use tracing::{debug, info, warn};

use super::{
    AttributeBackend, AttributeChange, AttributeSet, CUSTOM_ATTRIBUTES, CUSTOM_ICON,
    CUSTOM_ICON_NAME, GioBackend, STANDARD_ICON, SYMBOLIC_ICON,
};
use crate::error::{MetadataError, Result};
use crate::identifier::{IconIdentifier, canonicalize};
use crate::logging::targets;

/// The icon attributes of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderIconRecord {
    /// User-chosen theme icon name.
    pub custom_icon_name: Option<String>,
    /// User-chosen image path, decoded from its stored URI.
    pub custom_icon: Option<String>,
    /// Symbolic companion of `custom_icon_name`.
    pub symbolic_icon: Option<String>,
    /// The icon the file manager shows without customization.
    pub standard_icon: String,
}

impl FolderIconRecord {
    /// Build a record from queried attributes. Empty values count as unset.
    pub fn from_attributes(attributes: &AttributeSet) -> Self {
        let value = |key| {
            attributes
                .get(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            custom_icon_name: value(CUSTOM_ICON_NAME),
            custom_icon: value(CUSTOM_ICON).map(|uri| canonicalize(&uri)),
            symbolic_icon: value(SYMBOLIC_ICON),
            standard_icon: value(STANDARD_ICON).unwrap_or_default(),
        }
    }

    /// Whether the user customized this directory's icon.
    pub fn is_customized(&self) -> bool {
        self.custom_icon.is_some() || self.custom_icon_name.is_some()
    }

    /// The icon displayed for the directory.
    ///
    /// An image wins over a name, which wins over the standard icon.
    pub fn effective_icon(&self) -> IconIdentifier {
        if let Some(path) = &self.custom_icon {
            IconIdentifier::PathRef(path.clone())
        } else if let Some(name) = &self.custom_icon_name {
            IconIdentifier::Named(name.clone())
        } else if self.standard_icon.is_empty() {
            IconIdentifier::Named(IconName::FOLDER.to_string())
        } else {
            IconIdentifier::Named(self.standard_icon.clone())
        }
    }
}

/// Reads and writes folder icons.
///
/// Every write keeps the two custom fields mutually exclusive: setting one
/// always unsets the other. The symbolic companion is written only for
/// theme names whose `-symbolic` variant exists in the theme.
#[derive(Clone)]
pub struct FolderIconStore {
    backend: Arc<dyn AttributeBackend>,
    theme: Arc<dyn IconTheme>,
}

impl FolderIconStore {
    /// Create a store over `backend`, checking symbolic variants in `theme`.
    pub fn new(backend: Arc<dyn AttributeBackend>, theme: Arc<dyn IconTheme>) -> Self {
        Self { backend, theme }
    }

    /// A store backed by the `gio` tool.
    pub fn gio(theme: Arc<dyn IconTheme>) -> Self {
        Self::new(Arc::new(GioBackend::new()), theme)
    }

    pub fn backend(&self) -> &Arc<dyn AttributeBackend> {
        &self.backend
    }

    /// Read the icon record of `dir`.
    pub fn get(&self, dir: &Path) -> Result<FolderIconRecord> {
        let attributes = self.backend.query(dir)?;
        Ok(FolderIconRecord::from_attributes(&attributes))
    }

    /// The effective icon of `dir`, or `folder` when it cannot be read.
    pub fn effective_icon_or_default(&self, dir: &Path) -> IconIdentifier {
        match self.get(dir) {
            Ok(record) => record.effective_icon(),
            Err(err) => {
                warn!(target: targets::METADATA, dir = %dir.display(), error = %err, "cannot read folder icon, using default");
                IconIdentifier::Named(IconName::FOLDER.to_string())
            }
        }
    }

    /// Assign `id` as the icon of `dir`.
    ///
    /// Every attribute write is attempted. Failures are folded into one
    /// error, [`MetadataError::Partial`] when more than one write failed.
    pub fn set(&self, dir: &Path, id: &IconIdentifier) -> Result<()> {
        let changes = self.changes_for(dir, id)?;
        debug!(target: targets::METADATA, dir = %dir.display(), icon = %id, "setting folder icon");
        self.write(dir, &changes)
    }

    /// Remove every custom icon attribute from `dir`.
    ///
    /// Restoring an unmodified directory succeeds.
    pub fn restore(&self, dir: &Path) -> Result<()> {
        let changes: Vec<_> = CUSTOM_ATTRIBUTES
            .iter()
            .map(|key| AttributeChange::unset(*key))
            .collect();
        debug!(target: targets::METADATA, dir = %dir.display(), "restoring folder icon");
        self.write(dir, &changes)
    }

    /// Assign `id` to each directory in turn.
    ///
    /// Not atomic: a failed directory does not stop the rest, and earlier
    /// writes are not rolled back.
    pub fn set_many(&self, dirs: &[PathBuf], id: &IconIdentifier) -> Vec<(PathBuf, Result<()>)> {
        let results: Vec<_> = dirs
            .iter()
            .map(|dir| (dir.clone(), self.set(dir, id)))
            .collect();
        log_batch("set", &results);
        results
    }

    /// Restore each directory in turn, with the same semantics as
    /// [`set_many`](Self::set_many).
    pub fn restore_many(&self, dirs: &[PathBuf]) -> Vec<(PathBuf, Result<()>)> {
        let results: Vec<_> = dirs
            .iter()
            .map(|dir| (dir.clone(), self.restore(dir)))
            .collect();
        log_batch("restore", &results);
        results
    }

    fn changes_for(&self, dir: &Path, id: &IconIdentifier) -> Result<Vec<AttributeChange>> {
        let changes = match id {
            IconIdentifier::PathRef(_) => {
                let uri = id.to_uri().unwrap_or_default();
                vec![
                    AttributeChange::set(CUSTOM_ICON, uri),
                    AttributeChange::unset(CUSTOM_ICON_NAME),
                    AttributeChange::unset(SYMBOLIC_ICON),
                ]
            }
            IconIdentifier::Named(name) if name.is_empty() => {
                return Err(MetadataError::invalid_input(dir, "empty icon name"));
            }
            IconIdentifier::Named(name) => {
                let symbolic_change = match self.symbolic_companion(name) {
                    Some(symbolic) => AttributeChange::set(SYMBOLIC_ICON, symbolic),
                    None => AttributeChange::unset(SYMBOLIC_ICON),
                };
                vec![
                    AttributeChange::set(CUSTOM_ICON_NAME, name.as_str()),
                    AttributeChange::unset(CUSTOM_ICON),
                    symbolic_change,
                ]
            }
        };
        Ok(changes)
    }

    /// The `-symbolic` variant of `name`, if the theme has it.
    fn symbolic_companion(&self, name: &str) -> Option<String> {
        let symbolic = IconName::new(name).symbolic_variant();
        self.theme
            .has_icon(symbolic.as_str())
            .then(|| symbolic.to_string())
    }

    fn write(&self, dir: &Path, changes: &[AttributeChange]) -> Result<()> {
        let failures = self.backend.apply(dir, changes);
        MetadataError::aggregate(dir, failures.into_iter().map(|(_, err)| err).collect())
    }
}

impl std::fmt::Debug for FolderIconStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderIconStore").finish_non_exhaustive()
    }
}

fn log_batch(operation: &str, results: &[(PathBuf, Result<()>)]) {
    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    info!(
        target: targets::METADATA,
        operation,
        directories = results.len(),
        failed,
        "batch finished"
    );
}
