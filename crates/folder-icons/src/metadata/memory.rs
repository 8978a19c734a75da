//! In-process attribute storage.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::trace;

use super::{ANY_ATTRIBUTE, AttributeBackend, AttributeChange, AttributeSet, STANDARD_ICON};
use crate::error::{MetadataError, Result};
use crate::logging::targets;

#[derive(Debug, Default)]
struct MemoryState {
    attributes: HashMap<PathBuf, AttributeSet>,
    standard_icons: HashMap<PathBuf, String>,
    failing: HashMap<PathBuf, HashSet<String>>,
    unsupported: HashSet<PathBuf>,
    writes: usize,
}

/// An [`AttributeBackend`] that keeps attributes in memory.
///
/// By default every directory exists and shows the `folder` standard icon.
/// Failures can be injected per directory and attribute.
#[derive(Debug)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    default_standard_icon: String,
    require_existing: bool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            default_standard_icon: "folder".to_string(),
            require_existing: false,
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report [`MetadataError::NotFound`] for paths that are not real
    /// directories on disk.
    pub fn require_existing(mut self) -> Self {
        self.require_existing = true;
        self
    }

    /// The standard icon reported for directories without an override.
    pub fn default_standard_icon(mut self, icon: impl Into<String>) -> Self {
        self.default_standard_icon = icon.into();
        self
    }

    /// Report `icon` as the standard icon of `dir`.
    pub fn set_standard_icon(&self, dir: impl Into<PathBuf>, icon: impl Into<String>) {
        self.state.lock().standard_icons.insert(dir.into(), icon.into());
    }

    /// Make every write of `attribute` on `dir` fail.
    pub fn fail_attribute(&self, dir: impl Into<PathBuf>, attribute: impl Into<String>) {
        self.state
            .lock()
            .failing
            .entry(dir.into())
            .or_default()
            .insert(attribute.into());
    }

    /// Make `dir` behave like a filesystem without attribute support.
    pub fn mark_unsupported(&self, dir: impl Into<PathBuf>) {
        self.state.lock().unsupported.insert(dir.into());
    }

    /// The custom attributes currently stored for `dir`.
    pub fn attributes(&self, dir: &Path) -> AttributeSet {
        self.state
            .lock()
            .attributes
            .get(dir)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of attribute writes attempted so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    fn check_directory(&self, dir: &Path, state: &MemoryState) -> Result<()> {
        if self.require_existing && !dir.is_dir() {
            return Err(MetadataError::not_found(dir));
        }
        if state.unsupported.contains(dir) {
            return Err(MetadataError::unsupported(
                dir,
                "metadata is not supported on this filesystem",
            ));
        }
        Ok(())
    }
}

impl AttributeBackend for MemoryBackend {
    fn query(&self, dir: &Path) -> Result<AttributeSet> {
        let state = self.state.lock();
        self.check_directory(dir, &state)?;

        let mut attributes = state.attributes.get(dir).cloned().unwrap_or_default();
        let standard = state
            .standard_icons
            .get(dir)
            .unwrap_or(&self.default_standard_icon);
        attributes.insert(STANDARD_ICON, standard.clone());
        Ok(attributes)
    }

    fn apply(&self, dir: &Path, changes: &[AttributeChange]) -> Vec<(String, MetadataError)> {
        let mut state = self.state.lock();
        if let Err(err) = self.check_directory(dir, &state) {
            return vec![(ANY_ATTRIBUTE.to_string(), err)];
        }

        let mut failures = Vec::new();
        for change in changes {
            state.writes += 1;
            let key = change.key();
            if state.failing.get(dir).is_some_and(|keys| keys.contains(key)) {
                failures.push((
                    key.to_string(),
                    MetadataError::io(dir, key, "injected write failure"),
                ));
                continue;
            }
            trace!(target: targets::METADATA, dir = %dir.display(), ?change, "memory write");
            state
                .attributes
                .entry(dir.to_path_buf())
                .or_default()
                .apply(change);
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::metadata::{CUSTOM_ICON, CUSTOM_ICON_NAME};

    #[test]
    fn test_standard_icon() {
        let backend = MemoryBackend::new();
        backend.set_standard_icon("/music", "folder-music");

        let music = backend.query(Path::new("/music")).unwrap();
        assert_eq!(music.get(STANDARD_ICON), Some("folder-music"));
        let other = backend.query(Path::new("/other")).unwrap();
        assert_eq!(other.get(STANDARD_ICON), Some("folder"));
    }

    #[test]
    fn test_injected_failure_is_independent() {
        let backend = MemoryBackend::new();
        let dir = Path::new("/d");
        backend.fail_attribute(dir, CUSTOM_ICON);

        let failures = backend.apply(
            dir,
            &[
                AttributeChange::set(CUSTOM_ICON, "file:///a.png"),
                AttributeChange::set(CUSTOM_ICON_NAME, "folder"),
            ],
        );
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, CUSTOM_ICON);
        assert_eq!(backend.attributes(dir).get(CUSTOM_ICON_NAME), Some("folder"));
        assert_eq!(backend.write_count(), 2);
    }

    #[test]
    fn test_require_existing() {
        let backend = MemoryBackend::new().require_existing();
        let err = backend.query(Path::new("/nonexistent/dir")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let dir = tempfile::tempdir().unwrap();
        assert!(backend.query(dir.path()).is_ok());
    }

    #[test]
    fn test_unsupported() {
        let backend = MemoryBackend::new();
        backend.mark_unsupported("/ro");
        let failures = backend.apply(Path::new("/ro"), &[AttributeChange::unset(CUSTOM_ICON)]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].1.kind(), ErrorKind::Unsupported);
        assert_eq!(backend.write_count(), 0);
    }
}
