//! The chooser's selection state machine.
//!
//! ```text
//!            propose
//!   Empty ───────────▶ Candidate ◀──┐ propose
//!                        │  │  └────┘
//!            confirm     │  │ cancel / restore_defaults
//!   Confirmed ◀──────────┘  └──────▶ Cancelled / Restored
//! ```
//!
//! `Confirmed`, `Cancelled` and `Restored` are terminal.

use std::path::PathBuf;

use folder_icons_theme::Preview;
use tracing::{debug, info};

use crate::error::MetadataError;
use crate::identifier::{IconIdentifier, classify};
use crate::logging::targets;
use crate::metadata::FolderIconStore;
use crate::validator::IconValidator;

/// Outcome of a batch write, one entry per target directory.
pub type BatchResult = Vec<(PathBuf, Result<(), MetadataError>)>;

/// Errors from session transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session already ended.
    #[error("The selection session has already finished")]
    Finished,
    /// There is no valid candidate to apply.
    #[error("No valid icon is selected")]
    NotApplicable,
}

/// Where a session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No candidate yet.
    Empty,
    /// A candidate icon and whether it validated.
    Candidate { id: IconIdentifier, valid: bool },
    /// The icon was written to the targets.
    Confirmed(IconIdentifier),
    /// Closed without writing.
    Cancelled,
    /// The targets were reset to their default icons.
    Restored,
}

impl SessionState {
    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Cancelled | Self::Restored)
    }
}

/// One run of the icon chooser over a set of directories.
#[derive(Debug)]
pub struct SelectionSession {
    targets: Vec<PathBuf>,
    store: FolderIconStore,
    validator: IconValidator,
    initial: Option<IconIdentifier>,
    state: SessionState,
}

impl SelectionSession {
    /// Open a session for `targets`.
    ///
    /// The first target's current icon becomes the initial candidate.
    pub fn new(targets: Vec<PathBuf>, store: FolderIconStore, validator: IconValidator) -> Self {
        let initial = targets
            .first()
            .map(|dir| store.effective_icon_or_default(dir));
        let state = match &initial {
            Some(id) => SessionState::Candidate {
                id: id.clone(),
                valid: validator.validate(id),
            },
            None => SessionState::Empty,
        };
        debug!(target: targets::SESSION, targets = targets.len(), ?state, "session opened");

        Self {
            targets,
            store,
            validator,
            initial,
            state,
        }
    }

    pub fn targets(&self) -> &[PathBuf] {
        &self.targets
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The icon shown when the session opened.
    pub fn initial(&self) -> Option<&IconIdentifier> {
        self.initial.as_ref()
    }

    /// The current candidate, if any.
    pub fn candidate(&self) -> Option<&IconIdentifier> {
        match &self.state {
            SessionState::Candidate { id, .. } | SessionState::Confirmed(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, SessionState::Candidate { valid: true, .. })
    }

    /// Whether [`confirm`](Self::confirm) would write.
    pub fn can_apply(&self) -> bool {
        self.is_valid()
    }

    /// Replace the candidate with the user's input.
    ///
    /// Blank input falls back to the initial icon. Returns whether the new
    /// candidate is valid.
    pub fn propose(&mut self, raw: &str) -> Result<bool, SessionError> {
        self.ensure_open()?;

        let trimmed = raw.trim();
        let id = if trimmed.is_empty() {
            match &self.initial {
                Some(initial) => initial.clone(),
                None => {
                    self.state = SessionState::Empty;
                    return Ok(false);
                }
            }
        } else {
            classify(trimmed)
        };

        let valid = self.validator.validate(&id);
        debug!(target: targets::SESSION, icon = %id, valid, "candidate proposed");
        self.state = SessionState::Candidate { id, valid };
        Ok(valid)
    }

    /// Write the candidate to every target.
    ///
    /// `refresh` runs once if at least one directory was written.
    pub fn confirm(&mut self, refresh: impl FnOnce()) -> Result<BatchResult, SessionError> {
        self.ensure_open()?;
        let id = match &self.state {
            SessionState::Candidate { id, valid: true } => id.clone(),
            _ => return Err(SessionError::NotApplicable),
        };

        let results = self.store.set_many(&self.targets, &id);
        notify(&results, refresh);
        info!(target: targets::SESSION, icon = %id, targets = self.targets.len(), "icon applied");
        self.state = SessionState::Confirmed(id);
        Ok(results)
    }

    /// Close the session without writing.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        debug!(target: targets::SESSION, "session cancelled");
        self.state = SessionState::Cancelled;
        Ok(())
    }

    /// Reset every target to its default icon.
    ///
    /// `refresh` runs once if at least one directory was restored.
    pub fn restore_defaults(&mut self, refresh: impl FnOnce()) -> Result<BatchResult, SessionError> {
        self.ensure_open()?;
        let results = self.store.restore_many(&self.targets);
        notify(&results, refresh);
        info!(target: targets::SESSION, targets = self.targets.len(), "default icons restored");
        self.state = SessionState::Restored;
        Ok(results)
    }

    /// Preview of the current candidate.
    pub fn preview(&self, size: u32) -> Preview {
        match self.candidate() {
            Some(id) => self.validator.preview(id, size),
            None => self.validator.missing(size),
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.state.is_terminal() {
            Err(SessionError::Finished)
        } else {
            Ok(())
        }
    }
}

fn notify(results: &BatchResult, refresh: impl FnOnce()) {
    if results.iter().any(|(_, result)| result.is_ok()) {
        refresh();
    }
}
