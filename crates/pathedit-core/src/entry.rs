//! Entry path editor
//!
//! Edits the filename of an existing entry. The entry's stored path is split
//! into collection folder, relative folder and filename; only the filename is
//! typed, and the full path is rejoined from the other two parts.
//!
//! Two update modes (see [`EntryUpdateMode`]):
//! - `Live`: every keystroke hands the new path to the committer, and confirm
//!   only moves the baseline. Suits hosts that keep an unsaved draft.
//! - `Deferred`: the committer runs once, on confirm.

use crate::collaborator::{
    CollaboratorError, CommitRequest, Committer, Translator, ValidationRequest, Validator,
};
use crate::config::{DialogConfig, EntryUpdateMode};
use crate::dialog::{CommitStart, ConfirmOutcome, DialogCore};
use crate::error::{DialogError, SessionError};
use crate::messages::ENTRY_PATH;
use crate::state::{DialogState, Phase, SessionId};
use parking_lot::Mutex;
use pathedit_rules::{EntryLocation, NameContext};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Callback told whether the filename differs from its baseline
pub type PendingChangeListener = Arc<dyn Fn(bool) + Send + Sync>;

/// Result of [`EntryPathRequest::validate_and_apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Nothing pending, or the new filename passed every check
    Valid,
    /// The filename was rejected; the error is also shown inline
    Invalid(SessionError),
}

impl ApplyOutcome {
    /// Check if saving may proceed
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Rejection message, if any
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(err) => Some(err.message()),
        }
    }
}

/// Where the entry would be stored after the current edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryPathPreview {
    /// Full stored path
    pub full_path: String,
    /// Path relative to the collection folder
    pub relative_path: String,
    /// Filename being edited
    pub filename: String,
}

/// Filename editor bound to one entry
pub struct EntryPathRequest {
    core: DialogCore,
    location: Mutex<EntryLocation>,
    committer: Arc<dyn Committer>,
    pending_change: Option<PendingChangeListener>,
    disabled: bool,
}

impl EntryPathRequest {
    /// Create a closed editor for the entry stored at `entry_path`
    pub fn new(
        entry_path: &str,
        collection_folder: &str,
        committer: Arc<dyn Committer>,
    ) -> Self {
        Self {
            core: DialogCore::new("entry_path", NameContext::FileName, &ENTRY_PATH),
            location: Mutex::new(EntryLocation::from_entry_path(entry_path, collection_folder)),
            committer,
            pending_change: None,
            disabled: false,
        }
    }

    /// With uniqueness/policy validator
    #[inline]
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.core.validator = Some(validator);
        self
    }

    /// With translator for user-facing copy
    #[inline]
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.core.translator = translator;
        self
    }

    /// With configuration
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: DialogConfig) -> Self {
        self.core.config = config;
        self
    }

    /// With pending-change listener
    #[inline]
    #[must_use]
    pub fn with_pending_change_listener(mut self, listener: PendingChangeListener) -> Self {
        self.pending_change = Some(listener);
        self
    }

    /// With input disabled
    #[inline]
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Log identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.core.id
    }

    /// Update mode in effect
    #[inline]
    #[must_use]
    pub fn update_mode(&self) -> EntryUpdateMode {
        self.core.config.entry_update_mode
    }

    /// Current location; its filename is the baseline, not the candidate
    #[must_use]
    pub fn location(&self) -> EntryLocation {
        self.location.lock().clone()
    }

    /// Where the entry would be stored with the filename now in the input
    #[must_use]
    pub fn preview(&self) -> EntryPathPreview {
        let candidate = self.core.candidate();
        let location = self.location.lock();
        let filename = candidate.unwrap_or_else(|| location.filename.clone());
        EntryPathPreview {
            full_path: location.full_path_for(&filename),
            relative_path: location.relative_path_for(&filename),
            filename,
        }
    }

    /// Full stored path for the filename now in the input
    #[inline]
    #[must_use]
    pub fn full_path(&self) -> String {
        self.preview().full_path
    }

    /// Open a session seeded with the current filename
    ///
    /// # Errors
    /// `Disabled` if the control is disabled, `AlreadyOpen` if a session exists
    pub fn open(&self) -> Result<(), DialogError> {
        if self.disabled {
            return Err(DialogError::Disabled);
        }
        let filename = self.location.lock().filename.clone();
        self.core.open(&filename)
    }

    /// Handle a keystroke that produced `value`
    ///
    /// In live mode the committer is awaited before returning; a failure is
    /// shown inline rather than returned.
    ///
    /// # Errors
    /// `Disabled`, `NotOpen`, `CommitInFlight`, or `ValidationInFlight` while
    /// [`Self::validate_and_apply`] awaits the validator
    pub async fn input(&self, value: &str) -> Result<(), DialogError> {
        if self.disabled {
            return Err(DialogError::Disabled);
        }
        let full_path = self.location.lock().full_path_for(value);
        self.core
            .edit(value, ValidationRequest::new(full_path.clone(), value))?;
        self.notify_pending(self.core.has_changed());

        if self.update_mode() == EntryUpdateMode::Live {
            let request = CommitRequest::UpdateEntryPath {
                new_path: full_path,
                filename: value.to_string(),
            };
            debug!(session = %self.core.id, new_path = request.new_path(), "live path update");
            if let Err(err) = self.committer.commit(request).await {
                let error = self.commit_error(&err);
                warn!(session = %self.core.id, error = %error, "live path update failed");
                self.core.set_error_for(value, error);
            }
        }
        Ok(())
    }

    /// Confirm the new filename
    ///
    /// Deferred mode commits here. Live mode has already handed the change
    /// to the committer and only moves the baseline, unless that live update
    /// failed, in which case it is retried here.
    ///
    /// # Errors
    /// Returns error when confirm is not currently enabled
    pub async fn confirm(&self) -> Result<ConfirmOutcome, DialogError> {
        let mut live_update_failed = false;
        let start = self.core.begin_commit(|session| {
            live_update_failed = matches!(
                session.validation_error(),
                Some(SessionError::CommitFailed(_))
            );
            let filename = session.candidate_value().to_string();
            CommitRequest::UpdateEntryPath {
                new_path: self.location.lock().full_path_for(&filename),
                filename,
            }
        })?;

        let outcome = match start {
            CommitStart::Unchanged => ConfirmOutcome::Unchanged,
            CommitStart::Started { ticket, request } => {
                let result = match self.update_mode() {
                    EntryUpdateMode::Live if !live_update_failed => Ok(()),
                    _ => self.committer.commit(request).await,
                };
                self.core.finish_commit(ticket, result)
            }
        };

        if let ConfirmOutcome::Committed(CommitRequest::UpdateEntryPath { filename, .. }) = &outcome
        {
            self.location.lock().filename.clone_from(filename);
        }
        if !matches!(outcome, ConfirmOutcome::Failed(_)) {
            self.notify_pending(false);
        }
        Ok(outcome)
    }

    /// Close the session, discarding the candidate
    ///
    /// # Errors
    /// `NotOpen` without a session; `CommitInFlight` while committing unless
    /// the configuration allows cancelling then
    pub fn cancel(&self) -> Result<(), DialogError> {
        self.core.cancel()?;
        self.notify_pending(false);
        Ok(())
    }

    /// Run every check on the current filename before the host saves
    ///
    /// Skips the debounce window and locks the input until the validator
    /// answers. On success the filename becomes the new baseline.
    ///
    /// # Errors
    /// `CommitInFlight` while a deferred commit is running,
    /// `ValidationInFlight` while another immediate check is running
    pub async fn validate_and_apply(&self) -> Result<ApplyOutcome, DialogError> {
        let checked = self
            .core
            .check_now(|filename| {
                let full_path = self.location.lock().full_path_for(filename);
                ValidationRequest::new(full_path, filename)
            })
            .await;

        match checked {
            Ok((candidate, None)) => {
                if self.core.rebase_to(&candidate) {
                    self.location.lock().filename.clone_from(&candidate);
                    self.notify_pending(false);
                }
                Ok(ApplyOutcome::Valid)
            }
            Ok((_, Some(err))) => Ok(ApplyOutcome::Invalid(err)),
            Err(DialogError::NotOpen) => Ok(ApplyOutcome::Valid),
            Err(err) => Err(err),
        }
    }

    /// The host moved the entry to another folder (relative to the collection)
    ///
    /// # Errors
    /// `CommitInFlight` while a commit is running
    pub fn sync_folder_path(&self, folder: &str) -> Result<(), DialogError> {
        if self.core.phase() == Phase::Committing {
            return Err(DialogError::CommitInFlight);
        }
        let mut location = self.location.lock();
        if location.folder != folder {
            let moved = std::mem::take(&mut *location).with_folder(folder);
            debug!(
                session = %self.core.id,
                to = folder,
                path = %moved.full_path(),
                "folder path synced"
            );
            *location = moved;
        }
        Ok(())
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.core.phase()
    }

    /// Copy of the full state
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> DialogState {
        self.core.snapshot()
    }

    /// Check if confirm is enabled
    #[inline]
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.core.can_confirm()
    }

    /// Check if cancel is enabled
    #[inline]
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.core.can_cancel()
    }

    /// Check if the filename differs from its baseline
    #[inline]
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.core.has_changed()
    }

    /// Text in the input, if open
    #[inline]
    #[must_use]
    pub fn input_value(&self) -> Option<String> {
        self.core.candidate()
    }

    /// Inline error text, if any
    #[must_use]
    pub fn validation_message(&self) -> Option<String> {
        self.core.validation_error().map(|e| e.message().to_string())
    }

    /// "Validating..." or "Updating path..." while busy
    #[inline]
    #[must_use]
    pub fn status_text(&self) -> Option<String> {
        self.core.status_text()
    }

    /// URL-change warning, shown while the filename differs from its baseline
    #[must_use]
    pub fn warning_text(&self) -> Option<String> {
        self.has_changed()
            .then(|| self.core.render(self.core.messages.url_warning, &[]))
    }

    /// Help line, shown when idle with nothing to report
    #[must_use]
    pub fn help_text(&self) -> Option<String> {
        let idle = matches!(self.phase(), Phase::Closed | Phase::Editing)
            && self.core.validation_error().is_none()
            && !self.has_changed();
        idle.then(|| self.core.render(self.core.messages.help, &[]))
    }

    fn commit_error(&self, err: &CollaboratorError) -> SessionError {
        let message = if err.message().is_empty() {
            self.core.render(self.core.messages.commit_failed, &[])
        } else {
            err.message().to_string()
        };
        SessionError::CommitFailed(message)
    }

    fn notify_pending(&self, changed: bool) {
        if let Some(listener) = &self.pending_change {
            listener(changed);
        }
    }
}

impl fmt::Debug for EntryPathRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPathRequest")
            .field("core", &self.core)
            .field("location", &*self.location.lock())
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}
