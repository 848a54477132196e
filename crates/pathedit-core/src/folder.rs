//! Folder rename dialog
//!
//! Renames the last segment of a folder path. The new full path keeps the
//! folder's depth: `/blog` renamed to `new-blog` becomes `/new-blog`.

use crate::collaborator::{CommitRequest, Committer, Translator, ValidationRequest, Validator};
use crate::config::DialogConfig;
use crate::dialog::{CommitStart, ConfirmOutcome, DialogCore};
use crate::error::DialogError;
use crate::messages::FOLDER_RENAME;
use crate::state::{DialogState, Phase, SessionId};
use pathedit_rules::{rename_last_segment, NameContext};
use std::fmt;
use std::sync::Arc;

/// Rename-folder dialog bound to one folder
pub struct FolderRenameRequest {
    core: DialogCore,
    folder_path: String,
    folder_name: String,
    committer: Arc<dyn Committer>,
    affected_entry_count: usize,
    disabled: bool,
}

impl FolderRenameRequest {
    /// Create a closed dialog for the folder at `folder_path` named `folder_name`
    pub fn new(
        folder_path: impl Into<String>,
        folder_name: impl Into<String>,
        committer: Arc<dyn Committer>,
    ) -> Self {
        Self {
            core: DialogCore::new("folder_rename", NameContext::FolderName, &FOLDER_RENAME),
            folder_path: folder_path.into(),
            folder_name: folder_name.into(),
            committer,
            affected_entry_count: 0,
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

    /// With number of entries inside the folder
    #[inline]
    #[must_use]
    pub fn with_affected_entry_count(mut self, count: usize) -> Self {
        self.affected_entry_count = count;
        self
    }

    /// With the open affordance disabled
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

    /// Full path of the folder being renamed
    #[inline]
    #[must_use]
    pub fn folder_path(&self) -> &str {
        &self.folder_path
    }

    /// Current folder name
    #[inline]
    #[must_use]
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// Full path the folder would get under `name`
    #[must_use]
    pub fn target_path(&self, name: &str) -> String {
        rename_last_segment(&self.folder_path, name)
    }

    /// Open a session seeded with the current folder name
    ///
    /// # Errors
    /// `Disabled` if the control is disabled, `AlreadyOpen` if a session exists
    pub fn open(&self) -> Result<(), DialogError> {
        if self.disabled {
            return Err(DialogError::Disabled);
        }
        self.core.open(&self.folder_name)
    }

    /// Handle a keystroke that produced `value`
    ///
    /// # Errors
    /// `NotOpen` without a session, `CommitInFlight` while committing
    pub fn input(&self, value: &str) -> Result<(), DialogError> {
        let request = ValidationRequest::new(self.target_path(value), value);
        self.core.edit(value, request)
    }

    /// Confirm the rename
    ///
    /// Collaborator failures do not surface here; they come back as
    /// [`ConfirmOutcome::Failed`] with the session reopened for editing.
    ///
    /// # Errors
    /// Returns error when confirm is not currently enabled
    pub async fn confirm(&self) -> Result<ConfirmOutcome, DialogError> {
        let start = self.core.begin_commit(|session| CommitRequest::RenameFolder {
            old_path: self.folder_path.clone(),
            new_path: self.target_path(session.candidate_value()),
        })?;

        match start {
            CommitStart::Unchanged => Ok(ConfirmOutcome::Unchanged),
            CommitStart::Started { ticket, request } => {
                let result = self.committer.commit(request).await;
                Ok(self.core.finish_commit(ticket, result))
            }
        }
    }

    /// Close the session, discarding the candidate
    ///
    /// # Errors
    /// `NotOpen` without a session; `CommitInFlight` while committing unless
    /// the configuration allows cancelling then
    pub fn cancel(&self) -> Result<(), DialogError> {
        self.core.cancel()
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

    /// "Validating..." or "Renaming folder..." while busy
    #[inline]
    #[must_use]
    pub fn status_text(&self) -> Option<String> {
        self.core.status_text()
    }

    /// URL-change warning shown while the dialog is open
    #[must_use]
    pub fn warning_text(&self) -> Option<String> {
        if self.core.phase() == Phase::Closed {
            return None;
        }
        let messages = self.core.messages;
        let mut text = self.core.render(messages.url_warning, &[]);
        let affected_message = messages
            .affected_entries
            .filter(|_| self.affected_entry_count > 0);
        if let Some(message) = affected_message {
            let noun = if self.affected_entry_count == 1 {
                "entry"
            } else {
                "entries"
            };
            let affected = self.core.render(
                message,
                &[
                    ("count", self.affected_entry_count.to_string()),
                    ("noun", noun.to_string()),
                ],
            );
            text.push(' ');
            text.push_str(&affected);
        }
        Some(text)
    }
}

impl fmt::Debug for FolderRenameRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderRenameRequest")
            .field("core", &self.core)
            .field("folder_path", &self.folder_path)
            .field("folder_name", &self.folder_name)
            .field("affected_entry_count", &self.affected_entry_count)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}
