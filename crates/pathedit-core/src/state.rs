//! Session and dialog state
//!
//! A dialog is a tagged union over its phases. The [`RenameSession`] payload
//! exists only while the dialog is open; closing discards it.
//!
//! ```text
//! Closed ──open──▶ Editing ◀──────▶ Validating
//!   ▲                 │  ▲
//!   │              confirm│ failure
//!   │                 ▼  │
//!   └───success─── Committing
//! ```

use crate::collaborator::CommitRequest;
use crate::error::{ConfirmBlocker, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Identifier attached to a dialog's log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Ulid);

impl SessionId {
    /// Generate new session ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which affordances the UI enables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// No session; only the open affordance is shown
    Closed,
    /// Input enabled
    Editing,
    /// Input enabled, a validator check is pending or in flight
    Validating,
    /// Commit in flight; input and confirm disabled
    Committing,
}

/// One open rename / path-edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameSession {
    original_value: String,
    candidate_value: String,
    validation_error: Option<SessionError>,
}

impl RenameSession {
    /// Start a session with the candidate equal to the original
    #[inline]
    pub fn new(original_value: impl Into<String>) -> Self {
        let original_value = original_value.into();
        Self {
            candidate_value: original_value.clone(),
            original_value,
            validation_error: None,
        }
    }

    /// Value before editing
    #[inline]
    #[must_use]
    pub fn original_value(&self) -> &str {
        &self.original_value
    }

    /// Current user input
    #[inline]
    #[must_use]
    pub fn candidate_value(&self) -> &str {
        &self.candidate_value
    }

    /// Error shown inline, if any
    #[inline]
    #[must_use]
    pub fn validation_error(&self) -> Option<&SessionError> {
        self.validation_error.as_ref()
    }

    /// Check if the candidate equals the original
    #[inline]
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.candidate_value == self.original_value
    }

    /// Replace the candidate, clearing any error
    #[inline]
    pub fn set_candidate(&mut self, candidate: impl Into<String>) {
        self.candidate_value = candidate.into();
        self.validation_error = None;
    }

    /// Set or clear the inline error
    #[inline]
    pub fn set_error(&mut self, error: Option<SessionError>) {
        self.validation_error = error;
    }

    /// Make the current candidate the new baseline
    #[inline]
    pub fn rebase(&mut self) {
        self.original_value = self.candidate_value.clone();
    }

    /// Why confirm is refused for this session, if it is
    #[must_use]
    pub fn confirm_blocker(&self) -> Option<ConfirmBlocker> {
        if self
            .validation_error
            .as_ref()
            .is_some_and(SessionError::blocks_confirm)
        {
            Some(ConfirmBlocker::HasError)
        } else if self.candidate_value.trim().is_empty() {
            Some(ConfirmBlocker::EmptyCandidate)
        } else {
            None
        }
    }
}

/// Dialog state with per-phase payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DialogState {
    /// No session
    #[default]
    Closed,
    /// Session open for input
    Editing(RenameSession),
    /// Session open, validator check `request` pending
    Validating {
        /// The session
        session: RenameSession,
        /// Sequence number of the latest scheduled check
        request: u64,
        /// The host is awaiting this check; typing is refused until it lands
        input_locked: bool,
    },
    /// Commit in flight
    Committing {
        /// The session (its error is always cleared)
        session: RenameSession,
        /// What was handed to the committer
        target: CommitRequest,
    },
}

impl DialogState {
    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Closed => Phase::Closed,
            Self::Editing(_) => Phase::Editing,
            Self::Validating { .. } => Phase::Validating,
            Self::Committing { .. } => Phase::Committing,
        }
    }

    /// Open session, if any
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&RenameSession> {
        match self {
            Self::Closed => None,
            Self::Editing(session)
            | Self::Validating { session, .. }
            | Self::Committing { session, .. } => Some(session),
        }
    }

    /// Check if a session is open
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Check if the input refuses new values
    #[inline]
    #[must_use]
    pub fn is_input_locked(&self) -> bool {
        matches!(
            self,
            Self::Committing { .. } | Self::Validating { input_locked: true, .. }
        )
    }

    /// Why confirm is refused right now, if it is
    ///
    /// A closed dialog has no confirm control and reports `None`; use
    /// [`DialogState::can_confirm`] for the boolean.
    #[must_use]
    pub fn confirm_blocker(&self) -> Option<ConfirmBlocker> {
        match self {
            Self::Editing(session) => session.confirm_blocker(),
            Self::Validating { .. } | Self::Committing { .. } => Some(ConfirmBlocker::Validating),
            Self::Closed => None,
        }
    }

    /// Check if confirm is enabled
    #[inline]
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        matches!(self, Self::Editing(_)) && self.confirm_blocker().is_none()
    }

    /// Check if cancel is enabled
    #[inline]
    #[must_use]
    pub fn can_cancel(&self, allow_while_committing: bool) -> bool {
        match self {
            Self::Closed => false,
            Self::Editing(_) | Self::Validating { .. } => true,
            Self::Committing { .. } => allow_while_committing,
        }
    }

    /// Take the state out, leaving `Closed`
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
