//! Error types for pathedit Core
//!
//! Two families:
//! - [`SessionError`]: what the user sees inline next to the input. These are
//!   stored on the session and never propagate to the host.
//! - [`DialogError`]: the host called an operation the current state does not
//!   allow (confirm on a closed dialog, input while committing).

use pathedit_rules::SyntaxError;
use serde::Serialize;

/// Classification of a [`SessionError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Candidate is empty or whitespace-only
    EmptyName,
    /// Candidate contains a rejected character
    IllegalCharacters,
    /// Candidate contains `..`
    PathTraversal,
    /// Filename contains `/` or `\`
    EmbeddedSeparator,
    /// Validator answered with an error message
    ValidatorRejected,
    /// Validator call itself failed
    ValidatorFailed,
    /// Committer call failed after confirmation
    CommitFailed,
}

impl From<SyntaxError> for ErrorKind {
    fn from(err: SyntaxError) -> Self {
        match err {
            SyntaxError::EmptyName => ErrorKind::EmptyName,
            SyntaxError::IllegalCharacters => ErrorKind::IllegalCharacters,
            SyntaxError::PathTraversal => ErrorKind::PathTraversal,
            SyntaxError::EmbeddedSeparator => ErrorKind::EmbeddedSeparator,
        }
    }
}

/// Error shown inline on an open session
///
/// `Display` yields the user-facing (translated) message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Local syntactic rule failed
    #[error("{message}")]
    Syntax {
        /// Which rule
        kind: SyntaxError,
        /// Translated message
        message: String,
    },

    /// Validator returned `{error}`
    #[error("{0}")]
    ValidatorRejected(String),

    /// Validator call failed
    #[error("{0}")]
    ValidatorFailed(String),

    /// Committer call failed
    #[error("{0}")]
    CommitFailed(String),
}

impl SessionError {
    /// Create syntax error with its translated message
    #[inline]
    pub fn syntax(kind: SyntaxError, message: impl Into<String>) -> Self {
        Self::Syntax {
            kind,
            message: message.into(),
        }
    }

    /// Classify this error
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { kind, .. } => ErrorKind::from(*kind),
            Self::ValidatorRejected(_) => ErrorKind::ValidatorRejected,
            Self::ValidatorFailed(_) => ErrorKind::ValidatorFailed,
            Self::CommitFailed(_) => ErrorKind::CommitFailed,
        }
    }

    /// User-facing message
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Syntax { message, .. }
            | Self::ValidatorRejected(message)
            | Self::ValidatorFailed(message)
            | Self::CommitFailed(message) => message.as_str(),
        }
    }

    /// Check if error came from the local rule set
    #[inline]
    #[must_use]
    pub fn is_syntactic(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    /// Check if this error keeps the confirm control disabled
    ///
    /// A failed commit is shown but may be retried as is.
    #[inline]
    #[must_use]
    pub fn blocks_confirm(&self) -> bool {
        !matches!(self, Self::CommitFailed(_))
    }
}

/// Why confirm is currently refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfirmBlocker {
    /// A validation check is pending or in flight
    Validating,
    /// The session shows a blocking error
    HasError,
    /// The candidate is empty
    EmptyCandidate,
}

/// Operation not allowed in the dialog's current state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    /// Control was created disabled
    #[error("control is disabled")]
    Disabled,

    /// No session is open
    #[error("dialog is not open")]
    NotOpen,

    /// A session is already open
    #[error("dialog is already open")]
    AlreadyOpen,

    /// A commit is in flight and inputs are locked
    #[error("a commit is in flight")]
    CommitInFlight,

    /// An immediate validation is in flight and inputs are locked
    #[error("a validation is in flight")]
    ValidationInFlight,

    /// Confirm is currently disabled
    #[error("confirm is disabled: {0:?}")]
    ConfirmDisabled(ConfirmBlocker),
}

impl DialogError {
    /// Check if retrying later may succeed without user action
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::CommitInFlight
                | Self::ValidationInFlight
                | Self::ConfirmDisabled(ConfirmBlocker::Validating)
        )
    }
}
