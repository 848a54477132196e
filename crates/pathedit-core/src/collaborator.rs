//! Host-supplied collaborators
//!
//! The dialogs never touch the host's folder or entry records. They call:
//! - a [`Validator`] for uniqueness/policy checks beyond syntax
//! - a [`Committer`] to perform the rename or path update
//! - a [`Translator`] for user-facing copy

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Failure reported by a collaborator
///
/// Carries the human-readable message shown inline. An empty message makes
/// the dialog fall back to its own translated copy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CollaboratorError {
    message: String,
}

impl CollaboratorError {
    /// Create error with message
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error message (may be empty)
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Answer from a [`Validator`]
///
/// Mirrors the host's `{error?: string}` shape; a missing or empty `error`
/// means the candidate is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    /// Rejection message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationVerdict {
    /// Accepting verdict
    #[inline]
    #[must_use]
    pub fn accepted() -> Self {
        Self::default()
    }

    /// Rejecting verdict
    #[inline]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    /// Rejection message, if any and non-empty
    #[inline]
    #[must_use]
    pub fn rejection(&self) -> Option<&str> {
        self.error.as_deref().filter(|m| !m.is_empty())
    }

    /// Parse a host JSON answer; `null` yields `None`
    ///
    /// # Errors
    /// Returns error if the JSON is neither `null` nor an object
    pub fn from_json(json: &str) -> Result<Option<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Candidate handed to a [`Validator`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRequest {
    /// Fully-qualified path the candidate would produce
    pub full_path: String,
    /// The candidate name itself
    pub leaf_name: String,
}

impl ValidationRequest {
    /// Create request
    #[inline]
    pub fn new(full_path: impl Into<String>, leaf_name: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
            leaf_name: leaf_name.into(),
        }
    }
}

/// What a confirmed session asks the host to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CommitRequest {
    /// Rename a folder from one full path to another
    RenameFolder {
        /// Path before the rename
        old_path: String,
        /// Path after the rename (same depth)
        new_path: String,
    },
    /// Store a new path for an entry
    UpdateEntryPath {
        /// Full stored path including collection folder
        new_path: String,
        /// New filename
        filename: String,
    },
}

impl CommitRequest {
    /// Positional arguments in host order
    ///
    /// `(oldPath, newPath)` for folders, `(newPath, filename)` for entries.
    #[inline]
    #[must_use]
    pub fn args(&self) -> (&str, &str) {
        match self {
            Self::RenameFolder { old_path, new_path } => (old_path.as_str(), new_path.as_str()),
            Self::UpdateEntryPath { new_path, filename } => (new_path.as_str(), filename.as_str()),
        }
    }

    /// Path the host record ends up at
    #[inline]
    #[must_use]
    pub fn new_path(&self) -> &str {
        match self {
            Self::RenameFolder { new_path, .. } | Self::UpdateEntryPath { new_path, .. } => {
                new_path.as_str()
            }
        }
    }
}

/// Asynchronous uniqueness/policy check
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Validator: Send + Sync {
    /// Check a candidate; `Ok(None)` and an empty verdict both accept
    async fn validate(
        &self,
        request: ValidationRequest,
    ) -> Result<Option<ValidationVerdict>, CollaboratorError>;
}

/// Asynchronous rename / path update
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Committer: Send + Sync {
    /// Apply the change; the host owns atomicity
    async fn commit(&self, request: CommitRequest) -> Result<(), CollaboratorError>;
}

/// Lookup of user-facing copy
///
/// Always returns a string; `default_value` is used when the key is unknown.
pub trait Translator: Send + Sync {
    /// Translate `key`, interpolating `args`
    fn translate(&self, key: &str, default_value: &str, args: &[(&str, String)]) -> String;
}
