//! pathedit Core - folder rename and entry path dialogs
//!
//! Two state machines over one shared core:
//! - [`FolderRenameRequest`] renames the last segment of a folder path
//! - [`EntryPathRequest`] edits an entry's filename within its folder
//!
//! Both check syntax on every keystroke, debounce an optional host
//! [`Validator`], and hand confirmed changes to a host [`Committer`].
//!
//! # Example
//!
//! ```rust,ignore
//! use pathedit_core::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example(committer: Arc<dyn Committer>) -> Result<(), DialogError> {
//! let dialog = FolderRenameRequest::new("/blog", "blog", committer);
//! dialog.open()?;
//! dialog.input("new-blog")?;
//!
//! let outcome = dialog.confirm().await?;
//! assert!(outcome.is_committed());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod collaborator;
pub mod config;
pub mod dialog;
pub mod entry;
pub mod error;
pub mod folder;
pub mod gate;
pub mod keyboard;
pub mod messages;
pub mod state;

// Re-exports for convenience
pub use collaborator::{
    CollaboratorError, CommitRequest, Committer, Translator, ValidationRequest, ValidationVerdict,
    Validator,
};
pub use config::{ConfigError, DialogConfig, EntryUpdateMode, DEFAULT_DEBOUNCE_MS};
pub use dialog::ConfirmOutcome;
pub use entry::{ApplyOutcome, EntryPathPreview, EntryPathRequest, PendingChangeListener};
pub use error::{ConfirmBlocker, DialogError, ErrorKind, SessionError};
pub use folder::FolderRenameRequest;
pub use gate::ValidationGate;
pub use keyboard::{handle_key, Key, KeyOutcome, RenameDialog};
pub use messages::{DefaultTranslator, DialogMessages, Message, ENTRY_PATH, FOLDER_RENAME};
pub use state::{DialogState, Phase, RenameSession, SessionId};

pub use pathedit_rules::{EntryLocation, NameContext, SyntaxError};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosting the dialogs
    pub use crate::{
        handle_key, ApplyOutcome, CollaboratorError, CommitRequest, Committer, ConfirmOutcome,
        DialogConfig, DialogError, EntryPathRequest, EntryUpdateMode, FolderRenameRequest, Key,
        KeyOutcome, Phase, SessionError, ValidationRequest, ValidationVerdict, Validator,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
