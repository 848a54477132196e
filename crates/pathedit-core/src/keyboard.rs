//! Keyboard contract
//!
//! Enter confirms when confirm is enabled. Escape cancels whenever cancel is
//! enabled, including mid-validation. Other keys are left to the input.

use crate::dialog::ConfirmOutcome;
use crate::entry::EntryPathRequest;
use crate::error::DialogError;
use crate::folder::FolderRenameRequest;
use async_trait::async_trait;

/// Keys the dialogs react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

impl From<&str> for Key {
    /// Map a DOM-style key name
    fn from(name: &str) -> Self {
        match name {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }
}

/// What a key press did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Confirmed(ConfirmOutcome),
    Cancelled,
    Ignored,
}

/// Confirm/cancel surface shared by both dialogs
#[async_trait]
pub trait RenameDialog: Send + Sync {
    fn can_confirm(&self) -> bool;

    fn can_cancel(&self) -> bool;

    async fn confirm(&self) -> Result<ConfirmOutcome, DialogError>;

    fn cancel(&self) -> Result<(), DialogError>;
}

#[async_trait]
impl RenameDialog for FolderRenameRequest {
    fn can_confirm(&self) -> bool {
        FolderRenameRequest::can_confirm(self)
    }

    fn can_cancel(&self) -> bool {
        FolderRenameRequest::can_cancel(self)
    }

    async fn confirm(&self) -> Result<ConfirmOutcome, DialogError> {
        FolderRenameRequest::confirm(self).await
    }

    fn cancel(&self) -> Result<(), DialogError> {
        FolderRenameRequest::cancel(self)
    }
}

#[async_trait]
impl RenameDialog for EntryPathRequest {
    fn can_confirm(&self) -> bool {
        EntryPathRequest::can_confirm(self)
    }

    fn can_cancel(&self) -> bool {
        EntryPathRequest::can_cancel(self)
    }

    async fn confirm(&self) -> Result<ConfirmOutcome, DialogError> {
        EntryPathRequest::confirm(self).await
    }

    fn cancel(&self) -> Result<(), DialogError> {
        EntryPathRequest::cancel(self)
    }
}

/// Apply the keyboard contract to `dialog`
///
/// # Errors
/// Propagates errors from confirm or cancel; keys that find their control
/// disabled are `Ignored` instead
pub async fn handle_key<D>(dialog: &D, key: Key) -> Result<KeyOutcome, DialogError>
where
    D: RenameDialog + ?Sized,
{
    match key {
        Key::Enter if dialog.can_confirm() => dialog.confirm().await.map(KeyOutcome::Confirmed),
        Key::Escape if dialog.can_cancel() => dialog.cancel().map(|()| KeyOutcome::Cancelled),
        _ => Ok(KeyOutcome::Ignored),
    }
}
