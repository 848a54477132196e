//! User-facing copy for both dialogs
//!
//! Each [`Message`] pairs a translation key with its English default. The
//! dialogs never branch on the translated text.

use crate::collaborator::Translator;
use pathedit_rules::SyntaxError;

/// Translation key plus default copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// Translation key
    pub key: &'static str,
    /// Copy used when the key is unknown; `{{name}}` marks interpolations
    pub default_value: &'static str,
}

impl Message {
    const fn new(key: &'static str, default_value: &'static str) -> Self {
        Self { key, default_value }
    }

    /// Render through a translator
    #[inline]
    pub fn render(&self, translator: &dyn Translator, args: &[(&str, String)]) -> String {
        translator.translate(self.key, self.default_value, args)
    }
}

/// All copy one dialog needs
#[derive(Debug, Clone, Copy)]
pub struct DialogMessages {
    pub name_required: Message,
    pub invalid_characters: Message,
    pub path_traversal: Message,
    pub path_separators: Message,
    pub validation_failed: Message,
    pub commit_failed: Message,
    pub validating: Message,
    pub committing: Message,
    pub url_warning: Message,
    /// Only folder renames reach more than one entry
    pub affected_entries: Option<Message>,
    pub help: Message,
}

impl DialogMessages {
    /// Message for a syntactic rejection
    #[inline]
    #[must_use]
    pub fn for_syntax(&self, err: SyntaxError) -> Message {
        match err {
            SyntaxError::EmptyName => self.name_required,
            SyntaxError::IllegalCharacters => self.invalid_characters,
            SyntaxError::PathTraversal => self.path_traversal,
            SyntaxError::EmbeddedSeparator => self.path_separators,
        }
    }
}

/// Copy for the folder rename dialog
pub const FOLDER_RENAME: DialogMessages = DialogMessages {
    name_required: Message::new(
        "collection.folderRename.errors.nameRequired",
        "Folder name is required",
    ),
    invalid_characters: Message::new(
        "collection.folderRename.errors.invalidCharacters",
        r#"Folder name contains invalid characters: < > : " | ? * / \"#,
    ),
    path_traversal: Message::new(
        "collection.folderRename.errors.pathTraversal",
        r#"Folder name cannot contain "..""#,
    ),
    // Folder names report separators as invalid characters
    path_separators: Message::new(
        "collection.folderRename.errors.invalidCharacters",
        r#"Folder name contains invalid characters: < > : " | ? * / \"#,
    ),
    validation_failed: Message::new(
        "collection.folderRename.errors.validationFailed",
        "Validation failed",
    ),
    commit_failed: Message::new(
        "collection.folderRename.errors.renameFailed",
        "Failed to rename folder",
    ),
    validating: Message::new("collection.folderRename.validating", "Validating..."),
    committing: Message::new("collection.folderRename.renaming", "Renaming folder..."),
    url_warning: Message::new(
        "collection.folderRename.urlWarning",
        "Renaming this folder will change the URLs for all entries within it. \
         This may result in broken links and 404 errors if the old URLs are referenced elsewhere.",
    ),
    affected_entries: Some(Message::new(
        "collection.folderRename.affectedEntries",
        "This will affect {{count}} {{noun}}.",
    )),
    help: Message::new("collection.folderRename.newName", "New Folder Name"),
};

/// Copy for the entry path editor
pub const ENTRY_PATH: DialogMessages = DialogMessages {
    name_required: Message::new(
        "editor.entryPathEditor.errors.filenameRequired",
        "Filename is required",
    ),
    invalid_characters: Message::new(
        "editor.entryPathEditor.errors.invalidCharacters",
        r#"Filename contains invalid characters: < > : " | ? *"#,
    ),
    path_traversal: Message::new(
        "editor.entryPathEditor.errors.pathTraversal",
        r#"Filename cannot contain "..""#,
    ),
    path_separators: Message::new(
        "editor.entryPathEditor.errors.noPathSeparators",
        r"Filename cannot contain path separators (/ or \)",
    ),
    validation_failed: Message::new(
        "editor.entryPathEditor.errors.validationFailed",
        "Validation failed",
    ),
    commit_failed: Message::new(
        "editor.entryPathEditor.errors.updateFailed",
        "Failed to update entry path",
    ),
    validating: Message::new("editor.entryPathEditor.validating", "Validating..."),
    committing: Message::new("editor.entryPathEditor.updating", "Updating path..."),
    url_warning: Message::new(
        "editor.entryPathEditor.urlWarning",
        "Changing the filename will change the URL for this entry. \
         This may result in broken links and 404 errors if the old URL is referenced elsewhere. \
         The change will be applied when you publish.",
    ),
    affected_entries: None,
    help: Message::new(
        "editor.entryPathEditor.filenameHelp",
        "The filename for this entry (including extension)",
    ),
};

/// Translator that renders default copy with `{{name}}` interpolation
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTranslator;

impl Translator for DefaultTranslator {
    fn translate(&self, _key: &str, default_value: &str, args: &[(&str, String)]) -> String {
        interpolate(default_value, args)
    }
}

/// Replace each `{{name}}` in `template` with its value from `args`
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, String)]) -> String {
    args.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{{{name}}}}}"), value)
    })
}
