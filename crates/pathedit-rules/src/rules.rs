//! Syntactic rules for candidate folder names and filenames
//!
//! These checks run synchronously on every keystroke, before any
//! asynchronous validator is consulted. The character set is a superset of
//! what most backends reject.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static FILE_NAME_ILLEGAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"|?*]"#).expect("filename pattern is valid"));
static FOLDER_NAME_ILLEGAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"|?*/\\]"#).expect("folder name pattern is valid"));

/// Sequence rejected anywhere in a name
pub const TRAVERSAL: &str = "..";

/// What kind of name is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameContext {
    /// A single folder name; separators count as illegal characters
    FolderName,
    /// A bare filename; separators are reported separately
    FileName,
}

impl NameContext {
    /// Characters rejected in this context, space separated for display
    #[inline]
    #[must_use]
    pub fn illegal_characters(self) -> &'static str {
        match self {
            NameContext::FolderName => r#"< > : " | ? * / \"#,
            NameContext::FileName => r#"< > : " | ? *"#,
        }
    }

    fn illegal_pattern(self) -> &'static Regex {
        match self {
            NameContext::FolderName => &FOLDER_NAME_ILLEGAL,
            NameContext::FileName => &FILE_NAME_ILLEGAL,
        }
    }
}

/// Local syntactic rejection of a candidate name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum SyntaxError {
    /// Empty or whitespace-only
    #[error("name is required")]
    EmptyName,

    /// Contains `..`
    #[error("name cannot contain \"..\"")]
    PathTraversal,

    /// Contains a character from the context's illegal set
    #[error("name contains invalid characters")]
    IllegalCharacters,

    /// Filename contains `/` or `\`
    #[error("name cannot contain path separators (/ or \\)")]
    EmbeddedSeparator,
}

/// Check a candidate name, returning the first rule it breaks
///
/// Rules in order: empty name, illegal characters for the context, `..`
/// traversal, then (filenames only) embedded separators.
#[must_use]
pub fn validate_syntax(candidate: &str, context: NameContext) -> Option<SyntaxError> {
    if candidate.trim().is_empty() {
        return Some(SyntaxError::EmptyName);
    }
    if context.illegal_pattern().is_match(candidate) {
        return Some(SyntaxError::IllegalCharacters);
    }
    if candidate.contains(TRAVERSAL) {
        return Some(SyntaxError::PathTraversal);
    }
    if context == NameContext::FileName && candidate.contains(['/', '\\']) {
        return Some(SyntaxError::EmbeddedSeparator);
    }
    None
}

/// [`validate_syntax`] as a `Result`
///
/// # Errors
/// Returns the first [`SyntaxError`] the candidate triggers
#[inline]
pub fn check_syntax(candidate: &str, context: NameContext) -> Result<(), SyntaxError> {
    validate_syntax(candidate, context).map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_plain_names() {
        assert_eq!(validate_syntax("new-blog", NameContext::FolderName), None);
        assert_eq!(validate_syntax("my-post.md", NameContext::FileName), None);
        assert_eq!(validate_syntax("a.b.c", NameContext::FileName), None);
    }

    #[test]
    fn empty_and_blank_names() {
        for ctx in [NameContext::FolderName, NameContext::FileName] {
            assert_eq!(validate_syntax("", ctx), Some(SyntaxError::EmptyName));
            assert_eq!(validate_syntax("   \t", ctx), Some(SyntaxError::EmptyName));
        }
    }

    #[test]
    fn folder_rejects_separators_as_illegal() {
        assert_eq!(
            validate_syntax("a/b", NameContext::FolderName),
            Some(SyntaxError::IllegalCharacters)
        );
        assert_eq!(
            validate_syntax(r"a\b", NameContext::FolderName),
            Some(SyntaxError::IllegalCharacters)
        );
    }

    #[test]
    fn filename_reports_separator_rule() {
        assert_eq!(
            validate_syntax("a/b.md", NameContext::FileName),
            Some(SyntaxError::EmbeddedSeparator)
        );
        assert_eq!(
            validate_syntax(r"a\b.md", NameContext::FileName),
            Some(SyntaxError::EmbeddedSeparator)
        );
    }

    #[test]
    fn illegal_characters_in_both_contexts() {
        for c in ['<', '>', ':', '"', '|', '?', '*'] {
            let name = format!("bad{c}name");
            assert_eq!(
                validate_syntax(&name, NameContext::FolderName),
                Some(SyntaxError::IllegalCharacters)
            );
            assert_eq!(
                validate_syntax(&name, NameContext::FileName),
                Some(SyntaxError::IllegalCharacters)
            );
        }
    }

    #[test]
    fn traversal_detected() {
        assert_eq!(
            validate_syntax("..", NameContext::FolderName),
            Some(SyntaxError::PathTraversal)
        );
        assert_eq!(
            validate_syntax("../etc", NameContext::FileName),
            Some(SyntaxError::PathTraversal)
        );
    }

    #[test]
    fn illegal_characters_reported_before_traversal() {
        assert_eq!(
            validate_syntax("a/..", NameContext::FolderName),
            Some(SyntaxError::IllegalCharacters)
        );
        assert_eq!(
            validate_syntax("x<..", NameContext::FileName),
            Some(SyntaxError::IllegalCharacters)
        );
        assert_eq!(
            validate_syntax("a/..", NameContext::FileName),
            Some(SyntaxError::PathTraversal)
        );
    }

    #[test]
    fn check_syntax_result() {
        assert!(check_syntax("ok", NameContext::FileName).is_ok());
        assert_eq!(
            check_syntax("", NameContext::FileName),
            Err(SyntaxError::EmptyName)
        );
    }

    proptest! {
        #[test]
        fn prop_traversal_wins_without_illegal_characters(
            prefix in "[a-zA-Z0-9 ._-]{0,12}",
            suffix in "[a-zA-Z0-9 ._-]{0,12}",
            folder in any::<bool>(),
        ) {
            let ctx = if folder { NameContext::FolderName } else { NameContext::FileName };
            let candidate = format!("{prefix}..{suffix}");
            prop_assert_eq!(validate_syntax(&candidate, ctx), Some(SyntaxError::PathTraversal));
        }

        #[test]
        fn prop_blank_is_always_empty_name(
            blank in "[ \t\n\r]{0,8}",
            folder in any::<bool>(),
        ) {
            let ctx = if folder { NameContext::FolderName } else { NameContext::FileName };
            prop_assert_eq!(validate_syntax(&blank, ctx), Some(SyntaxError::EmptyName));
        }

        #[test]
        fn prop_safe_alphabet_passes(name in "[a-zA-Z0-9_-][a-zA-Z0-9_ -]{0,20}") {
            prop_assert_eq!(validate_syntax(&name, NameContext::FolderName), None);
            prop_assert_eq!(validate_syntax(&name, NameContext::FileName), None);
        }
    }
}
