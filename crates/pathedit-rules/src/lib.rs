//! Path segments and syntactic name rules
//!
//! The synchronous half of folder renames and entry path edits:
//! - [`SegmentPath`] and [`EntryLocation`] rebuild full paths from a new name
//! - [`validate_syntax`] rejects empty names, traversal and illegal characters
//!
//! # Example
//!
//! ```rust
//! use pathedit_rules::{rename_last_segment, validate_syntax, NameContext, SyntaxError};
//!
//! assert_eq!(rename_last_segment("/blog", "new-blog"), "/new-blog");
//! assert_eq!(
//!     validate_syntax("..", NameContext::FolderName),
//!     Some(SyntaxError::PathTraversal)
//! );
//! assert_eq!(
//!     validate_syntax("../etc", NameContext::FolderName),
//!     Some(SyntaxError::IllegalCharacters)
//! );
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod path;
pub mod rules;

pub use path::{join, rename_last_segment, EntryLocation, PathError, SegmentPath, SEPARATOR};
pub use rules::{check_syntax, validate_syntax, NameContext, SyntaxError, TRAVERSAL};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
