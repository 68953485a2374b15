//! Reference pattern matching and rewriting
//!
//! Recognizes:
//! :doc:`Label<target>`
//!
//! and rewrites each occurrence into:
//! [Label](target)
//!
//! Matches are leftmost and non-overlapping. Anything that does not fit the
//! grammar exactly is copied through untouched.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::refs::error::RewriteError;

/// Role marker that opens a reference
pub const DOC_MARKER: &str = ":doc:`";

/// Static regex for doc references
/// Format: :doc:`Label<target>`
///
/// Neither capture may contain a backtick, so a capture never runs past the
/// closing backtick of its own role.
pub static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s):doc:`([^<`]+)<([^>`]+)>`").expect("Invalid REFERENCE_RE regex")
});

/// A reference located in a piece of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Display text
    pub label: String,

    /// Link destination
    pub target: String,

    /// The complete markup as written, e.g. :doc:`Guide<guide.md>`
    pub raw: String,

    /// Byte offset of the match start
    pub start: usize,

    /// Byte offset one past the match end
    pub end: usize,

    /// 1-indexed line of the match start
    pub line: u32,
}

impl Reference {
    /// The link this reference rewrites to
    pub fn to_link(&self) -> String {
        format_link(&self.label, &self.target)
    }

    /// Number of lines the markup spans (labels may wrap)
    pub fn line_span(&self) -> u32 {
        self.raw.matches('\n').count() as u32 + 1
    }
}

fn format_link(label: &str, target: &str) -> String {
    format!("[{}]({})", label, target)
}

/// Rewrite every reference in `text` into link syntax
pub fn rewrite(text: &str) -> String {
    rewrite_cow(text).into_owned()
}

/// Same as [`rewrite`], borrowing the input when nothing matched
pub fn rewrite_cow(text: &str) -> Cow<'_, str> {
    REFERENCE_RE.replace_all(text, |caps: &Captures| format_link(&caps[1], &caps[2]))
}

/// Rewrite raw bytes, rejecting input that is not UTF-8 text
pub fn rewrite_bytes(bytes: &[u8]) -> Result<String, RewriteError> {
    let text = std::str::from_utf8(bytes).map_err(|e| RewriteError::InvalidInputKind {
        reason: e.to_string(),
    })?;
    Ok(rewrite(text))
}

/// Take ownership of bytes as text, without rewriting them
pub fn into_text(bytes: Vec<u8>) -> Result<String, RewriteError> {
    String::from_utf8(bytes).map_err(|e| RewriteError::InvalidInputKind {
        reason: e.utf8_error().to_string(),
    })
}

/// Find all references in `text`, in the order `rewrite` replaces them
pub fn find_references(text: &str) -> Vec<Reference> {
    let mut references = Vec::new();
    let mut line = 1u32;
    let mut scanned = 0usize;

    for caps in REFERENCE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        line += text[scanned..whole.start()].matches('\n').count() as u32;
        scanned = whole.start();

        references.push(Reference {
            label: caps[1].to_string(),
            target: caps[2].to_string(),
            raw: whole.as_str().to_string(),
            start: whole.start(),
            end: whole.end(),
            line,
        });
    }

    references
}

/// Count references without allocating them
pub fn count_references(text: &str) -> usize {
    REFERENCE_RE.find_iter(text).count()
}
