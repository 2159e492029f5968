//! Context assembly.
//!
//! Joins retrieved review documents into a single context string bounded by a
//! character budget. Whole documents are kept or dropped; only the fallback
//! for an oversized first document truncates.

use super::store::ReviewDocument;

/// Separator between documents; counted against the budget.
const SEPARATOR: &str = "\n\n";
const SEPARATOR_LEN: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder {
    max_chars: usize,
}

impl ContextBuilder {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn build(&self, documents: &[ReviewDocument]) -> String {
        assemble(documents, self.max_chars)
    }
}

/// Concatenate document contents in order while `total + len + 2` stays
/// within `max_chars`. Lengths are in characters.
///
/// Never returns empty text for a non-empty list: if no document fits, the
/// first document's content truncated to `max_chars` characters is returned.
pub fn assemble(documents: &[ReviewDocument], max_chars: usize) -> String {
    let Some(first) = documents.first() else {
        return String::new();
    };

    let mut parts: Vec<&str> = Vec::new();
    let mut total = 0usize;

    for document in documents {
        let len = document.content.chars().count();
        if total + len + SEPARATOR_LEN > max_chars {
            break;
        }
        parts.push(&document.content);
        total += len + SEPARATOR_LEN;
    }

    if parts.is_empty() {
        return first.content.chars().take(max_chars).collect();
    }

    parts.join(SEPARATOR)
}
