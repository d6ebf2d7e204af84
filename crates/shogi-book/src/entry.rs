//! A single candidate move stored against a position key.

use shogi_core::Move;

/// One opening-book candidate for a position.
///
/// `weight` is a positive natural number; callers construct this directly
/// ([`BookEntry`]'s fields are public), but [`crate::OpeningBook::add_entry`]
/// rejects a zero weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub mv: Move,
    pub weight: u32,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub depth: Option<u32>,
}

impl BookEntry {
    /// A bare entry with no name, comment, or depth annotation.
    pub fn new(mv: Move, weight: u32) -> Self {
        BookEntry { mv, weight, name: None, comment: None, depth: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Approximate heap footprint beyond `size_of::<BookEntry>()`, used by
    /// [`crate::OpeningBook::estimated_bytes`].
    pub(crate) fn heap_bytes(&self) -> usize {
        self.name.as_ref().map_or(0, String::len) + self.comment.as_ref().map_or(0, String::len)
    }
}
