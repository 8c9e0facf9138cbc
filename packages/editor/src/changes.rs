//! # Change Sets
//!
//! A transaction's edits, expressed as non-overlapping replacements in the
//! coordinates of the document *before* the transaction. Positions held by
//! extensions (decorations, selections) are carried across an edit with
//! [`ChangeSet::map_pos`].
//!
//! ## Mapping
//!
//! - Positions before a change are unaffected by it
//! - Positions after a change shift by its length delta
//! - Positions inside a replaced range collapse onto it; [`Assoc`] decides
//!   whether they land before or after the inserted text
//! - The edges of a replaced range stick to the matching edge of the
//!   replacement

use crate::EditorError;
use serde::{Deserialize, Serialize};

/// Which side of an insertion a position sticks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

/// Replace `[from, to)` with `insert`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl Change {
    pub fn insert(pos: usize, text: impl Into<String>) -> Self {
        Self {
            from: pos,
            to: pos,
            insert: text.into(),
        }
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            insert: String::new(),
        }
    }

    pub fn replace(from: usize, to: usize, text: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: text.into(),
        }
    }

    fn delta(&self) -> isize {
        self.insert.len() as isize - (self.to - self.from) as isize
    }
}

/// Validated, sorted set of changes against one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
    old_len: usize,
}

impl ChangeSet {
    /// A change set that leaves a document of `len` bytes untouched
    pub fn empty(len: usize) -> Self {
        Self {
            changes: Vec::new(),
            old_len: len,
        }
    }

    /// Validate `changes` against `doc` and sort them
    pub fn new(mut changes: Vec<Change>, doc: &str) -> Result<Self, EditorError> {
        changes.sort_by_key(|c| (c.from, c.to));

        let len = doc.len();
        let mut previous_end = 0;
        for change in &changes {
            if change.from > change.to || change.to > len {
                return Err(EditorError::ChangeOutOfBounds {
                    from: change.from,
                    to: change.to,
                    len,
                });
            }
            for pos in [change.from, change.to] {
                if !doc.is_char_boundary(pos) {
                    return Err(EditorError::NotCharBoundary { pos });
                }
            }
            if change.from < previous_end {
                return Err(EditorError::OverlappingChanges { pos: change.from });
            }
            previous_end = change.to;
        }

        Ok(Self {
            changes,
            old_len: len,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    pub fn old_len(&self) -> usize {
        self.old_len
    }

    pub fn new_len(&self) -> usize {
        let delta: isize = self.changes.iter().map(Change::delta).sum();
        (self.old_len as isize + delta) as usize
    }

    /// Apply to the document the set was validated against
    pub fn apply(&self, doc: &str) -> String {
        let mut out = String::with_capacity(self.new_len());
        let mut cursor = 0;
        for change in &self.changes {
            out.push_str(&doc[cursor..change.from]);
            out.push_str(&change.insert);
            cursor = change.to;
        }
        out.push_str(&doc[cursor..]);
        out
    }

    /// Map a position in the old document into the new one
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut delta: isize = 0;
        for change in &self.changes {
            if pos < change.from {
                break;
            }
            let new_from = (change.from as isize + delta) as usize;
            let new_end = new_from + change.insert.len();

            if pos > change.to {
                delta += change.delta();
                continue;
            }

            let is_insertion = change.from == change.to;
            if !is_insertion && pos == change.from {
                return new_from;
            }
            if !is_insertion && pos == change.to {
                return new_end;
            }
            return match assoc {
                Assoc::Before => new_from,
                Assoc::After => new_end,
            };
        }
        (pos as isize + delta) as usize
    }

    /// Whether any change touches `[from, to]` (inclusive of both ends)
    pub fn touches_range(&self, from: usize, to: usize) -> bool {
        self.changes.iter().any(|c| c.from <= to && c.to >= from)
    }
}
