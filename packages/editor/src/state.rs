//! # Editor State
//!
//! Immutable snapshot of a note: its text, the syntax tree parsed from that
//! text, and the selection. A new state is produced for every transaction;
//! the tree is shared between clones.

use crate::changes::{Assoc, ChangeSet};
use crate::transaction::{Transaction, TransactionSpec};
use crate::EditorError;
use scrawl_parser::{parse, SyntaxTree};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Selection as an anchor and a head; a cursor when they coincide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn cursor(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn range(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Whether the selection touches `[from, to]` (inclusive of both ends)
    pub fn touches(&self, from: usize, to: usize) -> bool {
        self.from() <= to && self.to() >= from
    }

    pub fn map(&self, changes: &ChangeSet) -> Self {
        Self {
            anchor: changes.map_pos(self.anchor, Assoc::After),
            head: changes.map_pos(self.head, Assoc::After),
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::cursor(0)
    }
}

/// Snapshot of a note under edit
#[derive(Debug, Clone)]
pub struct EditorState {
    doc: Rc<str>,
    tree: Rc<SyntaxTree>,
    selection: Selection,
    version: u64,
}

impl EditorState {
    /// Create a state with the cursor at the start of the document
    pub fn new(doc: impl Into<String>) -> Self {
        let doc: String = doc.into();
        let tree = parse(&doc);
        Self {
            doc: Rc::from(doc),
            tree: Rc::new(tree),
            selection: Selection::default(),
            version: 0,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Result<Self, EditorError> {
        self.check_selection(&selection)?;
        self.selection = selection;
        Ok(self)
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn len(&self) -> usize {
        self.doc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// Syntax tree for the current text
    pub fn syntax_tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Whether two states share the same tree snapshot
    pub fn same_tree(&self, other: &EditorState) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Number of document-changing transactions since creation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Slice of the text, or `None` when the range is out of bounds or
    /// splits a character
    pub fn slice(&self, from: usize, to: usize) -> Option<&str> {
        if from > to {
            return None;
        }
        self.doc.get(from..to)
    }

    /// Apply a transaction spec, producing the transaction and new state
    pub fn update(&self, spec: TransactionSpec) -> Result<Transaction, EditorError> {
        let changes = ChangeSet::new(spec.changes, &self.doc)?;

        let (doc, tree, version) = if changes.is_empty() {
            (self.doc.clone(), self.tree.clone(), self.version)
        } else {
            let text = changes.apply(&self.doc);
            let tree = Rc::new(parse(&text));
            (Rc::from(text), tree, self.version + 1)
        };

        let selection_set = spec.selection.is_some();
        let selection = spec.selection.unwrap_or_else(|| self.selection.map(&changes));

        let state = EditorState {
            doc,
            tree,
            selection,
            version,
        };
        state.check_selection(&selection)?;

        Ok(Transaction::new(self.clone(), changes, state, selection_set))
    }

    fn check_selection(&self, selection: &Selection) -> Result<(), EditorError> {
        for pos in [selection.anchor, selection.head] {
            if pos > self.len() {
                return Err(EditorError::SelectionOutOfBounds {
                    pos,
                    len: self.len(),
                });
            }
            if !self.doc.is_char_boundary(pos) {
                return Err(EditorError::NotCharBoundary { pos });
            }
        }
        Ok(())
    }
}
