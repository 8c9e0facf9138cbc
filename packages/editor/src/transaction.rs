//! Transactions: one atomic step from one [`EditorState`] to the next.

use crate::changes::{Change, ChangeSet};
use crate::state::{EditorState, Selection};

/// Requested edits and selection for a transaction
#[derive(Debug, Clone, Default)]
pub struct TransactionSpec {
    pub changes: Vec<Change>,
    pub selection: Option<Selection>,
}

impl TransactionSpec {
    pub fn changes(changes: Vec<Change>) -> Self {
        Self {
            changes,
            selection: None,
        }
    }

    pub fn insert(pos: usize, text: impl Into<String>) -> Self {
        Self::changes(vec![Change::insert(pos, text)])
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self::changes(vec![Change::delete(from, to)])
    }

    pub fn replace(from: usize, to: usize, text: impl Into<String>) -> Self {
        Self::changes(vec![Change::replace(from, to, text)])
    }

    pub fn select(selection: Selection) -> Self {
        Self {
            changes: Vec::new(),
            selection: Some(selection),
        }
    }

    /// Set the selection in the new document's coordinates
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// An applied transaction
#[derive(Debug, Clone)]
pub struct Transaction {
    /// State before the transaction
    pub start_state: EditorState,

    /// Edits, in `start_state` coordinates
    pub changes: ChangeSet,

    /// State after the transaction
    pub state: EditorState,

    selection_set: bool,
}

impl Transaction {
    pub(crate) fn new(
        start_state: EditorState,
        changes: ChangeSet,
        state: EditorState,
        selection_set: bool,
    ) -> Self {
        Self {
            start_state,
            changes,
            state,
            selection_set,
        }
    }

    pub fn doc_changed(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Whether the transaction set the selection explicitly
    pub fn selection_set(&self) -> bool {
        self.selection_set
    }
}
