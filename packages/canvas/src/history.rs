//! # Edit History
//!
//! Undo/redo for scene canvases.
//!
//! ## Design
//!
//! - Each edit computes its inverse against the target before it is applied
//! - Undo applies the inverses (newest first) and moves the batch to redo
//! - New edits clear the redo stack
//! - A batch groups several edits into one undo step
//! - The oldest batch is dropped once `max_levels` is exceeded (0 = unlimited)

use std::fmt;

/// A reversible change to some target
pub trait Edit: Clone + fmt::Debug {
    type Target;

    /// The edit that undoes `self` when applied right after it
    fn inverse(&self, target: &Self::Target) -> Self;

    fn apply(&self, target: &mut Self::Target);
}

/// Edits undone and redone together
#[derive(Debug, Clone)]
pub struct EditBatch<E> {
    /// In application order
    pub edits: Vec<E>,

    /// In undo order
    pub inverses: Vec<E>,

    pub description: Option<String>,
}

impl<E> EditBatch<E> {
    fn empty() -> Self {
        Self {
            edits: Vec::new(),
            inverses: Vec::new(),
            description: None,
        }
    }
}

#[derive(Debug)]
pub struct History<E: Edit> {
    undo_stack: Vec<EditBatch<E>>,
    redo_stack: Vec<EditBatch<E>>,
    max_levels: usize,
    current_batch: Option<EditBatch<E>>,
}

impl<E: Edit> History<E> {
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply an edit and record it
    pub fn apply(&mut self, edit: E, target: &mut E::Target) {
        let inverse = edit.inverse(target);
        edit.apply(target);

        match &mut self.current_batch {
            Some(batch) => {
                batch.edits.push(edit);
                batch.inverses.insert(0, inverse);
            }
            None => self.push_batch(EditBatch {
                edits: vec![edit],
                inverses: vec![inverse],
                description: None,
            }),
        }
    }

    pub fn begin_batch(&mut self, description: impl Into<String>) {
        let mut batch = EditBatch::empty();
        batch.description = Some(description.into());
        self.current_batch = Some(batch);
    }

    /// Close the open batch; empty batches are discarded
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.edits.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    fn push_batch(&mut self, batch: EditBatch<E>) {
        self.undo_stack.push(batch);
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, target: &mut E::Target) -> bool {
        self.end_batch();
        match self.undo_stack.pop() {
            Some(batch) => {
                for inverse in &batch.inverses {
                    inverse.apply(target);
                }
                self.redo_stack.push(batch);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self, target: &mut E::Target) -> bool {
        match self.redo_stack.pop() {
            Some(batch) => {
                for edit in &batch.edits {
                    edit.apply(target);
                }
                self.undo_stack.push(batch);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().and_then(|b| b.description.as_deref())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }
}

impl<E: Edit> Default for History<E> {
    fn default() -> Self {
        Self::new()
    }
}
