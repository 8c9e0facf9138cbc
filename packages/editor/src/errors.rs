//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Change {from}..{to} is out of bounds for a document of length {len}")]
    ChangeOutOfBounds { from: usize, to: usize, len: usize },

    #[error("Offset {pos} is not on a character boundary")]
    NotCharBoundary { pos: usize },

    #[error("Changes overlap at {pos}")]
    OverlappingChanges { pos: usize },

    #[error("Selection {pos} is out of bounds for a document of length {len}")]
    SelectionOutOfBounds { pos: usize, len: usize },

    #[error("Decoration at {from} added after one at {previous}")]
    UnsortedDecoration { from: usize, previous: usize },

    #[error("Invalid decoration range {from}..{to}")]
    InvalidDecorationRange { from: usize, to: usize },

    #[error("View has been destroyed")]
    ViewDestroyed,

    #[error("Widget error: {0}")]
    Widget(String),

    #[error("Post-processor `{processor}` failed: {message}")]
    PostProcess { processor: String, message: String },
}
