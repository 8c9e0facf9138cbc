//! # Scrawl Editor
//!
//! The editor framework scrawl extensions plug into.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ EditorState: text + syntax tree + selection │
//! └─────────────────────────────────────────────┘
//!                     ↓ TransactionSpec
//! ┌─────────────────────────────────────────────┐
//! │ Transaction: ChangeSet (position mapping)   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ DecorationFields → DecorationSets           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ EditorView: mounts widget elements lazily   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Static (read-only) rendering goes through [`PostProcessorRegistry`]
//! instead, once per rendered block.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scrawl_editor::{EditorState, EditorView, TransactionSpec};
//!
//! let mut view = EditorView::new(EditorState::new("Hello"), fields);
//! view.dispatch(TransactionSpec::insert(5, " world"))?;
//! ```

mod changes;
mod decoration;
mod errors;
mod field;
mod post_process;
mod state;
mod transaction;
mod view;
mod widget;

pub use changes::{Assoc, Change, ChangeSet};
pub use decoration::{
    Decoration, DecorationRange, DecorationSet, DecorationSetBuilder, WidgetDecoration,
};
pub use errors::EditorError;
pub use field::DecorationField;
pub use post_process::{
    render_blocks, PostProcessContext, PostProcessor, PostProcessorRegistry, RenderedBlock,
    SectionInfo,
};
pub use state::{EditorState, Selection};
pub use transaction::{Transaction, TransactionSpec};
pub use view::{EditorView, MountedWidget};
pub use widget::WidgetType;

// Re-export the tree types extensions walk
pub use scrawl_parser::{NodeKind, SyntaxNode, SyntaxTree};
