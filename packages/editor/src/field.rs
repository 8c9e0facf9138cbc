//! Extension point for decoration providers.

use crate::decoration::DecorationSet;
use crate::state::EditorState;
use crate::transaction::Transaction;

/// A stateful source of decorations, run on every transaction
///
/// Fields are created per view and dropped with it, so any state they own
/// lives exactly as long as the view.
pub trait DecorationField {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Derive the initial decorations for a freshly opened view
    fn create(&mut self, state: &EditorState);

    /// Re-derive decorations after a transaction
    fn update(&mut self, tr: &Transaction);

    /// Decorations as of the last `create`/`update`
    fn decorations(&self) -> &DecorationSet;
}
