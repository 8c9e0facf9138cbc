//! Hides embed markup (`?[[path]]`) unless the selection touches it.
//!
//! Re-derived from the tree and selection on every transaction, including
//! selection-only ones; nothing carries over between passes.

use crate::locator::locate_tags;
use scrawl_editor::{Decoration, DecorationField, DecorationSet, DecorationSetBuilder, EditorState, Transaction};
use tracing::warn;

#[derive(Debug, Default)]
pub struct ConcealField {
    decorations: DecorationSet,
}

impl ConcealField {
    pub fn new() -> Self {
        Self::default()
    }

    fn conceal(state: &EditorState) -> DecorationSet {
        let selection = state.selection();
        let mut builder = DecorationSetBuilder::new();

        for tag in locate_tags(state.syntax_tree(), state.doc()) {
            let range = tag.tag_range();
            if selection.touches(range.start, range.end) {
                continue;
            }
            if let Err(e) = builder.add(range.start, range.end, Decoration::replace()) {
                warn!(error = %e, "Concealment range rejected");
            }
        }
        builder.finish()
    }
}

impl DecorationField for ConcealField {
    fn name(&self) -> &str {
        "scrawl-conceal"
    }

    fn create(&mut self, state: &EditorState) {
        self.decorations = Self::conceal(state);
    }

    fn update(&mut self, tr: &Transaction) {
        self.decorations = Self::conceal(&tr.state);
    }

    fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrawl_editor::Selection;

    fn concealed(doc: &str, cursor: usize) -> Vec<(usize, usize)> {
        let state = EditorState::new(doc).with_selection(Selection::cursor(cursor)).unwrap();
        ConcealField::conceal(&state).replaced().collect()
    }

    #[test]
    fn test_hidden_when_cursor_elsewhere() {
        // link target spans 10..20
        let doc = "0123456?[[abcdefghij]] tail";
        assert_eq!(concealed(doc, 5), vec![(7, 22)]);
    }

    #[test]
    fn test_shown_when_cursor_inside() {
        let doc = "0123456?[[abcdefghij]] tail";
        assert!(concealed(doc, 15).is_empty());
    }

    #[test]
    fn test_shown_when_cursor_at_either_edge() {
        let doc = "0123456?[[abcdefghij]] tail";
        assert!(concealed(doc, 7).is_empty());
        assert!(concealed(doc, 22).is_empty());
        assert_eq!(concealed(doc, 23), vec![(7, 22)]);
    }

    #[test]
    fn test_selection_range_overlapping_tag() {
        let doc = "ab ?[[x]] cd ?[[y]]";
        let state = EditorState::new(doc)
            .with_selection(Selection::range(0, 5))
            .unwrap();

        let hidden: Vec<_> = ConcealField::conceal(&state).replaced().collect();
        assert_eq!(hidden, vec![(13, 19)]);
    }

    #[test]
    fn test_plain_links_never_hidden() {
        assert!(concealed("see [[note]]", 0).is_empty());
    }
}
