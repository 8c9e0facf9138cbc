//! # Scrawl Parser
//!
//! Turns note text into a [`SyntaxTree`] of lines, text runs and internal
//! links (`[[target]]`). This is the host-side tree the embed extension
//! walks; it recognizes links only and leaves every other construct as text.

pub mod parser;
pub mod tokenizer;
pub mod tree;

pub use parser::{parse, Parser};
pub use tokenizer::{tokenize, Token};
pub use tree::{NodeId, NodeKind, Preorder, SyntaxNode, SyntaxTree};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_note() {
        let tree = parse("");
        assert_eq!(tree.source_len(), 0);
        assert_eq!(tree.nodes_of_kind(NodeKind::Line).count(), 1);
    }
}
