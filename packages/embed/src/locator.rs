//! # Tag Locator
//!
//! Finds drawing embeds in a note. An embed is an internal link whose
//! opening brackets are immediately preceded by `?`:
//!
//! ```text
//! Hello ?[[draw.png]] world
//!       ^  ^        ^ ^
//!       |  from     | insertion offset
//!       marker      to
//! ```
//!
//! Offsets are byte offsets into the note text.

use scrawl_parser::{NodeKind, SyntaxTree};
use std::ops::Range;

/// Text immediately before the link target
pub const EMBED_MARKER: &str = "?[[";

/// Length of the closing `]]` after the link target
pub const CLOSE_LEN: usize = 2;

/// One embed occurrence in the current text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Path of the embedded drawing
    pub identity: String,

    /// The link target's span
    pub span: Range<usize>,
}

impl TagMatch {
    /// Where the `?` sits
    pub fn marker_start(&self) -> usize {
        self.span.start - EMBED_MARKER.len()
    }

    /// Just past the closing brackets; the widget goes here
    pub fn insertion_offset(&self) -> usize {
        self.span.end + CLOSE_LEN
    }

    /// The whole tag, marker through closing brackets
    pub fn tag_range(&self) -> Range<usize> {
        self.marker_start()..self.insertion_offset()
    }
}

/// Every embed in `text`, in document order
///
/// The iterator borrows the tree and text; call again to restart.
pub fn locate_tags<'a>(tree: &'a SyntaxTree, text: &'a str) -> impl Iterator<Item = TagMatch> + 'a {
    tree.nodes_of_kind(NodeKind::InternalLink).filter_map(move |node| {
        let marker = text.get(node.from.checked_sub(EMBED_MARKER.len())?..node.from)?;
        if marker != EMBED_MARKER {
            return None;
        }
        Some(TagMatch {
            identity: text.get(node.from..node.to)?.to_string(),
            span: node.span(),
        })
    })
}
