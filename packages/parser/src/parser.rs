//! Builds a [`SyntaxTree`] from the token stream.
//!
//! Parsing never fails: anything that does not form a well-shaped link is
//! kept as text. A link must open and close on the same line and have a
//! non-empty target.

use crate::tokenizer::{tokenize, Token};
use crate::tree::{NodeId, NodeKind, SyntaxNode, SyntaxTree};
use std::ops::Range;
use tracing::trace;

/// Parse a note into a syntax tree
pub fn parse(source: &str) -> SyntaxTree {
    Parser::new(source).parse()
}

/// Single-pass tree builder
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token, Range<usize>)>,
    tree: SyntaxTree,
    line: NodeId,
    line_start: usize,
    links: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut tree = SyntaxTree::with_root(source.len());
        let line = tree.push(0, SyntaxNode::new(NodeKind::Line, 0, 0));
        Self {
            source,
            tokens: tokenize(source),
            tree,
            line,
            line_start: 0,
            links: 0,
        }
    }

    pub fn parse(mut self) -> SyntaxTree {
        let mut i = 0;
        while i < self.tokens.len() {
            let (token, span) = self.tokens[i].clone();
            match token {
                Token::Newline => {
                    self.close_line(span.start);
                    self.open_line(span.end);
                    i += 1;
                }
                Token::LinkOpen => match self.link_close_index(i) {
                    Some(close) => {
                        self.push_link(i, close);
                        i = close + 1;
                    }
                    None => {
                        self.push_text(span);
                        i += 1;
                    }
                },
                Token::LinkClose | Token::Bracket | Token::Text => {
                    self.push_text(span);
                    i += 1;
                }
            }
        }
        self.close_line(self.source.len());

        trace!(
            len = self.source.len(),
            nodes = self.tree.node_count(),
            links = self.links,
            "Parsed note"
        );
        self.tree
    }

    /// Index of the `]]` closing the `[[` at `open`, if the link is well formed
    fn link_close_index(&self, open: usize) -> Option<usize> {
        let mut has_content = false;
        for (offset, (token, _)) in self.tokens[open + 1..].iter().enumerate() {
            match token {
                Token::LinkClose if has_content => return Some(open + 1 + offset),
                Token::LinkClose | Token::Newline | Token::LinkOpen => return None,
                Token::Text | Token::Bracket => has_content = true,
            }
        }
        None
    }

    fn push_link(&mut self, open: usize, close: usize) {
        let open_span = self.tokens[open].1.clone();
        let close_span = self.tokens[close].1.clone();

        self.tree.push(
            self.line,
            SyntaxNode::new(NodeKind::LinkOpen, open_span.start, open_span.end),
        );
        self.tree.push(
            self.line,
            SyntaxNode::new(NodeKind::InternalLink, open_span.end, close_span.start),
        );
        self.tree.push(
            self.line,
            SyntaxNode::new(NodeKind::LinkClose, close_span.start, close_span.end),
        );
        self.links += 1;
    }

    /// Append text, merging with an adjacent text node on the same line
    fn push_text(&mut self, span: Range<usize>) {
        let last = self.tree.node(self.line).and_then(|line| line.children().last().copied());
        if let Some(last) = last {
            let node = self.tree.node_mut(last);
            if node.kind == NodeKind::Text && node.to == span.start {
                node.to = span.end;
                return;
            }
        }
        self.tree
            .push(self.line, SyntaxNode::new(NodeKind::Text, span.start, span.end));
    }

    fn open_line(&mut self, start: usize) {
        self.line = self.tree.push(0, SyntaxNode::new(NodeKind::Line, start, start));
        self.line_start = start;
    }

    fn close_line(&mut self, end: usize) {
        let line = self.tree.node_mut(self.line);
        line.from = self.line_start;
        line.to = end;
    }
}
