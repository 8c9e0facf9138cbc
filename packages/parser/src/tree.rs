//! # Syntax Tree
//!
//! Immutable snapshot of a note's structure. Nodes are stored in an arena
//! and addressed by [`NodeId`]; every node carries its byte span in the
//! source text.
//!
//! ```text
//! Document
//! └── Line*
//!     ├── Text
//!     ├── LinkOpen       "[["
//!     ├── InternalLink   link target
//!     └── LinkClose      "]]"
//! ```

use std::ops::Range;

pub type NodeId = usize;

/// Kind of a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Line,
    Text,
    LinkOpen,
    InternalLink,
    LinkClose,
}

impl NodeKind {
    /// Stable name, as exposed to host stylesheets and extensions
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Line => "line",
            NodeKind::Text => "text",
            NodeKind::LinkOpen => "formatting-link-start",
            NodeKind::InternalLink => "internal-link",
            NodeKind::LinkClose => "formatting-link-end",
        }
    }
}

/// A node with its span `[from, to)` in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub from: usize,
    pub to: usize,
    children: Vec<NodeId>,
}

impl SyntaxNode {
    pub(crate) fn new(kind: NodeKind, from: usize, to: usize) -> Self {
        Self {
            kind,
            from,
            to,
            children: Vec::new(),
        }
    }

    pub fn span(&self) -> Range<usize> {
        self.from..self.to
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed syntax tree. The root is always node `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    pub(crate) fn with_root(len: usize) -> Self {
        Self {
            nodes: vec![SyntaxNode::new(NodeKind::Document, 0, len)],
        }
    }

    pub(crate) fn push(&mut self, parent: NodeId, node: SyntaxNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut SyntaxNode {
        &mut self.nodes[id]
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id)
    }

    /// Length of the source text the tree was built from
    pub fn source_len(&self) -> usize {
        self.root().to
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first walk in document order
    ///
    /// `enter` returns `false` to skip a node's children.
    pub fn iterate<F>(&self, mut enter: F)
    where
        F: FnMut(&SyntaxNode) -> bool,
    {
        let mut stack = vec![0];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if enter(node) {
                stack.extend(node.children.iter().rev());
            }
        }
    }

    /// Lazy preorder iterator over every node
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![0],
        }
    }

    /// All nodes of one kind, in document order
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &SyntaxNode> + '_ {
        self.iter().filter(move |node| node.kind == kind)
    }
}

/// Preorder iterator returned by [`SyntaxTree::iter`]
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
