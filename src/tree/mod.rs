//! Parse-tree arena and navigation.
//!
//! Nodes live in a [`ParseTree`] arena and refer to each other by [`NodeIndex`].
//! Children are owned by exactly one parent; the parent link is a plain index used
//! for upward traversal. Attaching a node that already has a parent fails, which
//! keeps the tree a strict arborescence.
//!
//! Navigation goes through [`NodeRef`], a cheap `Copy` handle. Accessors that only
//! make sense for one kind of node (`child_at`, `lexeme`, `line`) return
//! [`TreeError::UnsupportedOperation`] on the other kind. Matching on
//! [`NodeRef::kind`] gives statically typed access instead.

mod describe;
mod node;
mod render;
mod session;

pub use describe::{DescribedNode, TreeDescription};
pub use node::{
    InteriorNode, LineNumber, NodeId, NodeIndex, NodeKind, ParseNode, TokenNode, EPSILON_LINE,
};
pub use render::{render_dot, render_text};
pub use session::{IdGenerator, ParseSession};

use crate::errors::{NodeKindName, TreeError};
use crate::grammar::SymbolIndex;

// ============================================================================
// ARENA
// ============================================================================

/// A concrete parse tree stored as an arena of [`ParseNode`]s.
#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
    root: Option<NodeIndex>,
}

impl ParseTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached leaf.
    pub fn push_token(
        &mut self,
        session: &ParseSession,
        symbol: SymbolIndex,
        name: impl Into<String>,
        lexeme: impl Into<String>,
        line: LineNumber,
    ) -> NodeIndex {
        self.push(ParseNode {
            id: session.next_id(),
            symbol,
            name: name.into(),
            file_name: session.shared_file_name(),
            parent: None,
            kind: NodeKind::Token(TokenNode {
                lexeme: lexeme.into(),
                line,
            }),
        })
    }

    /// Adds an interior node owning `children`, in the given order.
    ///
    /// Every child must exist, be detached, and appear once. Nothing is modified
    /// when a child fails these checks.
    pub fn push_interior(
        &mut self,
        session: &ParseSession,
        symbol: SymbolIndex,
        name: impl Into<String>,
        children: Vec<NodeIndex>,
    ) -> Result<NodeIndex, TreeError> {
        for (position, &child) in children.iter().enumerate() {
            let node = self.slot(child)?;
            if node.parent.is_some() || children[..position].contains(&child) {
                return Err(TreeError::AlreadyAttached { child: node.id });
            }
        }

        let parent = self.push(ParseNode {
            id: session.next_id(),
            symbol,
            name: name.into(),
            file_name: session.shared_file_name(),
            parent: None,
            kind: NodeKind::Interior(InteriorNode {
                children: Vec::new(),
            }),
        });
        for &child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        if let NodeKind::Interior(interior) = &mut self.nodes[parent.0].kind {
            interior.children = children;
        }
        Ok(parent)
    }

    /// Marks a detached node as the root.
    pub fn set_root(&mut self, index: NodeIndex) -> Result<(), TreeError> {
        let node = self.slot(index)?;
        if node.parent.is_some() {
            return Err(TreeError::AlreadyAttached { child: node.id });
        }
        self.root = Some(index);
        Ok(())
    }

    fn push(&mut self, node: ParseNode) -> NodeIndex {
        self.nodes.push(node);
        NodeIndex(self.nodes.len() - 1)
    }

    fn slot(&self, index: NodeIndex) -> Result<&ParseNode, TreeError> {
        self.nodes
            .get(index.0)
            .ok_or(TreeError::DanglingIndex { index: index.0 })
    }

    fn at(&self, index: NodeIndex) -> NodeRef<'_> {
        NodeRef { tree: self, index }
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|index| self.at(index))
    }

    pub fn node(&self, index: NodeIndex) -> Result<NodeRef<'_>, TreeError> {
        self.slot(index).map(|_| self.at(index))
    }

    pub fn find_by_id(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .map(|position| self.at(NodeIndex(position)))
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_token()).count()
    }

    pub fn interior_count(&self) -> usize {
        self.len() - self.token_count()
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.nodes.len()).map(move |position| self.at(NodeIndex(position)))
    }

    /// Nodes reachable from the root, parents before children, left to right.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }
}

// ============================================================================
// NODE HANDLE
// ============================================================================

/// Borrowed view of one node together with its tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a ParseTree,
    index: NodeIndex,
}

impl<'a> NodeRef<'a> {
    fn data(&self) -> &'a ParseNode {
        &self.tree.nodes[self.index.0]
    }

    fn kind_name(&self) -> NodeKindName {
        if self.is_token() {
            NodeKindName::Token
        } else {
            NodeKindName::Interior
        }
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn node(&self) -> &'a ParseNode {
        self.data()
    }

    pub fn id(&self) -> NodeId {
        self.data().id
    }

    pub fn symbol(&self) -> SymbolIndex {
        self.data().symbol
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    pub fn file_name(&self) -> &'a str {
        &self.data().file_name
    }

    pub fn kind(&self) -> &'a NodeKind {
        &self.data().kind
    }

    pub fn is_token(&self) -> bool {
        self.data().is_token()
    }

    /// `None` for the root, and for nodes not yet attached.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.data().parent.map(|index| self.tree.at(index))
    }

    /// Zero for tokens.
    pub fn num_children(&self) -> usize {
        match self.kind() {
            NodeKind::Interior(interior) => interior.children.len(),
            NodeKind::Token(_) => 0,
        }
    }

    /// Children left to right. Tokens have none.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        let children: &'a [NodeIndex] = match self.kind() {
            NodeKind::Interior(interior) => &interior.children,
            NodeKind::Token(_) => &[],
        };
        children.iter().map(move |&index| tree.at(index))
    }

    pub fn child_at(&self, index: usize) -> Result<NodeRef<'a>, TreeError> {
        match self.kind() {
            NodeKind::Interior(interior) => interior
                .children
                .get(index)
                .map(|&child| self.tree.at(child))
                .ok_or_else(|| TreeError::ChildOutOfRange {
                    index,
                    len: interior.children.len(),
                    name: self.name().to_string(),
                }),
            NodeKind::Token(_) => Err(TreeError::unsupported(
                "child_at",
                self.kind_name(),
                self.name(),
            )),
        }
    }

    pub fn lexeme(&self) -> Result<&'a str, TreeError> {
        match self.kind() {
            NodeKind::Token(token) => Ok(&token.lexeme),
            NodeKind::Interior(_) => Err(TreeError::unsupported(
                "lexeme",
                self.kind_name(),
                self.name(),
            )),
        }
    }

    pub fn line(&self) -> Result<LineNumber, TreeError> {
        match self.kind() {
            NodeKind::Token(token) => Ok(token.line),
            NodeKind::Interior(_) => Err(TreeError::unsupported(
                "line",
                self.kind_name(),
                self.name(),
            )),
        }
    }

    /// Line of the leftmost token reachable through first children.
    ///
    /// Returns [`EPSILON_LINE`] when the walk reaches an interior node without
    /// children.
    pub fn leftmost_line(&self) -> LineNumber {
        let mut node = *self;
        loop {
            match node.kind() {
                NodeKind::Token(token) => return token.line,
                NodeKind::Interior(interior) => match interior.children.first() {
                    Some(&first) => node = self.tree.at(first),
                    None => return EPSILON_LINE,
                },
            }
        }
    }

    /// `"<file>:<line>"`, the form diagnostics print verbatim.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file_name(), self.leftmost_line())
    }

    /// This node and its descendants in pre-order.
    pub fn preorder(&self) -> Preorder<'a> {
        Preorder {
            tree: self.tree,
            stack: vec![self.index],
        }
    }
}

/// Pre-order traversal, see [`ParseTree::preorder`].
pub struct Preorder<'a> {
    tree: &'a ParseTree,
    stack: Vec<NodeIndex>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        if let NodeKind::Interior(interior) = &self.tree.nodes[index.0].kind {
            self.stack.extend(interior.children.iter().rev().copied());
        }
        Some(self.tree.at(index))
    }
}
