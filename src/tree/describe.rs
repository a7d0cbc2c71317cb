//! Identifier-free structural description of a tree.
//!
//! A description is the tree's nodes in pre-order, each interior node recording
//! how many children follow it. Keeping it flat means the JSON never nests deeper
//! than one level and no operation here recurses, however deep the tree is.
//! Two trees are structurally identical when their descriptions are equal.

use serde::{Deserialize, Serialize};

use super::{LineNumber, NodeIndex, NodeKind, NodeRef, ParseSession, ParseTree};
use crate::errors::TreeError;
use crate::grammar::SymbolIndex;

/// One node of a [`TreeDescription`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DescribedNode {
    Token {
        symbol: SymbolIndex,
        name: String,
        lexeme: String,
        line: LineNumber,
    },
    Interior {
        symbol: SymbolIndex,
        name: String,
        children: usize,
    },
}

impl DescribedNode {
    pub fn symbol(&self) -> SymbolIndex {
        match self {
            DescribedNode::Token { symbol, .. } | DescribedNode::Interior { symbol, .. } => *symbol,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DescribedNode::Token { name, .. } | DescribedNode::Interior { name, .. } => name,
        }
    }

    fn of(node: NodeRef<'_>) -> Self {
        match node.kind() {
            NodeKind::Token(token) => DescribedNode::Token {
                symbol: node.symbol(),
                name: node.name().to_string(),
                lexeme: token.lexeme.clone(),
                line: token.line,
            },
            NodeKind::Interior(interior) => DescribedNode::Interior {
                symbol: node.symbol(),
                name: node.name().to_string(),
                children: interior.children.len(),
            },
        }
    }
}

/// Nodes of a tree in pre-order. Serializes as a flat JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeDescription {
    nodes: Vec<DescribedNode>,
}

/// An interior node waiting for its children during [`TreeDescription::rebuild`].
struct Pending<'d> {
    symbol: SymbolIndex,
    name: &'d str,
    expected: usize,
    children: Vec<NodeIndex>,
}

impl TreeDescription {
    pub fn new(nodes: Vec<DescribedNode>) -> Self {
        Self { nodes }
    }

    /// The root entry, `None` for an empty description.
    pub fn root(&self) -> Option<&DescribedNode> {
        self.nodes.first()
    }

    pub fn nodes(&self) -> &[DescribedNode] {
        &self.nodes
    }

    /// Number of nodes described.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Builds a fresh tree from this description. Identifiers come from `session`,
    /// assigned children-first, the same order a bottom-up parse creates them in.
    pub fn rebuild(&self, session: &ParseSession) -> Result<ParseTree, TreeError> {
        let mut tree = ParseTree::new();
        let mut pending: Vec<Pending<'_>> = Vec::new();
        let mut root = None;

        for (position, node) in self.nodes.iter().enumerate() {
            if root.is_some() {
                return Err(malformed(format!(
                    "{} entries follow the complete tree",
                    self.nodes.len() - position
                )));
            }

            let mut finished = match node {
                DescribedNode::Token {
                    symbol,
                    name,
                    lexeme,
                    line,
                } => tree.push_token(session, *symbol, name.as_str(), lexeme.as_str(), *line),
                DescribedNode::Interior {
                    symbol,
                    name,
                    children: 0,
                } => tree.push_interior(session, *symbol, name.as_str(), Vec::new())?,
                DescribedNode::Interior {
                    symbol,
                    name,
                    children,
                } => {
                    pending.push(Pending {
                        symbol: *symbol,
                        name: name.as_str(),
                        expected: *children,
                        children: Vec::new(),
                    });
                    continue;
                }
            };

            // Hand the finished node to its parent, closing every parent it completes.
            loop {
                let Some(parent) = pending.last_mut() else {
                    root = Some(finished);
                    break;
                };
                parent.children.push(finished);
                if parent.children.len() < parent.expected {
                    break;
                }
                let Some(parent) = pending.pop() else {
                    break;
                };
                finished =
                    tree.push_interior(session, parent.symbol, parent.name, parent.children)?;
            }
        }

        if let Some(open) = pending.last() {
            return Err(malformed(format!(
                "node `{}` expects {} children but the description ends after {}",
                open.name,
                open.expected,
                open.children.len()
            )));
        }
        let root = root.ok_or_else(|| malformed("the description is empty"))?;
        tree.set_root(root)?;
        Ok(tree)
    }

    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(text)?)
    }
}

fn malformed(message: impl Into<String>) -> TreeError {
    TreeError::MalformedDescription {
        message: message.into(),
    }
}

impl<'a> NodeRef<'a> {
    /// Structural description of the subtree rooted here.
    pub fn describe(&self) -> TreeDescription {
        TreeDescription::new(self.preorder().map(DescribedNode::of).collect())
    }

    fn same_shape(&self, other: &NodeRef<'_>) -> bool {
        self.symbol() == other.symbol()
            && self.name() == other.name()
            && match (self.kind(), other.kind()) {
                (NodeKind::Token(a), NodeKind::Token(b)) => a.lexeme == b.lexeme && a.line == b.line,
                (NodeKind::Interior(a), NodeKind::Interior(b)) => {
                    a.children.len() == b.children.len()
                }
                _ => false,
            }
    }
}

impl ParseTree {
    /// Description of the whole tree, `None` before a root is set.
    pub fn describe(&self) -> Option<TreeDescription> {
        self.root().map(|root| root.describe())
    }

    /// Equal shape, symbols, names, lexemes and lines. Identifiers and file names
    /// are ignored.
    pub fn structurally_eq(&self, other: &ParseTree) -> bool {
        let mut left = self.preorder();
        let mut right = other.preorder();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a.same_shape(&b) => {}
                _ => return false,
            }
        }
    }
}
