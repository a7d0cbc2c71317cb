use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::grammar::SymbolIndex;

/// Source line numbers as reported by the lexer.
pub type LineNumber = i32;

/// Line reported for a node produced by an epsilon rule, which covers no token.
pub const EPSILON_LINE: LineNumber = -2;

/// Process-unique node identifier, increasing in creation order.
///
/// Identifiers exist for serialization and visualization only. Two trees with
/// different identifiers can still be structurally identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Leaf payload: the literal text and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenNode {
    pub(crate) lexeme: String,
    pub(crate) line: LineNumber,
}

impl TokenNode {
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn line(&self) -> LineNumber {
        self.line
    }
}

/// Interior payload: children in right-hand-side order.
///
/// The list is fixed when the node is created.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteriorNode {
    pub(crate) children: Vec<NodeIndex>,
}

impl InteriorNode {
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn is_epsilon(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Token(TokenNode),
    Interior(InteriorNode),
}

/// One arena slot: the fields every node has plus its kind-specific payload.
#[derive(Debug, Clone)]
pub struct ParseNode {
    pub(crate) id: NodeId,
    pub(crate) symbol: SymbolIndex,
    pub(crate) name: String,
    pub(crate) file_name: Arc<str>,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) kind: NodeKind,
}

impl ParseNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn symbol(&self) -> SymbolIndex {
        self.symbol
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_token(&self) -> bool {
        matches!(self.kind, NodeKind::Token(_))
    }
}
