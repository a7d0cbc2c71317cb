use serde::{Deserialize, Serialize};

use super::SymbolIndex;

/// What the driver hands to the tree builder on every reduce: the rule's
/// left-hand side and how many right-hand-side entries it consumes.
///
/// This is all a generic tree-building action needs, so one action serves every
/// rule of the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Production {
    lhs: SymbolIndex,
    lhs_name: String,
    length: usize,
}

impl Production {
    pub fn new(lhs: SymbolIndex, lhs_name: impl Into<String>, length: usize) -> Self {
        Self {
            lhs,
            lhs_name: lhs_name.into(),
            length,
        }
    }

    pub fn lhs(&self) -> SymbolIndex {
        self.lhs
    }

    pub fn lhs_name(&self) -> &str {
        &self.lhs_name
    }

    /// Number of right-hand-side symbols.
    pub fn len(&self) -> usize {
        self.length
    }

    /// An epsilon rule has an empty right-hand side.
    pub fn is_epsilon(&self) -> bool {
        self.length == 0
    }

    /// Same as [`is_epsilon`](Self::is_epsilon).
    pub fn is_empty(&self) -> bool {
        self.is_epsilon()
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{} /{}", self.lhs_name, self.lhs, self.length)
    }
}
