//! Generic tree construction from shift/reduce events.
//!
//! A parsing automaton reports its decisions through [`TreeActions`]. The
//! [`TreeBuilder`] implementation keeps a results stack parallel to the automaton's
//! state stack: a shift pushes a leaf, a reduce pops as many entries as the rule's
//! right-hand side is long and pushes one interior node over them. On accept the
//! single remaining entry becomes the root.
//!
//! No per-rule code is involved. The [`Production`] descriptor (left-hand side
//! index, name and length) is all the builder needs.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::errors::TreeError;
use crate::grammar::{Production, SymbolIndex};
use crate::tree::{LineNumber, NodeIndex, ParseSession, ParseTree};

/// A token as delivered by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: SymbolIndex,
    pub name: String,
    pub lexeme: String,
    pub line: LineNumber,
}

impl Token {
    pub fn new(
        symbol: SymbolIndex,
        name: impl Into<String>,
        lexeme: impl Into<String>,
        line: LineNumber,
    ) -> Self {
        Self {
            symbol,
            name: name.into(),
            lexeme: lexeme.into(),
            line,
        }
    }
}

/// Callbacks a parsing automaton invokes while it runs.
pub trait TreeActions {
    type Output;

    /// One token was consumed.
    fn on_shift(&mut self, token: Token) -> Result<(), TreeError>;

    /// A rule was recognised.
    fn on_reduce(&mut self, production: &Production) -> Result<(), TreeError>;

    /// The input was accepted.
    fn on_accept(&mut self) -> Result<Self::Output, TreeError>;

    /// The automaton hit a syntax error it cannot recover from. Recovery is the
    /// automaton's business; implementations only observe it.
    fn on_error(&mut self, _error: &TreeError) {}
}

/// Builds a [`ParseTree`] from automaton events.
#[derive(Debug)]
pub struct TreeBuilder {
    session: ParseSession,
    tree: ParseTree,
    stack: Vec<NodeIndex>,
    finished: bool,
}

impl TreeBuilder {
    pub fn new(session: ParseSession) -> Self {
        Self {
            session,
            tree: ParseTree::new(),
            stack: Vec::new(),
            finished: false,
        }
    }

    pub fn session(&self) -> &ParseSession {
        &self.session
    }

    /// Current number of entries on the results stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn ensure_open(&self, event: &'static str) -> Result<(), TreeError> {
        if self.finished {
            error!(event, "tree builder used after accept");
            return Err(TreeError::BuilderFinished { event });
        }
        Ok(())
    }
}

impl TreeActions for TreeBuilder {
    type Output = ParseTree;

    fn on_shift(&mut self, token: Token) -> Result<(), TreeError> {
        self.ensure_open("shift")?;
        trace!(symbol = token.symbol, name = %token.name, line = token.line, "shift");
        let leaf = self.tree.push_token(
            &self.session,
            token.symbol,
            token.name,
            token.lexeme,
            token.line,
        );
        self.stack.push(leaf);
        Ok(())
    }

    fn on_reduce(&mut self, production: &Production) -> Result<(), TreeError> {
        self.ensure_open("reduce")?;
        let needed = production.len();
        let available = self.stack.len();
        if needed > available {
            error!(
                lhs = production.lhs_name(),
                needed, available, "results stack underflow on reduce"
            );
            return Err(TreeError::StackUnderflow {
                lhs: production.lhs_name().to_string(),
                needed,
                available,
            });
        }

        trace!(lhs = production.lhs(), name = production.lhs_name(), length = needed, "reduce");
        let children = self.stack.split_off(available - needed);
        let node = self.tree.push_interior(
            &self.session,
            production.lhs(),
            production.lhs_name(),
            children,
        )?;
        self.stack.push(node);
        Ok(())
    }

    fn on_accept(&mut self) -> Result<ParseTree, TreeError> {
        self.ensure_open("accept")?;
        let &[root] = self.stack.as_slice() else {
            error!(count = self.stack.len(), "results stack does not hold exactly one entry on accept");
            return Err(TreeError::AcceptCount {
                count: self.stack.len(),
            });
        };

        self.tree.set_root(root)?;
        self.stack.clear();
        self.finished = true;
        let tree = std::mem::take(&mut self.tree);
        debug!(
            file = self.session.file_name(),
            nodes = tree.len(),
            "parse tree complete"
        );
        Ok(tree)
    }

    fn on_error(&mut self, failure: &TreeError) {
        debug!(%failure, depth = self.stack.len(), "syntax error, partial tree abandoned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;

    fn builder() -> TreeBuilder {
        TreeBuilder::new(ParseSession::new("unit.php"))
    }

    #[test]
    fn reduce_pops_in_left_to_right_order() {
        let mut builder = builder();
        builder.on_shift(Token::new(0, "ID", "a", 1)).unwrap();
        builder.on_shift(Token::new(0, "ID", "b", 1)).unwrap();
        builder.on_shift(Token::new(0, "ID", "c", 2)).unwrap();
        builder.on_reduce(&Production::new(9, "list", 2)).unwrap();
        assert_eq!(builder.depth(), 2);

        builder.on_reduce(&Production::new(10, "pair", 2)).unwrap();
        let tree = builder.on_accept().unwrap();

        let root = tree.root().unwrap();
        assert_eq!(root.name(), "pair");
        assert_eq!(root.child_at(0).unwrap().lexeme().unwrap(), "a");
        let list = root.child_at(1).unwrap();
        assert_eq!(list.name(), "list");
        let lexemes: Vec<_> = list.children().map(|c| c.lexeme().unwrap()).collect();
        assert_eq!(lexemes, vec!["b", "c"]);
    }

    #[test]
    fn epsilon_reduce_pushes_childless_node() {
        let mut builder = builder();
        builder.on_reduce(&Production::new(3, "empty", 0)).unwrap();
        let tree = builder.on_accept().unwrap();
        let root = tree.root().unwrap();
        assert_eq!(root.num_children(), 0);
        assert!(!root.is_token());
    }

    #[test]
    fn underflow_is_an_internal_error() {
        let mut builder = builder();
        builder.on_shift(Token::new(0, "ID", "a", 1)).unwrap();
        let error = builder.on_reduce(&Production::new(5, "E", 3)).unwrap_err();

        assert!(matches!(
            error,
            TreeError::StackUnderflow { needed: 3, available: 1, .. }
        ));
        assert_eq!(error.category(), ErrorCategory::Internal);
        // Nothing was popped.
        assert_eq!(builder.depth(), 1);
    }

    #[test]
    fn accept_requires_exactly_one_entry() {
        let mut builder = builder();
        assert!(matches!(
            builder.on_accept(),
            Err(TreeError::AcceptCount { count: 0 })
        ));

        builder.on_shift(Token::new(0, "ID", "a", 1)).unwrap();
        builder.on_shift(Token::new(0, "ID", "b", 1)).unwrap();
        assert!(matches!(
            builder.on_accept(),
            Err(TreeError::AcceptCount { count: 2 })
        ));
    }

    #[test]
    fn events_after_accept_are_rejected() {
        let mut builder = builder();
        builder.on_shift(Token::new(0, "ID", "a", 1)).unwrap();
        builder.on_accept().unwrap();
        assert!(matches!(
            builder.on_shift(Token::new(0, "ID", "b", 1)),
            Err(TreeError::BuilderFinished { event: "shift" })
        ));
    }

    #[test]
    fn leaves_take_the_session_file_name() {
        let mut builder = builder();
        builder.on_shift(Token::new(0, "ID", "a", 12)).unwrap();
        let tree = builder.on_accept().unwrap();
        let root = tree.root().unwrap();
        assert_eq!(root.file_name(), "unit.php");
        assert_eq!(root.location(), "unit.php:12");
    }
}
