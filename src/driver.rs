//! Automata that feed [`TreeActions`].
//!
//! Two drivers are provided:
//!
//! - [`LrDriver`] runs a caller-supplied LR action/goto table over a token stream.
//!   How the table was generated is not its concern.
//! - [`replay`] re-enacts a recorded sequence of shift/reduce/accept decisions.
//!
//! Both resolve rule numbers to [`Production`](crate::grammar::Production)
//! descriptors through a [`Grammar`] and hand nothing else to the callbacks.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::builder::{Token, TreeActions, TreeBuilder};
use crate::errors::TreeError;
use crate::grammar::{Grammar, SymbolIndex};
use crate::tree::{ParseSession, ParseTree};

// ============================================================================
// TABLE-DRIVEN LR AUTOMATON
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Consume the lookahead and enter the given state.
    Shift(usize),
    /// Reduce by the given rule number.
    Reduce(usize),
    Accept,
    Error,
}

/// ACTION/GOTO lookup of an LR automaton. State 0 is the start state.
pub trait ParseTable {
    fn action(&self, state: usize, lookahead: SymbolIndex) -> Action;

    fn goto(&self, state: usize, nonterminal: SymbolIndex) -> Option<usize>;

    /// Symbol index of the end-of-input marker.
    fn end_symbol(&self) -> SymbolIndex;
}

/// A sparse [`ParseTable`] filled in entry by entry.
#[derive(Debug, Clone)]
pub struct ActionTable {
    actions: HashMap<(usize, SymbolIndex), Action>,
    gotos: HashMap<(usize, SymbolIndex), usize>,
    end: SymbolIndex,
}

impl ActionTable {
    pub fn new(end: SymbolIndex) -> Self {
        Self {
            actions: HashMap::new(),
            gotos: HashMap::new(),
            end,
        }
    }

    pub fn set_action(&mut self, state: usize, lookahead: SymbolIndex, action: Action) -> &mut Self {
        self.actions.insert((state, lookahead), action);
        self
    }

    pub fn set_goto(&mut self, state: usize, nonterminal: SymbolIndex, target: usize) -> &mut Self {
        self.gotos.insert((state, nonterminal), target);
        self
    }
}

impl ParseTable for ActionTable {
    fn action(&self, state: usize, lookahead: SymbolIndex) -> Action {
        self.actions
            .get(&(state, lookahead))
            .copied()
            .unwrap_or(Action::Error)
    }

    fn goto(&self, state: usize, nonterminal: SymbolIndex) -> Option<usize> {
        self.gotos.get(&(state, nonterminal)).copied()
    }

    fn end_symbol(&self) -> SymbolIndex {
        self.end
    }
}

/// Runs an LR table over a token stream and reports every decision.
pub struct LrDriver<'g, T> {
    grammar: &'g Grammar,
    table: T,
}

impl<'g, T: ParseTable> LrDriver<'g, T> {
    pub fn new(grammar: &'g Grammar, table: T) -> Self {
        Self { grammar, table }
    }

    /// Parses `tokens` into a tree owned by the caller.
    pub fn parse_tree(
        &self,
        session: ParseSession,
        tokens: impl IntoIterator<Item = Token>,
    ) -> Result<ParseTree, TreeError> {
        let file_name = session.file_name().to_string();
        let mut builder = TreeBuilder::new(session);
        self.drive(&file_name, tokens, &mut builder)
    }

    /// Parses `tokens`, invoking `actions` for every shift, reduce and the final
    /// accept. `file_name` is used for syntax-error locations.
    pub fn drive<A: TreeActions>(
        &self,
        file_name: &str,
        tokens: impl IntoIterator<Item = Token>,
        actions: &mut A,
    ) -> Result<A::Output, TreeError> {
        let mut tokens = tokens.into_iter();
        let mut lookahead = tokens.next();
        let mut states = vec![0usize];

        loop {
            let state = states.last().copied().unwrap_or_default();
            let symbol = lookahead
                .as_ref()
                .map_or(self.table.end_symbol(), |token| token.symbol);

            match self.table.action(state, symbol) {
                Action::Shift(next) => {
                    let Some(token) = lookahead.take() else {
                        return Err(self.fail(actions, unexpected(file_name, None)));
                    };
                    trace!(state, next, symbol, "driver shift");
                    actions.on_shift(token)?;
                    states.push(next);
                    lookahead = tokens.next();
                }
                Action::Reduce(rule) => {
                    let production = self.grammar.production(rule)?;
                    // The bottom state has no matching results-stack entry.
                    let available = states.len() - 1;
                    if production.len() > available {
                        return Err(TreeError::StackUnderflow {
                            lhs: production.lhs_name().to_string(),
                            needed: production.len(),
                            available,
                        });
                    }
                    actions.on_reduce(production)?;
                    states.truncate(states.len() - production.len());

                    let top = states.last().copied().unwrap_or_default();
                    let next = self.table.goto(top, production.lhs()).ok_or(
                        TreeError::MissingGoto {
                            state: top,
                            symbol: production.lhs(),
                        },
                    )?;
                    trace!(rule, from = top, next, "driver goto");
                    states.push(next);
                }
                Action::Accept => {
                    debug!(file = file_name, "driver accept");
                    return actions.on_accept();
                }
                Action::Error => {
                    return Err(self.fail(actions, unexpected(file_name, lookahead.as_ref())));
                }
            }
        }
    }

    fn fail<A: TreeActions>(&self, actions: &mut A, error: TreeError) -> TreeError {
        debug!(%error, "driver stopped on syntax error");
        actions.on_error(&error);
        error
    }
}

fn unexpected(file_name: &str, token: Option<&Token>) -> TreeError {
    match token {
        Some(token) => TreeError::Syntax {
            location: format!("{}:{}", file_name, token.line),
            found: token.lexeme.clone(),
        },
        None => TreeError::UnexpectedEof {
            file: file_name.to_string(),
        },
    }
}

// ============================================================================
// RECORDED DECISIONS
// ============================================================================

/// One recorded automaton decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Shift(Token),
    /// Reduce by rule number.
    Reduce(usize),
    Accept,
}

/// Replays recorded decisions against `actions`.
///
/// Stops at the first `Accept`; events after it are ignored with a warning.
pub fn replay<A: TreeActions>(
    grammar: &Grammar,
    events: impl IntoIterator<Item = Event>,
    actions: &mut A,
) -> Result<A::Output, TreeError> {
    let mut events = events.into_iter();
    while let Some(event) = events.next() {
        match event {
            Event::Shift(token) => actions.on_shift(token)?,
            Event::Reduce(rule) => actions.on_reduce(grammar.production(rule)?)?,
            Event::Accept => {
                let output = actions.on_accept()?;
                let trailing = events.by_ref().count();
                if trailing > 0 {
                    warn!(trailing, "ignoring events recorded after accept");
                }
                return Ok(output);
            }
        }
    }
    Err(TreeError::MissingAccept)
}
