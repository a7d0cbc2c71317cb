//! Generic concrete-syntax-tree construction for table-driven LR parsers.
//!
//! A parsing automaton reports shift, reduce and accept decisions to a
//! [`TreeBuilder`], which assembles a [`ParseTree`] of token leaves and interior
//! nodes without any per-rule code.

pub use crate::builder::{Token, TreeActions, TreeBuilder};
pub use crate::driver::{replay, Action, ActionTable, Event, LrDriver, ParseTable};
pub use crate::errors::{ErrorCategory, TreeError};
pub use crate::grammar::{Grammar, Production, Symbol, SymbolIndex, SymbolKind, SymbolTable};
pub use crate::tree::{
    DescribedNode, IdGenerator, LineNumber, NodeId, NodeKind, NodeRef, ParseSession, ParseTree,
    TreeDescription, EPSILON_LINE,
};

pub mod builder;
pub mod cli;
pub mod driver;
pub mod errors;
pub mod grammar;
pub mod logging;
pub mod script;
pub mod tree;
