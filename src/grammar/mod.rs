//! Grammar metadata consumed by the tree builder.
//!
//! The builder never sees grammar rules as such. It sees symbol indices on shift and
//! [`Production`] descriptors on reduce. [`Grammar`] bundles a [`SymbolTable`] with
//! the per-rule descriptors so a driver can turn a rule number into a descriptor.

mod production;
mod symbols;

pub use production::Production;
pub use symbols::{Symbol, SymbolIndex, SymbolKind, SymbolTable};

use crate::errors::TreeError;

/// A symbol table plus the production descriptors, numbered in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    symbols: SymbolTable,
    productions: Vec<Production>,
}

impl Grammar {
    pub fn new(symbols: SymbolTable) -> Self {
        Self {
            symbols,
            productions: Vec::new(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    /// Appends a rule `lhs -> <length symbols>` and returns its rule number.
    ///
    /// The left-hand side must be a registered nonterminal.
    pub fn add_rule(&mut self, lhs: &str, length: usize) -> Result<usize, TreeError> {
        let symbol = self.symbols.expect(lhs, SymbolKind::Nonterminal)?;
        let production = Production::new(symbol.index, symbol.name.clone(), length);
        self.productions.push(production);
        Ok(self.productions.len() - 1)
    }

    pub fn production(&self, rule: usize) -> Result<&Production, TreeError> {
        self.productions
            .get(rule)
            .ok_or(TreeError::UnknownProduction { rule })
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }
}
