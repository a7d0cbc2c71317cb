//! Symbol numbering shared by terminals and nonterminals.
//!
//! A parser backend publishes one index per grammar symbol from a single numbering
//! space, so a node's `symbol` field identifies its grammar symbol without a
//! terminal/nonterminal split. The table rejects any registration that would
//! break that property.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::errors::TreeError;

/// Index of a grammar symbol in the combined terminal + nonterminal space.
pub type SymbolIndex = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Terminal => "terminal",
            SymbolKind::Nonterminal => "nonterminal",
        }
    }
}

/// A grammar symbol: index, printable name and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub index: SymbolIndex,
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn terminal(index: SymbolIndex, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            kind: SymbolKind::Terminal,
        }
    }

    pub fn nonterminal(index: SymbolIndex, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            kind: SymbolKind::Nonterminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == SymbolKind::Terminal
    }
}

/// All symbols of one grammar, keyed by index and by name.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    by_index: BTreeMap<SymbolIndex, Symbol>,
    by_name: HashMap<String, SymbolIndex>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a symbol. Fails if either its index or its name is taken.
    pub fn register(&mut self, symbol: Symbol) -> Result<SymbolIndex, TreeError> {
        if let Some(existing) = self.by_index.get(&symbol.index) {
            return Err(TreeError::DuplicateIndex {
                index: symbol.index,
                existing: existing.name.clone(),
            });
        }
        if let Some(&existing) = self.by_name.get(&symbol.name) {
            return Err(TreeError::DuplicateName {
                name: symbol.name,
                existing,
            });
        }

        let index = symbol.index;
        self.by_name.insert(symbol.name.clone(), index);
        self.by_index.insert(index, symbol);
        Ok(index)
    }

    pub fn terminal(
        &mut self,
        index: SymbolIndex,
        name: impl Into<String>,
    ) -> Result<SymbolIndex, TreeError> {
        self.register(Symbol::terminal(index, name))
    }

    pub fn nonterminal(
        &mut self,
        index: SymbolIndex,
        name: impl Into<String>,
    ) -> Result<SymbolIndex, TreeError> {
        self.register(Symbol::nonterminal(index, name))
    }

    pub fn get(&self, index: SymbolIndex) -> Option<&Symbol> {
        self.by_index.get(&index)
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.by_name.get(name).and_then(|index| self.by_index.get(index))
    }

    /// Like [`lookup`](Self::lookup), but requires a symbol of the given kind.
    pub fn expect(&self, name: &str, kind: SymbolKind) -> Result<&Symbol, TreeError> {
        let symbol = self.lookup(name).ok_or_else(|| TreeError::UnknownSymbol {
            name: name.to_string(),
        })?;
        if symbol.kind != kind {
            return Err(TreeError::WrongSymbolKind {
                name: name.to_string(),
                expected: kind.as_str(),
            });
        }
        Ok(symbol)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Symbols in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.by_index.values()
    }

    pub fn terminals(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|s| s.is_terminal())
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = &Symbol> {
        self.iter().filter(|s| !s.is_terminal())
    }

    /// True when the registered indices are exactly `0..len`.
    pub fn is_dense(&self) -> bool {
        self.by_index
            .keys()
            .enumerate()
            .all(|(position, &index)| index as usize == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminals_and_nonterminals_share_one_space() {
        let mut table = SymbolTable::new();
        table.terminal(0, "NUM").unwrap();
        let error = table.nonterminal(0, "expr").unwrap_err();
        assert!(matches!(
            error,
            TreeError::DuplicateIndex { index: 0, ref existing } if existing == "NUM"
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut table = SymbolTable::new();
        table.terminal(0, "NUM").unwrap();
        assert!(matches!(
            table.nonterminal(1, "NUM"),
            Err(TreeError::DuplicateName { existing: 0, .. })
        ));
    }

    #[test]
    fn lookup_by_name_and_kind() {
        let mut table = SymbolTable::new();
        table.terminal(0, "NUM").unwrap();
        table.nonterminal(1, "expr").unwrap();

        assert_eq!(table.lookup("expr").map(|s| s.index), Some(1));
        assert!(table.expect("NUM", SymbolKind::Terminal).is_ok());
        assert!(matches!(
            table.expect("NUM", SymbolKind::Nonterminal),
            Err(TreeError::WrongSymbolKind { .. })
        ));
        assert!(matches!(
            table.expect("stmt", SymbolKind::Nonterminal),
            Err(TreeError::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn density_check() {
        let mut table = SymbolTable::new();
        table.terminal(0, "a").unwrap();
        table.nonterminal(1, "B").unwrap();
        assert!(table.is_dense());

        table.terminal(5, "c").unwrap();
        assert!(!table.is_dense());
        assert_eq!(table.terminals().count(), 2);
        assert_eq!(table.nonterminals().count(), 1);
    }
}
