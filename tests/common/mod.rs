#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lrtree::{Grammar, SymbolIndex, SymbolTable, Token};

pub const NUM: SymbolIndex = 0;
pub const PLUS: SymbolIndex = 1;
pub const E: SymbolIndex = 2;

/// E -> E '+' E (rule 0) | NUM (rule 1)
pub fn expression_grammar() -> Grammar {
    let mut symbols = SymbolTable::new();
    symbols.terminal(NUM, "NUM").unwrap();
    symbols.terminal(PLUS, "+").unwrap();
    symbols.nonterminal(E, "E").unwrap();
    let mut grammar = Grammar::new(symbols);
    grammar.add_rule("E", 3).unwrap();
    grammar.add_rule("E", 1).unwrap();
    grammar
}

pub fn num(lexeme: &str, line: i32) -> Token {
    Token::new(NUM, "NUM", lexeme, line)
}

pub fn plus(line: i32) -> Token {
    Token::new(PLUS, "+", "+", line)
}

pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}
