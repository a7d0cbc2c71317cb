//! Trace scripts: a recorded grammar plus shift/reduce/accept decisions.
//!
//! Scripts come in three forms: the line-oriented text form (see
//! `grammar.pest`), JSON and YAML. All three load into the same [`Script`] model,
//! which replays against a [`TreeBuilder`] to produce a [`ParseTree`].

mod parser;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::{Token, TreeBuilder};
use crate::driver::{replay, Event};
use crate::errors::TreeError;
use crate::grammar::{Grammar, Symbol, SymbolKind, SymbolTable};
use crate::tree::{LineNumber, ParseSession, ParseTree};

pub use parser::parse_text;

/// File name used when neither the script nor the caller names one.
pub const UNNAMED_FILE: &str = "<unknown>";

/// Extensions [`Script::load`] understands.
pub const SCRIPT_EXTENSIONS: &[&str] = &["trace", "json", "yaml", "yml"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDecl {
    pub lhs: String,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ScriptEvent {
    Shift {
        symbol: String,
        lexeme: String,
        line: LineNumber,
    },
    Reduce {
        rule: usize,
    },
    Accept,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub rules: Vec<RuleDecl>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, TreeError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads a script, picking the form from the file extension.
    pub fn load(path: &Path) -> Result<Self, TreeError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), format = %extension, "loading trace script");

        match extension.as_str() {
            "trace" => parse_text(&path.display().to_string(), &text),
            "json" => Self::from_json(&text),
            "yaml" | "yml" => Self::from_yaml(&text),
            _ => Err(TreeError::UnsupportedFormat { extension }),
        }
    }

    /// The file name recorded in the script, if any.
    pub fn file_name(&self) -> &str {
        self.file.as_deref().unwrap_or(UNNAMED_FILE)
    }

    /// Symbol table and rules declared by the script.
    pub fn grammar(&self) -> Result<Grammar, TreeError> {
        let mut symbols = SymbolTable::new();
        for symbol in &self.symbols {
            symbols.register(symbol.clone())?;
        }
        let mut grammar = Grammar::new(symbols);
        for rule in &self.rules {
            grammar.add_rule(&rule.lhs, rule.length)?;
        }
        Ok(grammar)
    }

    /// Recorded events with token symbols resolved against `grammar`.
    pub fn events(&self, grammar: &Grammar) -> Result<Vec<Event>, TreeError> {
        self.events
            .iter()
            .map(|event| match event {
                ScriptEvent::Shift {
                    symbol,
                    lexeme,
                    line,
                } => {
                    let terminal = grammar.symbols().expect(symbol, SymbolKind::Terminal)?;
                    Ok(Event::Shift(Token::new(
                        terminal.index,
                        terminal.name.as_str(),
                        lexeme.as_str(),
                        *line,
                    )))
                }
                ScriptEvent::Reduce { rule } => Ok(Event::Reduce(*rule)),
                ScriptEvent::Accept => Ok(Event::Accept),
            })
            .collect()
    }

    /// Replays the script into a tree built under `session`.
    pub fn run(&self, session: ParseSession) -> Result<ParseTree, TreeError> {
        let grammar = self.grammar()?;
        let events = self.events(&grammar)?;
        let mut builder = TreeBuilder::new(session);
        replay(&grammar, events, &mut builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "file": "j.php",
        "symbols": [
            {"index": 0, "name": "NUM", "kind": "terminal"},
            {"index": 1, "name": "E", "kind": "nonterminal"}
        ],
        "rules": [{"lhs": "E", "length": 1}],
        "events": [
            {"event": "shift", "symbol": "NUM", "lexeme": "7", "line": 3},
            {"event": "reduce", "rule": 0},
            {"event": "accept"}
        ]
    }"#;

    const YAML: &str = r#"
file: y.php
symbols:
  - { index: 0, name: NUM, kind: terminal }
  - { index: 1, name: E, kind: nonterminal }
rules:
  - { lhs: E, length: 1 }
events:
  - { event: shift, symbol: NUM, lexeme: "7", line: 3 }
  - { event: reduce, rule: 0 }
  - { event: accept }
"#;

    #[test]
    fn json_and_yaml_describe_the_same_script() {
        let json = Script::from_json(JSON).unwrap();
        let yaml = Script::from_yaml(YAML).unwrap();
        assert_eq!(json.events, yaml.events);
        assert_eq!(json.symbols, yaml.symbols);
        assert_eq!(json.rules, yaml.rules);
    }

    #[test]
    fn run_replays_into_a_tree() {
        let script = Script::from_json(JSON).unwrap();
        let tree = script.run(ParseSession::new(script.file_name())).unwrap();
        let root = tree.root().unwrap();
        assert_eq!(root.name(), "E");
        assert_eq!(root.location(), "j.php:3");
    }

    #[test]
    fn shifting_a_nonterminal_is_rejected() {
        let mut script = Script::from_json(JSON).unwrap();
        script.events[0] = ScriptEvent::Shift {
            symbol: "E".into(),
            lexeme: "x".into(),
            line: 1,
        };
        assert!(matches!(
            script.run(ParseSession::new("x.php")),
            Err(TreeError::WrongSymbolKind { .. })
        ));
    }

    #[test]
    fn colliding_symbol_numbers_are_rejected() {
        let mut script = Script::from_json(JSON).unwrap();
        script.symbols[1].index = 0;
        assert!(matches!(
            script.grammar(),
            Err(TreeError::DuplicateIndex { .. })
        ));
    }

    #[test]
    fn unnamed_scripts_fall_back() {
        assert_eq!(Script::default().file_name(), UNNAMED_FILE);
    }
}
