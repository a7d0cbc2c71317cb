//! Text form of trace scripts.

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use super::{RuleDecl, Script, ScriptEvent};
use crate::errors::{script_error, TreeError};
use crate::grammar::Symbol;

#[derive(Parser)]
#[grammar = "script/grammar.pest"]
struct TraceParser;

/// Source being parsed, kept for diagnostics.
struct Source<'s> {
    name: &'s str,
    text: &'s str,
}

impl Source<'_> {
    fn error(&self, message: impl Into<String>, pair: &Pair<'_, Rule>) -> TreeError {
        let span = pair.as_span();
        script_error(message, self.name, self.text, span.start()..span.end())
    }

    fn next<'i>(
        &self,
        pairs: &mut Pairs<'i, Rule>,
        parent: &Pair<'i, Rule>,
        what: &str,
    ) -> Result<Pair<'i, Rule>, TreeError> {
        pairs
            .next()
            .ok_or_else(|| self.error(format!("missing {what}"), parent))
    }

    fn integer<T: std::str::FromStr>(&self, pair: &Pair<'_, Rule>) -> Result<T, TreeError> {
        pair.as_str()
            .parse()
            .map_err(|_| self.error(format!("integer `{}` is out of range", pair.as_str()), pair))
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses the text form of a trace script.
pub fn parse_text(source_name: &str, text: &str) -> Result<Script, TreeError> {
    let source = Source {
        name: source_name,
        text,
    };
    let mut pairs = TraceParser::parse(Rule::script, text)
        .map_err(|e| convert_parse_error(e, &source))?;

    let mut script = Script::default();
    let Some(root) = pairs.next() else {
        return Ok(script);
    };

    for statement in root.into_inner() {
        match statement.as_rule() {
            Rule::file_decl => {
                let mut inner = statement.clone().into_inner();
                let name = source.next(&mut inner, &statement, "file name")?;
                script.file = Some(name_value(name));
            }
            Rule::terminal | Rule::nonterminal => {
                let mut inner = statement.clone().into_inner();
                let index = source.next(&mut inner, &statement, "symbol index")?;
                let name = source.next(&mut inner, &statement, "symbol name")?;
                let index = source.integer(&index)?;
                let name = name_value(name);
                script.symbols.push(if statement.as_rule() == Rule::terminal {
                    Symbol::terminal(index, name)
                } else {
                    Symbol::nonterminal(index, name)
                });
            }
            Rule::rule => {
                let mut inner = statement.clone().into_inner();
                let lhs = source.next(&mut inner, &statement, "rule left-hand side")?;
                let length = source.next(&mut inner, &statement, "rule length")?;
                script.rules.push(RuleDecl {
                    lhs: name_value(lhs),
                    length: source.integer(&length)?,
                });
            }
            Rule::shift => {
                let mut inner = statement.clone().into_inner();
                let symbol = source.next(&mut inner, &statement, "token symbol")?;
                let lexeme = source.next(&mut inner, &statement, "lexeme")?;
                let line = source.next(&mut inner, &statement, "line number")?;
                script.events.push(ScriptEvent::Shift {
                    symbol: name_value(symbol),
                    lexeme: name_value(lexeme),
                    line: source.integer(&line)?,
                });
            }
            Rule::reduce => {
                let mut inner = statement.clone().into_inner();
                let rule = source.next(&mut inner, &statement, "rule number")?;
                script.events.push(ScriptEvent::Reduce {
                    rule: source.integer(&rule)?,
                });
            }
            Rule::accept => script.events.push(ScriptEvent::Accept),
            _ => {}
        }
    }

    Ok(script)
}

// ============================================================================
// HELPERS
// ============================================================================

/// Text of an `ident` or the unescaped contents of a `string`.
fn name_value(pair: Pair<'_, Rule>) -> String {
    match pair.as_rule() {
        Rule::string => pair
            .into_inner()
            .next()
            .map(|inner| unescape(inner.as_str()))
            .unwrap_or_default(),
        _ => pair.as_str().to_string(),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn convert_parse_error(error: pest::error::Error<Rule>, source: &Source<'_>) -> TreeError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => pos..pos,
        pest::error::InputLocation::Span((start, end)) => start..end,
    };
    script_error(error.variant.message(), source.name, source.text, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::SymbolKind;

    const SAMPLE: &str = r#"
# one plus three
file "demo.php"
terminal 0 NUM
terminal 1 "+"
nonterminal 2 E

rule E 3
rule E 1

shift NUM "1" 1
reduce 1
shift "+" "+" 1   # operator
shift NUM "3" 1
reduce 1
reduce 0
accept
"#;

    #[test]
    fn parses_declarations_and_events() {
        let script = parse_text("sample.trace", SAMPLE).unwrap();

        assert_eq!(script.file.as_deref(), Some("demo.php"));
        assert_eq!(script.symbols.len(), 3);
        assert_eq!(script.symbols[1].name, "+");
        assert_eq!(script.symbols[2].kind, SymbolKind::Nonterminal);
        assert_eq!(
            script.rules,
            vec![
                RuleDecl { lhs: "E".into(), length: 3 },
                RuleDecl { lhs: "E".into(), length: 1 },
            ]
        );
        assert_eq!(script.events.len(), 7);
        assert_eq!(
            script.events[2],
            ScriptEvent::Shift {
                symbol: "+".into(),
                lexeme: "+".into(),
                line: 1
            }
        );
        assert_eq!(script.events[6], ScriptEvent::Accept);
    }

    #[test]
    fn string_escapes_are_decoded() {
        let script = parse_text("s", "shift STR \"a \\\"b\\\"\\n\" 2\n").unwrap();
        assert_eq!(
            script.events,
            vec![ScriptEvent::Shift {
                symbol: "STR".into(),
                lexeme: "a \"b\"\n".into(),
                line: 2
            }]
        );
    }

    #[test]
    fn syntax_errors_carry_a_span() {
        let error = parse_text("bad.trace", "terminal 0 NUM\nreduce x\n").unwrap_err();
        match error {
            TreeError::Script { span, .. } => assert!(span.offset() >= 15),
            other => panic!("expected a script error, got {other:?}"),
        }
    }

    #[test]
    fn shift_lines_may_be_negative() {
        let script = parse_text("neg.trace", "shift ID \"x\" -2\n").unwrap();
        assert_eq!(
            script.events,
            vec![ScriptEvent::Shift {
                symbol: "ID".into(),
                lexeme: "x".into(),
                line: -2
            }]
        );
    }

    #[test]
    fn negative_rule_numbers_are_rejected() {
        assert!(parse_text("neg.trace", "reduce -1\n").is_err());
    }

    #[test]
    fn oversized_integers_are_reported() {
        let error = parse_text("big.trace", "terminal 99999999999 NUM\n").unwrap_err();
        assert!(error.to_string().contains("out of range"));
    }

    #[test]
    fn empty_script_is_empty() {
        let script = parse_text("empty.trace", "").unwrap();
        assert!(script.events.is_empty());
        assert!(script.file.is_none());
    }
}
