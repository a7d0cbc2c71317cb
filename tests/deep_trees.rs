// Trees far deeper than any random test builds: a left-recursive statement list
// nests one level per statement.

use std::fmt::{self, Write};

use lrtree::tree::render_text;
use lrtree::{
    replay, Event, Grammar, NodeKind, ParseSession, ParseTree, SymbolTable, Token, TreeBuilder,
    TreeDescription, EPSILON_LINE,
};

/// list -> ε (rule 0) | list S (rule 1)
fn list_grammar() -> Grammar {
    let mut symbols = SymbolTable::new();
    symbols.terminal(0, "S").unwrap();
    symbols.nonterminal(1, "list").unwrap();
    let mut grammar = Grammar::new(symbols);
    grammar.add_rule("list", 0).unwrap();
    grammar.add_rule("list", 2).unwrap();
    grammar
}

fn statement_list(statements: usize) -> ParseTree {
    let mut events = Vec::with_capacity(2 * statements + 2);
    events.push(Event::Reduce(0));
    for line in 1..=statements {
        events.push(Event::Shift(Token::new(0, "S", ";", line as i32)));
        events.push(Event::Reduce(1));
    }
    events.push(Event::Accept);

    let mut builder = TreeBuilder::new(ParseSession::new("deep.php"));
    replay(&list_grammar(), events, &mut builder).unwrap()
}

fn depth(tree: &ParseTree) -> usize {
    let mut depth = 0;
    let mut node = tree.root().unwrap();
    while let Ok(first) = node.child_at(0) {
        node = first;
        depth += 1;
    }
    depth
}

fn assert_round_trip(statements: usize) {
    let tree = statement_list(statements);
    assert!(depth(&tree) >= statements);

    let json = tree.describe().unwrap().to_json().unwrap();
    let description = TreeDescription::from_json(&json).unwrap();
    assert_eq!(description.node_count(), tree.len());

    let rebuilt = description.rebuild(&ParseSession::new("copy.php")).unwrap();
    assert_eq!(rebuilt.len(), tree.len());
    assert!(tree.structurally_eq(&rebuilt));
    assert_eq!(rebuilt.root().unwrap().leftmost_line(), EPSILON_LINE);
}

#[test]
fn round_trip_past_json_nesting_limit() {
    assert_round_trip(200);
}

#[test]
fn round_trip_past_format_width_limit() {
    assert_round_trip(40_000);
}

#[test]
fn round_trip_at_one_hundred_thousand_levels() {
    assert_round_trip(100_000);
}

#[test]
fn structural_equality_on_very_deep_trees() {
    let tree = statement_list(200_000);
    assert!(tree.structurally_eq(&tree));

    let mut nodes = tree.describe().unwrap().nodes().to_vec();
    let last = nodes.len() - 1;
    if let lrtree::DescribedNode::Token { lexeme, .. } = &mut nodes[last] {
        *lexeme = "}".to_string();
    }
    let changed = TreeDescription::new(nodes)
        .rebuild(&ParseSession::new("changed.php"))
        .unwrap();
    assert!(!tree.structurally_eq(&changed));
}

#[test]
fn outline_of_a_deep_list() {
    const STATEMENTS: usize = 2_000;
    let tree = statement_list(STATEMENTS);
    let text = render_text(&tree);

    assert_eq!(text.lines().count(), tree.len());
    let deepest = text
        .lines()
        .map(|line| line.len() - line.trim_start().len())
        .max()
        .unwrap();
    assert_eq!(deepest, STATEMENTS * 2);
    assert!(text.starts_with("list #1 [deep.php:-2]\n"));
}

/// Counts output instead of storing it; a 40 000-level outline is gigabytes of
/// indentation.
#[derive(Default)]
struct Tally {
    lines: usize,
    widest: usize,
}

impl Write for Tally {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.widest = self.widest.max(s.len());
        if s.ends_with('\n') {
            self.lines += 1;
        }
        Ok(())
    }
}

#[test]
fn outline_deeper_than_format_width_limit() {
    const STATEMENTS: usize = 40_000;
    let tree = statement_list(STATEMENTS);

    let mut tally = Tally::default();
    write!(tally, "{tree}").unwrap();

    assert!(tally.widest >= STATEMENTS * 2);
    assert_eq!(tally.lines, tree.len());
}

#[test]
fn deep_list_keeps_every_statement() {
    let tree = statement_list(50_000);
    let tokens = tree
        .root()
        .unwrap()
        .preorder()
        .filter(|node| matches!(node.kind(), NodeKind::Token(_)))
        .count();
    assert_eq!(tokens, 50_000);
}
