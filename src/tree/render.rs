//! Text and Graphviz renderings of a parse tree.

use std::fmt::{self, Write};

use super::{NodeKind, NodeRef, ParseTree};

/// Indented outline, one node per line.
///
/// ```text
/// E #2 [demo.php:1]
///   NUM #0 "1" line 1
/// ```
pub fn render_text(tree: &ParseTree) -> String {
    let mut out = String::new();
    if let Some(root) = tree.root() {
        // Writing into a String cannot fail.
        let _ = write_outline(&mut out, root);
    }
    out
}

fn write_outline(out: &mut impl Write, root: NodeRef<'_>) -> fmt::Result {
    let mut stack = vec![(root, 0usize)];
    // Grown on demand; format widths cap out at u16::MAX.
    let mut indent = String::new();
    while let Some((node, depth)) = stack.pop() {
        while indent.len() < depth * 2 {
            indent.push_str("  ");
        }
        out.write_str(&indent[..depth * 2])?;
        match node.kind() {
            NodeKind::Token(token) => writeln!(
                out,
                "{} #{} {:?} line {}",
                node.name(),
                node.symbol(),
                token.lexeme(),
                token.line()
            )?,
            NodeKind::Interior(_) => {
                writeln!(out, "{} #{} [{}]", node.name(), node.symbol(), node.location())?;
                let children: Vec<_> = node.children().collect();
                stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
        }
    }
    Ok(())
}

/// Graphviz `digraph`, nodes keyed by their identifiers.
pub fn render_dot(tree: &ParseTree) -> String {
    let mut out = String::from("digraph parse_tree {\n  node [shape=box];\n");
    for node in tree.preorder() {
        let label = match node.kind() {
            NodeKind::Token(token) => format!("{}\n{}", node.name(), token.lexeme()),
            NodeKind::Interior(_) => node.name().to_string(),
        };
        let shape = if node.is_token() { ", shape=ellipse" } else { "" };
        out.push_str(&format!(
            "  n{} [label=\"{}\"{}];\n",
            node.id(),
            escape_dot(&label),
            shape
        ));
        for child in node.children() {
            out.push_str(&format!("  n{} -> n{};\n", node.id(), child.id()));
        }
    }
    out.push_str("}\n");
    out
}

fn escape_dot(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => write_outline(f, root),
            None => Ok(()),
        }
    }
}
