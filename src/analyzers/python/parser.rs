//! Tree-sitter parser integration for Python
//!
//! Parses a source unit with the Python grammar and enforces the analyzer's
//! size and nesting limits before any extraction happens.

use crate::config::AnalyzerConfig;
use crate::core::{Result, SourceUnit, SynthError};
use tree_sitter::{Node, Parser, Tree, TreeCursor};

/// Longest snippet of offending source quoted in a parse error
const SNIPPET_LIMIT: usize = 40;

/// Parse Python source into a tree-sitter tree.
///
/// Fails when the unit exceeds `max_source_bytes`, when the tree contains
/// `ERROR` or `MISSING` nodes, or when syntax nesting exceeds `max_depth`.
pub fn parse_source(unit: &SourceUnit, config: &AnalyzerConfig) -> Result<Tree> {
    if unit.source.len() > config.max_source_bytes {
        return Err(SynthError::parse(
            &unit.name,
            format!(
                "source is {} bytes, exceeding the limit of {} bytes",
                unit.source.len(),
                config.max_source_bytes
            ),
        ));
    }

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| SynthError::parse(&unit.name, format!("grammar unavailable: {}", e)))?;

    let tree = parser
        .parse(&unit.source, None)
        .ok_or_else(|| SynthError::parse(&unit.name, "parser produced no tree"))?;

    if has_parse_errors(&tree) {
        let (line, message) = first_syntax_error(&tree, &unit.source)
            .unwrap_or((1, "invalid syntax".to_string()));
        return Err(SynthError::parse_at(&unit.name, line, message));
    }

    if let Some(line) = depth_violation(&tree, config.max_depth) {
        return Err(SynthError::parse_at(
            &unit.name,
            line,
            format!("nesting exceeds the depth limit of {}", config.max_depth),
        ));
    }

    Ok(tree)
}

/// Parse text without limits and report its first syntax error.
pub fn check_syntax(source: &str) -> std::result::Result<(), (usize, String)> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| (1, format!("grammar unavailable: {}", e)))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| (1, "parser produced no tree".to_string()))?;

    if has_parse_errors(&tree) {
        return Err(first_syntax_error(&tree, source).unwrap_or((1, "invalid syntax".to_string())));
    }
    Ok(())
}

/// Check if a parse tree has errors
pub fn has_parse_errors(tree: &Tree) -> bool {
    tree.root_node().has_error()
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Visit every node in document order without recursion.
///
/// The callback receives the node and its depth (root is 0) and returns
/// `false` to skip the node's children.
pub fn walk_nodes<'t>(root: Node<'t>, mut visit: impl FnMut(Node<'t>, usize) -> bool) {
    let mut cursor: TreeCursor<'t> = root.walk();
    let mut depth = 0usize;

    loop {
        let descend = visit(cursor.node(), depth);
        if descend && cursor.goto_first_child() {
            depth += 1;
            continue;
        }

        loop {
            if depth == 0 {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
            cursor.goto_parent();
            depth -= 1;
        }
    }
}

fn first_syntax_error(tree: &Tree, source: &str) -> Option<(usize, String)> {
    let mut found = None;
    walk_nodes(tree.root_node(), |node, _| {
        if found.is_some() {
            return false;
        }
        if node.is_missing() {
            found = Some((node_line(&node), format!("missing `{}`", node.kind())));
            return false;
        }
        if node.is_error() {
            found = Some((node_line(&node), unexpected_message(&node, source)));
            return false;
        }
        node.has_error()
    });
    found
}

fn unexpected_message(node: &Node, source: &str) -> String {
    let text = node_text(node, source).trim();
    let first_line = text.lines().next().unwrap_or("");
    if first_line.is_empty() {
        return "invalid syntax".to_string();
    }
    let snippet: String = first_line.chars().take(SNIPPET_LIMIT).collect();
    format!("unexpected `{}`", snippet)
}

/// Line of the first node nested deeper than `max_depth`, if any.
fn depth_violation(tree: &Tree, max_depth: usize) -> Option<usize> {
    let mut violation = None;
    walk_nodes(tree.root_node(), |node, depth| {
        if violation.is_some() {
            return false;
        }
        if depth > max_depth {
            violation = Some(node_line(&node));
            return false;
        }
        true
    });
    violation
}
