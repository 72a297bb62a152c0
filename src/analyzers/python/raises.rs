//! Body scan for explicit raises and isinstance guards.
//!
//! Only the definition's own body is scanned: nested functions, classes
//! and lambdas are skipped, and nothing is followed through calls.

use super::parser::{node_text, walk_nodes};
use tree_sitter::Node;

/// Facts gathered from one function body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BodyFacts {
    /// Exception kinds in first-seen order, without duplicates.
    pub raises: Vec<String>,
    pub has_isinstance_guard: bool,
}

impl BodyFacts {
    fn record(&mut self, kind: &str) {
        if !self.raises.iter().any(|r| r == kind) {
            self.raises.push(kind.to_string());
        }
    }
}

pub fn scan_body(body: Node, source: &str) -> BodyFacts {
    let mut facts = BodyFacts::default();

    walk_nodes(body, |node, depth| {
        match node.kind() {
            "function_definition" | "class_definition" | "lambda" if depth > 0 => false,
            "raise_statement" => {
                if let Some(kind) = raised_kind(&node, source) {
                    facts.record(kind);
                }
                true
            }
            "call" => {
                if node
                    .child_by_field_name("function")
                    .is_some_and(|f| f.kind() == "identifier" && node_text(&f, source) == "isinstance")
                {
                    facts.has_isinstance_guard = true;
                }
                true
            }
            _ => true,
        }
    });

    facts
}

/// Exception kind named by a raise statement.
///
/// `raise X(...)`, `raise X` and `raise pkg.X(...)` all yield `X`. Bare
/// re-raises and raises of lowercase names (bound exception variables)
/// yield nothing.
fn raised_kind<'a>(raise: &Node, source: &'a str) -> Option<&'a str> {
    let cause = raise.child_by_field_name("cause").map(|c| c.id());
    let mut cursor = raise.walk();
    let exception = raise
        .named_children(&mut cursor)
        .find(|child| Some(child.id()) != cause)?;

    let target = match exception.kind() {
        "call" => exception.child_by_field_name("function")?,
        _ => exception,
    };

    let name = match target.kind() {
        "identifier" => node_text(&target, source),
        "attribute" => node_text(&target.child_by_field_name("attribute")?, source),
        _ => return None,
    };

    name.chars()
        .next()
        .filter(|c| c.is_ascii_uppercase())
        .map(|_| name)
}
