//! Signature extraction from a Python syntax tree.
//!
//! Walks module-level statements and class bodies in declaration order.
//! Nested functions and nested classes are not recorded; their raises do
//! not leak into the enclosing definition.

use super::parser::{node_line, node_text};
use super::raises::scan_body;
use crate::core::{Parameter, ParameterKind, Signature, SymbolKind};
use tree_sitter::Node;

/// Decorators whose targets are attributes rather than callables.
const PROPERTY_DECORATORS: &[&str] = &["property", "cached_property", "functools.cached_property"];

pub struct SignatureExtractor<'a> {
    source: &'a str,
    include_private: bool,
}

/// One top-level definition with the methods it owns.
struct Definition {
    signature: Signature,
    methods: Vec<Signature>,
}

impl<'a> SignatureExtractor<'a> {
    pub fn new(source: &'a str, include_private: bool) -> Self {
        Self {
            source,
            include_private,
        }
    }

    /// Ordered signatures: classes precede their methods.
    pub fn extract(&self, root: Node) -> Vec<Signature> {
        let mut definitions: Vec<Definition> = Vec::new();

        let mut cursor = root.walk();
        for statement in root.named_children(&mut cursor) {
            let Some((node, decorators)) = self.unwrap_decorated(statement) else {
                continue;
            };

            let definition = match node.kind() {
                "function_definition" => self
                    .function(node, decorators, None)
                    .map(|signature| Definition {
                        signature,
                        methods: Vec::new(),
                    }),
                "class_definition" => self.class(node, decorators),
                _ => None,
            };

            if let Some(definition) = definition {
                // a later definition rebinds the name
                definitions.retain(|d| d.signature.name != definition.signature.name);
                definitions.push(definition);
            }
        }

        definitions
            .into_iter()
            .flat_map(|d| std::iter::once(d.signature).chain(d.methods))
            .collect()
    }

    /// Splits a `decorated_definition` into its definition and decorator names.
    fn unwrap_decorated<'t>(&self, node: Node<'t>) -> Option<(Node<'t>, Vec<String>)> {
        if node.kind() != "decorated_definition" {
            return Some((node, Vec::new()));
        }

        let mut cursor = node.walk();
        let decorators = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .filter_map(|decorator| self.decorator_name(decorator))
            .collect();

        node.child_by_field_name("definition")
            .map(|definition| (definition, decorators))
    }

    fn decorator_name(&self, decorator: Node) -> Option<String> {
        let expression = decorator.named_child(0)?;
        let target = if expression.kind() == "call" {
            expression.child_by_field_name("function")?
        } else {
            expression
        };
        Some(node_text(&target, self.source).to_string())
    }

    fn is_visible(&self, name: &str) -> bool {
        self.include_private || !name.starts_with('_')
    }

    fn function(
        &self,
        node: Node,
        decorators: Vec<String>,
        owning_class: Option<&str>,
    ) -> Option<Signature> {
        let name = node_text(&node.child_by_field_name("name")?, self.source);
        if !self.is_visible(name) {
            return None;
        }

        let kind = if owning_class.is_some() {
            SymbolKind::Method
        } else {
            SymbolKind::Function
        };
        let mut signature = Signature::new(name, kind, node_line(&node));
        signature.owning_class = owning_class.map(str::to_string);
        signature.decorators = decorators;
        signature.is_async = node.child(0).is_some_and(|c| c.kind() == "async");
        signature.return_type = node
            .child_by_field_name("return_type")
            .map(|t| node_text(&t, self.source).to_string());

        if let Some(params) = node.child_by_field_name("parameters") {
            signature.parameters = self.parameters(params);
        }
        if owning_class.is_some() && !signature.decorators.iter().any(|d| d == "staticmethod") {
            drop_receiver(&mut signature.parameters);
        }

        if let Some(body) = node.child_by_field_name("body") {
            signature.docstring = self.docstring(body);
            let facts = scan_body(body, self.source);
            signature.raises = facts.raises;
            signature.has_isinstance_guard = facts.has_isinstance_guard;
        }

        Some(signature)
    }

    fn class(&self, node: Node, decorators: Vec<String>) -> Option<Definition> {
        let name = node_text(&node.child_by_field_name("name")?, self.source);
        if !self.is_visible(name) {
            return None;
        }

        let mut signature = Signature::new(name, SymbolKind::Class, node_line(&node));
        signature.decorators = decorators;

        let Some(body) = node.child_by_field_name("body") else {
            return Some(Definition {
                signature,
                methods: Vec::new(),
            });
        };
        signature.docstring = self.docstring(body);

        let mut methods: Vec<Signature> = Vec::new();
        let mut cursor = body.walk();
        for statement in body.named_children(&mut cursor) {
            let Some((def, decorators)) = self.unwrap_decorated(statement) else {
                continue;
            };
            if def.kind() != "function_definition" {
                continue;
            }

            let method_name = def
                .child_by_field_name("name")
                .map(|n| node_text(&n, self.source))
                .unwrap_or("");
            if method_name == "__init__" {
                if let Some(init) = self.constructor(def, name) {
                    signature.parameters = init.parameters;
                    signature.raises = init.raises;
                    signature.has_isinstance_guard = init.has_isinstance_guard;
                }
                continue;
            }
            if decorators
                .iter()
                .any(|d| PROPERTY_DECORATORS.contains(&d.as_str()) || is_property_accessor(d))
            {
                continue;
            }

            if let Some(method) = self.function(def, decorators, Some(name)) {
                methods.retain(|m| m.name != method.name);
                methods.push(method);
            }
        }

        signature.methods = methods.iter().map(|m| m.name.clone()).collect();
        Some(Definition { signature, methods })
    }

    /// `__init__` is read for the class's parameters even when private
    /// symbols are hidden.
    fn constructor(&self, def: Node, class_name: &str) -> Option<Signature> {
        let extractor = SignatureExtractor::new(self.source, true);
        extractor.function(def, Vec::new(), Some(class_name))
    }

    /// Parameters in order; those after `*` or `*args` are keyword-only.
    fn parameters(&self, params: Node) -> Vec<Parameter> {
        let mut keyword_only = false;
        let mut parameters = Vec::new();

        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() == "keyword_separator" {
                keyword_only = true;
                continue;
            }
            let Some(mut parameter) = self.parameter(param) else {
                continue;
            };
            match parameter.kind {
                ParameterKind::VarPositional => keyword_only = true,
                ParameterKind::Regular if keyword_only => parameter.kind = ParameterKind::KeywordOnly,
                _ => {}
            }
            parameters.push(parameter);
        }
        parameters
    }

    fn parameter(&self, param: Node) -> Option<Parameter> {
        let text = |n: Node| node_text(&n, self.source).to_string();

        let parameter = match param.kind() {
            "identifier" => Parameter::new(text(param)),
            "typed_parameter" => {
                let inner = param.named_child(0)?;
                let mut p = self.parameter(inner)?;
                p.annotation = param.child_by_field_name("type").map(text);
                p
            }
            "default_parameter" | "typed_default_parameter" => Parameter {
                name: text(param.child_by_field_name("name")?),
                annotation: param.child_by_field_name("type").map(text),
                has_default: true,
                kind: ParameterKind::Regular,
            },
            "list_splat_pattern" => Parameter {
                kind: ParameterKind::VarPositional,
                ..Parameter::new(text(param.named_child(0)?))
            },
            "dictionary_splat_pattern" => Parameter {
                kind: ParameterKind::VarKeyword,
                ..Parameter::new(text(param.named_child(0)?))
            },
            // `*` and `/` separators
            _ => return None,
        };

        Some(parameter)
    }

    fn docstring(&self, body: Node) -> Option<String> {
        let first = body.named_child(0)?;
        if first.kind() != "expression_statement" {
            return None;
        }
        let string = first.named_child(0)?;
        if string.kind() != "string" {
            return None;
        }

        let mut cursor = string.walk();
        let content: String = string
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "string_content")
            .map(|c| node_text(&c, self.source))
            .collect();

        let cleaned = clean_docstring(&content);
        (!cleaned.is_empty()).then_some(cleaned)
    }
}

fn is_property_accessor(decorator: &str) -> bool {
    decorator.ends_with(".setter") || decorator.ends_with(".deleter") || decorator.ends_with(".getter")
}

/// Removes the implicit receiver (`self` or `cls`) of an instance or class method.
fn drop_receiver(parameters: &mut Vec<Parameter>) {
    if parameters
        .first()
        .is_some_and(|p| p.kind == ParameterKind::Regular)
    {
        parameters.remove(0);
    }
}

/// Trims each line and drops leading/trailing blank lines.
fn clean_docstring(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .skip_while(|l| l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}
