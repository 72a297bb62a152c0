//! Property-based tests for the synthesis pipeline
//!
//! These tests verify invariants that should hold for all inputs:
//! - Rendering is deterministic
//! - Test function names are unique within a module
//! - Every rendered module parses as Python
//! - Every public symbol is covered by at least one test
//! - Literals always render as valid Python expressions

use proptest::prelude::*;
use std::collections::HashSet;
use testsynth::analyzers::python::check_syntax;
use testsynth::common::PYTHON_KEYWORDS;
use testsynth::{synthesize_unit, Literal, SourceUnit, SynthConfig};

/// Names the grammar treats specially outside the keyword list
const RESERVED: &[&str] = &["print", "exec", "match", "case", "type", "self"];

/// Words that steer the classifier into the template banks
const STEMS: &[&str] = &[
    "add", "sum", "subtract", "multiply", "divide", "area", "email", "validate", "calculate",
    "user", "total", "get", "process",
];

fn python_identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,10}",
        (prop::sample::select(STEMS), prop::sample::select(STEMS))
            .prop_map(|(a, b)| format!("{}_{}", a, b)),
    ]
    .prop_filter("not reserved", |s| {
        !PYTHON_KEYWORDS.contains(&s.as_str()) && !RESERVED.contains(&s.as_str())
    })
}

fn raise_kind() -> impl Strategy<Value = Option<&'static str>> {
    prop::sample::select(vec![None, Some("TypeError"), Some("ValueError"), Some("CustomError")])
}

#[derive(Debug, Clone)]
struct FunctionShape {
    name: String,
    arity: usize,
    raises: Option<&'static str>,
    is_async: bool,
}

fn function_shape() -> impl Strategy<Value = FunctionShape> {
    (python_identifier(), 0usize..4, raise_kind(), any::<bool>()).prop_map(
        |(name, arity, raises, is_async)| FunctionShape {
            name,
            arity,
            raises,
            is_async,
        },
    )
}

fn render_function(shape: &FunctionShape, indent: &str, receiver: bool) -> String {
    let mut params: Vec<String> = (0..shape.arity).map(|i| format!("p{}", i)).collect();
    if receiver {
        params.insert(0, "self".to_string());
    }
    let prefix = if shape.is_async { "async def" } else { "def" };
    let body = match (shape.raises, shape.arity) {
        (Some(kind), 0) => format!("{}    raise {}(\"bad\")\n", indent, kind),
        (Some(kind), _) => format!(
            "{indent}    if p0 is None:\n{indent}        raise {kind}(\"bad\")\n{indent}    return p0\n",
            indent = indent,
            kind = kind
        ),
        (None, _) => format!("{}    return None\n", indent),
    };
    format!("{}{} {}({}):\n{}", indent, prefix, shape.name, params.join(", "), body)
}

/// A module with free functions and one class holding methods.
fn python_module() -> impl Strategy<Value = (String, Vec<String>)> {
    (
        prop::collection::vec(function_shape(), 0..6),
        "[A-Z][a-zA-Z]{0,8}(Account|Manager|Service)?"
            .prop_filter("not a keyword", |s: &String| !PYTHON_KEYWORDS.contains(&s.as_str())),
        prop::collection::vec(function_shape(), 0..4),
    )
        .prop_map(|(functions, class_name, methods)| {
            let mut source = String::from("class CustomError(Exception):\n    pass\n\n");
            let mut public: Vec<String> = vec!["CustomError".to_string()];

            source.push_str(&format!("class {}:\n", class_name));
            if methods.is_empty() {
                source.push_str("    pass\n");
            }
            for method in &methods {
                source.push_str(&render_function(method, "    ", true));
                public.push(format!("{}.{}", class_name, method.name));
            }
            source.push('\n');
            public.push(class_name);

            for function in &functions {
                source.push_str(&render_function(function, "", false));
                source.push('\n');
                public.push(function.name.clone());
            }
            (source, public)
        })
}

fn literal() -> impl Strategy<Value = Literal> {
    let text = prop::collection::vec(
        prop::sample::select(vec!['a', 'Z', '0', ' ', '\'', '"', '\\', '\n', '\t', '\r', '@', 'é', '\u{1}']),
        0..24,
    )
    .prop_map(|chars| Literal::Str(chars.into_iter().collect::<String>().into()));

    prop_oneof![
        Just(Literal::None),
        any::<bool>().prop_map(Literal::Bool),
        any::<i64>().prop_map(Literal::Int),
        any::<f64>().prop_map(Literal::Float),
        text,
        Just(Literal::EmptyList),
        Just(Literal::EmptyDict),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: identical input renders byte-identical output
    #[test]
    fn prop_rendering_is_deterministic((source, _) in python_module()) {
        let unit = SourceUnit::new("generated_mod.py", source);
        let config = SynthConfig::default();

        let first = synthesize_unit(&unit, &config).unwrap().render();
        let second = synthesize_unit(&unit, &config).unwrap().render();
        prop_assert_eq!(first, second);
    }

    /// Property: no two test functions share a name
    #[test]
    fn prop_test_names_are_unique((source, _) in python_module()) {
        let module = synthesize_unit(&SourceUnit::new("generated_mod.py", source), &SynthConfig::default()).unwrap();

        let names: HashSet<&str> = module.tests.iter().map(|t| t.name.as_str()).collect();
        prop_assert_eq!(names.len(), module.tests.len());
    }

    /// Property: every rendered module is syntactically valid Python
    #[test]
    fn prop_rendered_module_parses((source, _) in python_module()) {
        let mut config = SynthConfig::default();
        config.emitter.verify_output = false;

        let module = synthesize_unit(&SourceUnit::new("generated_mod.py", source), &config).unwrap();
        let rendered = module.render();
        prop_assert!(check_syntax(&rendered).is_ok(), "invalid output:\n{}", rendered);
    }

    /// Property: every public symbol appears as a test target
    #[test]
    fn prop_every_symbol_is_covered((source, public) in python_module()) {
        let module = synthesize_unit(&SourceUnit::new("generated_mod.py", source), &SynthConfig::default()).unwrap();

        let targets: HashSet<String> = module.tests.iter().map(|t| t.target.qualified_name()).collect();
        for symbol in &public {
            prop_assert!(targets.contains(symbol), "{} not covered", symbol);
        }
    }

    /// Property: literals render as valid Python expressions
    #[test]
    fn prop_literals_render_as_python(value in literal()) {
        let line = format!("x = {}\n", value.to_python());
        prop_assert!(check_syntax(&line).is_ok(), "invalid literal: {}", line);
    }
}
