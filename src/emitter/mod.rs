//! Test module emission.
//!
//! Groups each symbol's cases into named test functions, assembles the
//! module for one source unit, and renders it as pytest source.

pub mod naming;
pub mod pytest;

pub use naming::{base_test_name, free_class_name, symbol_slug, NameAllocator};
pub use pytest::{is_builtin_exception, PytestWriter};

use crate::analyzers::python::parser::check_syntax;
use crate::core::{
    qualified_test_file_name, AssertionCase, Expected, Language, Result, Signature, SourceUnit,
    SymbolKind, SynthError,
};
use crate::patterns::Category;
use serde::{Deserialize, Serialize};

/// A discovered symbol together with the cases synthesized for it.
#[derive(Clone, Debug)]
pub struct SymbolCases {
    pub signature: Signature,
    pub category: Category,
    pub cases: Vec<AssertionCase>,
}

/// How a test reaches the symbol it exercises.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestTarget {
    pub kind: SymbolKind,
    pub name: String,
    pub owning_class: Option<String>,
    pub is_async: bool,
    /// Static and class methods are reached through the class.
    pub is_static_like: bool,
}

impl TestTarget {
    pub fn of(signature: &Signature) -> Self {
        Self {
            kind: signature.kind,
            name: signature.name.clone(),
            owning_class: signature.owning_class.clone(),
            is_async: signature.is_async,
            is_static_like: signature.is_static_like(),
        }
    }

    /// Top-level name the test module must import.
    pub fn import_name(&self) -> &str {
        self.owning_class.as_deref().unwrap_or(&self.name)
    }

    pub fn qualified_name(&self) -> String {
        match &self.owning_class {
            Some(class) => format!("{}.{}", class, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTest {
    pub name: String,
    pub target: TestTarget,
    pub category: Category,
    pub cases: Vec<AssertionCase>,
}

impl GeneratedTest {
    /// Whether rendering needs `asyncio` to drive this test.
    pub fn awaits_target(&self) -> bool {
        self.target.is_async && self.cases.iter().any(AssertionCase::calls_target)
    }
}

/// The complete emitted test set for one source unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratedModule {
    pub unit_name: String,
    pub import_path: String,
    /// `false` when the import path is not a dotted identifier path.
    pub importable_by_name: bool,
    pub file_name: String,
    pub test_class: String,
    pub language: Language,
    /// Line coverage, in percent, the suite is meant to reach
    pub coverage_target: f64,
    pub tests: Vec<GeneratedTest>,
}

impl GeneratedModule {
    /// Top-level names the tests reference, in first-use order: targets
    /// and any non-builtin exception kinds they expect.
    pub fn imported_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for test in &self.tests {
            push_unique(&mut names, test.target.import_name());
            for case in &test.cases {
                if let Expected::Raises(kind) = &case.expected {
                    if !is_builtin_exception(kind) {
                        push_unique(&mut names, kind.as_ref());
                    }
                }
            }
        }
        names
    }

    pub fn needs_asyncio(&self) -> bool {
        self.tests.iter().any(GeneratedTest::awaits_target)
    }

    /// `test_<import path>.py`, for units whose stem is not unique.
    pub fn qualified_file_name(&self) -> String {
        qualified_test_file_name(&self.import_path)
    }

    pub fn case_count(&self) -> usize {
        self.tests.iter().map(|t| t.cases.len()).sum()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // formatting into a String cannot fail
        let _ = PytestWriter::new(&mut out).write_module(self);
        out
    }
}

/// Assemble the module for one unit.
///
/// Consecutive cases sharing kind and topic become one test function.
/// Fails with `EmptyCoverage` when any symbol arrives without cases.
pub fn emit(unit: &SourceUnit, symbols: &[SymbolCases]) -> Result<GeneratedModule> {
    let mut names = NameAllocator::new();
    let mut tests = Vec::new();

    for symbol in symbols {
        if symbol.cases.is_empty() {
            return Err(SynthError::empty_coverage(
                &unit.name,
                symbol.signature.qualified_name(),
            ));
        }

        let target = TestTarget::of(&symbol.signature);
        for group in group_cases(&symbol.cases) {
            let first = &group[0];
            let name = names.allocate(base_test_name(&symbol.signature, first.kind, &first.topic));
            tests.push(GeneratedTest {
                name,
                target: target.clone(),
                category: symbol.category,
                cases: group.to_vec(),
            });
        }
    }

    let mut module = GeneratedModule {
        unit_name: unit.name.clone(),
        import_path: unit.module_path(),
        importable_by_name: unit.has_importable_path(),
        file_name: unit.test_file_name(),
        test_class: String::new(),
        language: unit.language(),
        coverage_target: unit.language().coverage_target(),
        tests,
    };
    // an imported target named like the test class would be shadowed by it
    let test_class = free_class_name(unit.test_class_name(), &module.imported_names());
    module.test_class = test_class;
    Ok(module)
}

fn push_unique<'a>(names: &mut Vec<&'a str>, name: &'a str) {
    if !names.contains(&name) {
        names.push(name);
    }
}

/// Runs of consecutive cases with equal kind and topic.
fn group_cases(cases: &[AssertionCase]) -> impl Iterator<Item = &[AssertionCase]> {
    cases.chunk_by(|a, b| a.kind == b.kind && a.topic == b.topic)
}

/// Render and re-parse; fails with `InvalidOutput` on a syntax error.
pub fn render_verified(module: &GeneratedModule) -> Result<String> {
    let source = module.render();
    check_syntax(&source).map_err(|(line, message)| {
        SynthError::invalid_output(&module.unit_name, format!("line {}: {}", line, message))
    })?;
    Ok(source)
}
