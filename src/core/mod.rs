pub mod cases;
pub mod errors;

pub use cases::{AssertionCase, CaseKind, Expected, Literal};
pub use errors::{Result, SynthError};

use crate::common::{is_module_path, pascal_case};
use serde::{Deserialize, Serialize};

/// A named unit of Python source handed to the engine.
///
/// `name` is the unit's path relative to the project root (for example
/// `pkg/sample.py`); it determines the import path, the test file name and
/// the test class name of the generated module.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// File name without directories or extension.
    ///
    /// A package's `__init__` takes the package directory's name.
    pub fn stem(&self) -> &str {
        let mut segments = self
            .name
            .rsplit(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".");
        let file = segments.next().unwrap_or(self.name.as_str());
        let stem = file
            .strip_suffix(".pyw")
            .or_else(|| file.strip_suffix(".py"))
            .unwrap_or(file);

        match (stem, segments.next()) {
            ("__init__", Some(package)) => package,
            _ => stem,
        }
    }

    /// Dotted import path, e.g. `pkg/sample.py` -> `pkg.sample`.
    ///
    /// A trailing `__init__` resolves to the package itself.
    pub fn module_path(&self) -> String {
        let normalized = self.name.replace('\\', "/");
        let trimmed = normalized.trim_start_matches("./");
        let without_ext = trimmed
            .strip_suffix(".pyw")
            .or_else(|| trimmed.strip_suffix(".py"))
            .unwrap_or(trimmed);

        let mut segments: Vec<&str> = without_ext.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() > 1 && segments.last() == Some(&"__init__") {
            segments.pop();
        }
        segments.join(".")
    }

    pub fn language(&self) -> Language {
        Language::from_unit_name(&self.name)
    }

    /// Whether `module_path()` can appear in a plain `from ... import` line.
    pub fn has_importable_path(&self) -> bool {
        is_module_path(&self.module_path())
    }

    pub fn test_file_name(&self) -> String {
        format!("test_{}.py", self.stem())
    }

    /// Test file name spelling out the whole import path, used when two
    /// units share a stem: `a/utils.py` -> `test_a_utils.py`.
    pub fn qualified_test_file_name(&self) -> String {
        qualified_test_file_name(&self.module_path())
    }

    pub fn test_class_name(&self) -> String {
        format!("Test{}", pascal_case(self.stem()))
    }
}

/// Source language of a unit, detected from its file extension.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Unknown,
}

impl Language {
    /// Languages with an analyzer.
    pub const SUPPORTED: [Language; 1] = [Language::Python];

    pub fn from_extension(ext: &str) -> Self {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[(&["py", "pyw"], Language::Python)];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    /// Names without an extension are taken as Python source.
    pub fn from_unit_name(name: &str) -> Self {
        let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
        match file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self::from_extension(ext),
            _ => Language::Python,
        }
    }

    /// Line coverage, in percent, a generated suite should reach.
    pub fn coverage_target(self) -> f64 {
        match self {
            Language::Python => 85.0,
            Language::Unknown => 70.0,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Python => write!(f, "python"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

pub fn qualified_test_file_name(import_path: &str) -> String {
    format!("test_{}.py", import_path.replace('.', "_"))
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Method,
    Class,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function => write!(f, "function"),
            Self::Method => write!(f, "method"),
            Self::Class => write!(f, "class"),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ParameterKind {
    #[default]
    Regular,
    /// Named after `*` or `*args`; never filled positionally.
    KeywordOnly,
    /// `*args`
    VarPositional,
    /// `**kwargs`
    VarKeyword,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub annotation: Option<String>,
    pub has_default: bool,
    pub kind: ParameterKind,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            has_default: false,
            kind: ParameterKind::Regular,
        }
    }

    /// Regular parameter without a default value.
    pub fn is_required(&self) -> bool {
        self.kind == ParameterKind::Regular && !self.has_default
    }

    pub fn is_required_keyword(&self) -> bool {
        self.kind == ParameterKind::KeywordOnly && !self.has_default
    }
}

/// Structural record of one discovered function, method or class.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Signature {
    pub name: String,
    pub kind: SymbolKind,
    /// For classes these are the `__init__` parameters.
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub is_async: bool,
    /// Name of the enclosing class for methods.
    pub owning_class: Option<String>,
    pub docstring: Option<String>,
    /// Exception kinds raised explicitly in the body, in first-seen order.
    pub raises: Vec<String>,
    pub decorators: Vec<String>,
    /// Public method names, populated for classes only.
    pub methods: Vec<String>,
    pub has_isinstance_guard: bool,
    pub line: usize,
}

impl Signature {
    pub fn new(name: impl Into<String>, kind: SymbolKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            parameters: Vec::new(),
            return_type: None,
            is_async: false,
            owning_class: None,
            docstring: None,
            raises: Vec::new(),
            decorators: Vec::new(),
            methods: Vec::new(),
            has_isinstance_guard: false,
            line,
        }
    }

    pub fn function(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Function, 1)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Class, 1)
    }

    pub fn method(class: impl Into<String>, name: impl Into<String>) -> Self {
        let mut sig = Self::new(name, SymbolKind::Method, 1);
        sig.owning_class = Some(class.into());
        sig
    }

    pub fn with_params(mut self, names: &[&str]) -> Self {
        self.parameters = names.iter().map(|n| Parameter::new(*n)).collect();
        self
    }

    pub fn with_raises(mut self, kinds: &[&str]) -> Self {
        self.raises = kinds.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_methods(mut self, names: &[&str]) -> Self {
        self.methods = names.iter().map(|m| m.to_string()).collect();
        self
    }

    /// `Class.method` for methods, the bare name otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.owning_class {
            Some(class) => format!("{}.{}", class, self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_class(&self) -> bool {
        self.kind == SymbolKind::Class
    }

    /// Methods callable without an instance.
    pub fn is_static_like(&self) -> bool {
        self.decorators
            .iter()
            .any(|d| d == "staticmethod" || d == "classmethod")
    }

    /// Parameters a caller must supply positionally.
    pub fn arity(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_required()).count()
    }

    /// Whether a call with exactly `count` positional arguments binds.
    pub fn accepts_positional(&self, count: usize) -> bool {
        let positional = self
            .parameters
            .iter()
            .filter(|p| p.kind == ParameterKind::Regular)
            .count();
        let variadic = self
            .parameters
            .iter()
            .any(|p| p.kind == ParameterKind::VarPositional);

        self.arity() <= count
            && (count <= positional || variadic)
            && !self.has_required_keyword_only()
    }

    /// Whether a call must name some argument, so positional literals
    /// alone cannot invoke it.
    pub fn has_required_keyword_only(&self) -> bool {
        self.parameters.iter().any(Parameter::is_required_keyword)
    }

    /// An `isinstance` check backed by some raise: the body rejects
    /// arguments of the wrong type.
    pub fn has_type_guard(&self) -> bool {
        self.has_isinstance_guard && !self.raises.is_empty()
    }

    pub fn raises_kind(&self, predicate: impl Fn(&str) -> bool) -> bool {
        self.raises.iter().any(|r| predicate(r))
    }

    /// Adds an exception kind, keeping first-seen order without duplicates.
    pub fn record_raise(&mut self, kind: impl Into<String>) {
        let kind = kind.into();
        if !self.raises.contains(&kind) {
            self.raises.push(kind);
        }
    }
}
