//! Concrete test instances produced by the synthesizer and the fallback
//! generator, and the Python literals they are built from.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CaseKind {
    Positive,
    Negative,
    Edge,
    Error,
}

impl std::fmt::Display for CaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Edge => write!(f, "edge"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A Python literal value.
///
/// String payloads are `Cow<'static, str>` so template banks can be written
/// as `const` data while deserialized cases own their text.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Cow<'static, str>),
    EmptyList,
    EmptyDict,
}

impl Literal {
    pub const fn str(value: &'static str) -> Self {
        Self::Str(Cow::Borrowed(value))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Source text of the literal as Python would accept it.
    pub fn to_python(&self) -> String {
        match self {
            Self::None => "None".to_string(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => python_float(*x),
            Self::Str(s) => python_string(s),
            Self::EmptyList => "[]".to_string(),
            Self::EmptyDict => "{}".to_string(),
        }
    }
}

fn python_float(x: f64) -> String {
    if x.is_nan() {
        "float('nan')".to_string()
    } else if x.is_infinite() {
        if x > 0.0 {
            "float('inf')".to_string()
        } else {
            "float('-inf')".to_string()
        }
    } else {
        // Debug keeps the trailing `.0` on integral values
        format!("{:?}", x)
    }
}

fn python_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// What a generated assertion checks.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Expected {
    /// The call returns this literal.
    Value(Literal),
    /// The call raises this exception kind.
    Raises(Cow<'static, str>),
    /// The target is callable; no call is made.
    Callable,
    /// The target is instantiable with no arguments.
    Instance,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AssertionCase {
    pub kind: CaseKind,
    /// Grouping label; consecutive cases sharing kind and topic become one
    /// test function.
    pub topic: Cow<'static, str>,
    pub inputs: Vec<Literal>,
    pub expected: Expected,
    /// Trailing comment rendered next to the assertion.
    pub note: Option<Cow<'static, str>>,
}

impl AssertionCase {
    pub fn callable() -> Self {
        Self {
            kind: CaseKind::Positive,
            topic: Cow::Borrowed("callable"),
            inputs: Vec::new(),
            expected: Expected::Callable,
            note: None,
        }
    }

    pub fn instantiable() -> Self {
        Self {
            kind: CaseKind::Positive,
            topic: Cow::Borrowed("instantiation"),
            inputs: Vec::new(),
            expected: Expected::Instance,
            note: None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.expected, Expected::Raises(_))
    }

    /// Whether the case invokes the target (as opposed to only inspecting it).
    pub fn calls_target(&self) -> bool {
        matches!(self.expected, Expected::Value(_) | Expected::Raises(_))
    }
}
