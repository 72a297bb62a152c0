//! Per-unit error types for the synthesis pipeline

use serde::Serialize;
use thiserror::Error;

/// Errors that stop one source unit from producing a generated module.
///
/// None of these abort a batch; the driver records them as diagnostics for
/// the failing unit and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SynthError {
    /// Source is not structurally parseable, or exceeds the analyzer limits
    #[error("Parse error in {unit}{}: {message}", line_suffix(.line))]
    Parse {
        unit: String,
        line: Option<usize>,
        message: String,
    },

    /// No analyzer handles the unit's language
    #[error("No analyzer for {language} source in {unit}")]
    UnsupportedLanguage { unit: String, language: String },

    /// A discovered symbol ended up with no assertion cases
    #[error("No test cases generated for `{symbol}` in {unit}")]
    EmptyCoverage { unit: String, symbol: String },

    /// Rendered module failed to re-parse as Python
    #[error("Generated module for {unit} is not valid Python: {message}")]
    InvalidOutput { unit: String, message: String },
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(":{}", l)).unwrap_or_default()
}

impl SynthError {
    pub fn parse(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            unit: unit.into(),
            line: None,
            message: message.into(),
        }
    }

    pub fn parse_at(unit: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            unit: unit.into(),
            line: Some(line),
            message: message.into(),
        }
    }

    pub fn unsupported_language(unit: impl Into<String>, language: impl Into<String>) -> Self {
        Self::UnsupportedLanguage {
            unit: unit.into(),
            language: language.into(),
        }
    }

    pub fn empty_coverage(unit: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::EmptyCoverage {
            unit: unit.into(),
            symbol: symbol.into(),
        }
    }

    pub fn invalid_output(unit: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            unit: unit.into(),
            message: message.into(),
        }
    }

    /// Unit the error belongs to.
    pub fn unit(&self) -> &str {
        match self {
            Self::Parse { unit, .. }
            | Self::UnsupportedLanguage { unit, .. }
            | Self::EmptyCoverage { unit, .. }
            | Self::InvalidOutput { unit, .. } => unit,
        }
    }

    /// Internal defects, as opposed to problems with the input.
    pub fn is_internal(&self) -> bool {
        !matches!(self, Self::Parse { .. } | Self::UnsupportedLanguage { .. })
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, SynthError>;
