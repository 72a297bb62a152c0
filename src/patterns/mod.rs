//! Pattern classification of discovered symbols.
//!
//! Maps each [`Signature`] to one [`Category`] from a closed taxonomy using
//! naming conventions, declared arity, and whether the body textually raises
//! a matching exception kind. The classifier never looks at what a guard
//! actually checks, so its expectations can be wrong for a given
//! implementation; that trade-off is accepted in exchange for determinism.

pub mod rules;

pub use rules::{
    is_type_error_like, is_value_error_like, GuardKind, Keyword, KeywordRule, RuleSet,
    ENTITY_CLASS_SUFFIXES,
};

use crate::config::ClassifierConfig;
use crate::core::Signature;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Semantic intent bucket selecting a test template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    EmailValidation,
    Arithmetic(ArithmeticOp),
    Geometry,
    EntityLifecycle,
    Generic,
}

impl Category {
    /// Every category, in rule-table declaration order.
    pub const ALL: [Category; 8] = [
        Category::EmailValidation,
        Category::Arithmetic(ArithmeticOp::Divide),
        Category::Arithmetic(ArithmeticOp::Multiply),
        Category::Arithmetic(ArithmeticOp::Subtract),
        Category::Arithmetic(ArithmeticOp::Add),
        Category::Geometry,
        Category::EntityLifecycle,
        Category::Generic,
    ];

    /// Stable identifier used in configuration files and reports.
    pub fn id(&self) -> &'static str {
        match self {
            Self::EmailValidation => "email_validation",
            Self::Arithmetic(ArithmeticOp::Add) => "arithmetic.add",
            Self::Arithmetic(ArithmeticOp::Subtract) => "arithmetic.subtract",
            Self::Arithmetic(ArithmeticOp::Multiply) => "arithmetic.multiply",
            Self::Arithmetic(ArithmeticOp::Divide) => "arithmetic.divide",
            Self::Geometry => "geometry",
            Self::EntityLifecycle => "entity_lifecycle",
            Self::Generic => "generic",
        }
    }

    pub fn is_generic(&self) -> bool {
        *self == Self::Generic
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .find(|c| c.id() == wanted)
            .copied()
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.id().to_string()
    }
}

/// Association between a signature and its selected category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Qualified symbol name (`Class.method` for methods).
    pub symbol: String,
    pub category: Category,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    /// The keyword (or class suffix) that triggered the match.
    pub keyword: Option<String>,
}

impl PatternMatch {
    pub fn generic(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            category: Category::Generic,
            confidence: 0.0,
            keyword: None,
        }
    }
}

/// A scored candidate before threshold and tie-break are applied.
#[derive(Clone, Debug)]
struct Candidate {
    category: Category,
    confidence: f64,
    keyword: String,
    order: usize,
}

impl Candidate {
    /// Higher confidence first, then longer keyword, then table order.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .confidence
            .total_cmp(&self.confidence)
            .then_with(|| other.keyword.len().cmp(&self.keyword.len()))
            .then_with(|| self.order.cmp(&other.order))
    }
}

pub struct Classifier {
    rules: RuleSet,
    threshold: f64,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            rules: RuleSet::with_extra_keywords(&config.keywords),
            threshold: config.threshold,
        }
    }

    /// Classify one signature.
    ///
    /// Returns `None` when no rule matches at all, a `Generic` match when the
    /// best candidate scores below the threshold, and the winning category
    /// otherwise.
    pub fn classify(&self, signature: &Signature) -> Option<PatternMatch> {
        let mut candidates = self.candidates(signature);
        if candidates.is_empty() {
            return None;
        }

        candidates.sort_by(Candidate::rank);
        let best = &candidates[0];

        if let Some(runner_up) = candidates.get(1) {
            if runner_up.confidence == best.confidence {
                debug!(
                    symbol = %signature.qualified_name(),
                    chosen = %best.category,
                    other = %runner_up.category,
                    confidence = best.confidence,
                    "classification ambiguity resolved by tie-break"
                );
            }
        }

        if best.confidence < self.threshold {
            debug!(
                symbol = %signature.qualified_name(),
                candidate = %best.category,
                confidence = best.confidence,
                threshold = self.threshold,
                "best candidate below threshold, falling back to generic"
            );
            return Some(PatternMatch {
                symbol: signature.qualified_name(),
                category: Category::Generic,
                confidence: best.confidence,
                keyword: None,
            });
        }

        Some(PatternMatch {
            symbol: signature.qualified_name(),
            category: best.category,
            confidence: best.confidence,
            keyword: Some(best.keyword.clone()),
        })
    }

    fn candidates(&self, signature: &Signature) -> Vec<Candidate> {
        if signature.is_class() {
            return self
                .rules
                .score_entity(signature)
                .map(|(confidence, keyword)| Candidate {
                    category: Category::EntityLifecycle,
                    confidence,
                    keyword,
                    order: self.rules.keyword_rules().len(),
                })
                .into_iter()
                .collect();
        }

        self.rules
            .keyword_rules()
            .iter()
            .enumerate()
            .filter_map(|(order, rule)| {
                rule.score(signature).map(|(confidence, keyword)| Candidate {
                    category: rule.category,
                    confidence,
                    keyword,
                    order,
                })
            })
            .collect()
    }
}
