//! Keyword rule table for the classifier.
//!
//! Each function-level category owns one [`KeywordRule`]: weighted name
//! keywords, qualifier words that strengthen a match, the arity the
//! category expects, and the guard (raised exception kinds) typical for
//! it. Classes are scored separately against the entity lifecycle rule.

use super::{ArithmeticOp, Category};
use crate::common::split_identifier;
use crate::config::KeywordConfig;
use crate::core::Signature;
use std::borrow::Cow;

/// Each satisfied structural signal (qualifier, arity, guard) adds this much.
const SIGNAL_BONUS: f64 = 0.25;
const SIGNAL_COUNT: f64 = 3.0;

/// Class-name suffixes that mark a stateful entity holder.
pub const ENTITY_CLASS_SUFFIXES: &[&str] = &[
    "manager",
    "account",
    "repository",
    "service",
    "store",
    "registry",
];

/// Lifecycle verb groups: create, read, delete.
const LIFECYCLE_VERBS: [&[&str]; 3] = [
    &["create", "add", "register", "insert"],
    &["get", "find", "fetch", "read", "load", "lookup"],
    &["delete", "remove", "destroy", "drop"],
];

/// `TypeError` and its project-specific subclasses by naming convention.
pub fn is_type_error_like(kind: &str) -> bool {
    kind.ends_with("TypeError")
}

pub fn is_value_error_like(kind: &str) -> bool {
    kind.ends_with("ValueError")
}

/// Which raised exception kinds count as the category's guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardKind {
    AnyRaise,
    TypeErrorLike,
    TypeOrValueErrorLike,
}

impl GuardKind {
    /// An isinstance check that raises counts as a type guard whatever
    /// exception kind it raises.
    fn satisfied_by(self, signature: &Signature) -> bool {
        match self {
            Self::AnyRaise => !signature.raises.is_empty(),
            Self::TypeErrorLike => {
                signature.raises_kind(is_type_error_like) || signature.has_type_guard()
            }
            Self::TypeOrValueErrorLike => {
                signature.raises_kind(|k| is_type_error_like(k) || is_value_error_like(k))
                    || signature.has_type_guard()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Keyword {
    pub text: Cow<'static, str>,
    pub weight: f64,
    tokens: Vec<String>,
}

impl Keyword {
    pub fn new(text: impl Into<Cow<'static, str>>, weight: f64) -> Self {
        let text = text.into();
        let tokens = split_identifier(&text);
        Self {
            text,
            weight,
            tokens,
        }
    }

    /// Whole-token match, allowing a plural on the last keyword token.
    fn matches(&self, name_tokens: &[String]) -> bool {
        let n = self.tokens.len();
        if n == 0 || name_tokens.len() < n {
            return false;
        }
        name_tokens.windows(n).any(|window| {
            let (last, init) = match window.split_last() {
                Some(parts) => parts,
                None => return false,
            };
            init.iter().zip(&self.tokens).all(|(a, b)| a == b)
                && is_token_or_plural(last, &self.tokens[n - 1])
        })
    }
}

fn is_token_or_plural(token: &str, keyword: &str) -> bool {
    token == keyword
        || token
            .strip_prefix(keyword)
            .is_some_and(|rest| rest == "s" || rest == "es")
}

#[derive(Clone, Debug)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: Vec<Keyword>,
    pub qualifiers: &'static [&'static str],
    pub arity: usize,
    pub guard: GuardKind,
}

impl KeywordRule {
    fn new(
        category: Category,
        keywords: &[(&'static str, f64)],
        qualifiers: &'static [&'static str],
        arity: usize,
        guard: GuardKind,
    ) -> Self {
        Self {
            category,
            keywords: keywords
                .iter()
                .map(|(text, weight)| Keyword::new(*text, *weight))
                .collect(),
            qualifiers,
            arity,
            guard,
        }
    }

    fn max_weight(&self) -> f64 {
        self.keywords
            .iter()
            .map(|k| k.weight)
            .fold(0.0, f64::max)
    }

    /// Confidence and matched keyword, or `None` when no keyword matches.
    pub fn score(&self, signature: &Signature) -> Option<(f64, String)> {
        let tokens = split_identifier(&signature.name);

        let best = self
            .keywords
            .iter()
            .filter(|k| k.matches(&tokens))
            .max_by(|a, b| {
                a.weight
                    .total_cmp(&b.weight)
                    .then_with(|| a.text.len().cmp(&b.text.len()))
            })?;

        let signals = [
            self.qualifiers.iter().any(|q| tokens.iter().any(|t| t == q)),
            signature.arity() == self.arity,
            self.guard.satisfied_by(signature),
        ];
        let satisfied = signals.iter().filter(|s| **s).count() as f64;

        let score = best.weight + satisfied * SIGNAL_BONUS;
        let max = self.max_weight() + SIGNAL_COUNT * SIGNAL_BONUS;
        Some(((score / max).min(1.0), best.text.to_string()))
    }
}

/// The ordered rule table; order is the final tie-breaker.
#[derive(Clone, Debug)]
pub struct RuleSet {
    rules: Vec<KeywordRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        const ARITH_QUALIFIERS: &[&str] = &["calculate", "compute", "calc"];

        let rules = vec![
            KeywordRule::new(
                Category::EmailValidation,
                &[("email", 0.8), ("e_mail", 0.8), ("mail", 0.5)],
                &["validate", "valid", "check", "verify", "is"],
                1,
                GuardKind::AnyRaise,
            ),
            KeywordRule::new(
                Category::Arithmetic(ArithmeticOp::Divide),
                &[
                    ("divide", 0.8),
                    ("quotient", 0.7),
                    ("division", 0.6),
                    ("div", 0.6),
                ],
                ARITH_QUALIFIERS,
                2,
                GuardKind::TypeErrorLike,
            ),
            KeywordRule::new(
                Category::Arithmetic(ArithmeticOp::Multiply),
                &[
                    ("multiply", 0.8),
                    ("mul", 0.6),
                    ("product", 0.5),
                    ("times", 0.5),
                ],
                ARITH_QUALIFIERS,
                2,
                GuardKind::TypeErrorLike,
            ),
            KeywordRule::new(
                Category::Arithmetic(ArithmeticOp::Subtract),
                &[
                    ("subtract", 0.8),
                    ("minus", 0.7),
                    ("difference", 0.6),
                    ("sub", 0.5),
                ],
                ARITH_QUALIFIERS,
                2,
                GuardKind::TypeErrorLike,
            ),
            KeywordRule::new(
                Category::Arithmetic(ArithmeticOp::Add),
                &[("sum", 0.8), ("add", 0.8), ("plus", 0.7), ("total", 0.5)],
                ARITH_QUALIFIERS,
                2,
                GuardKind::TypeErrorLike,
            ),
            KeywordRule::new(
                Category::Geometry,
                &[
                    ("area", 0.8),
                    ("rectangle", 0.6),
                    ("width", 0.5),
                    ("height", 0.5),
                ],
                &["calculate", "compute", "calc", "get"],
                2,
                GuardKind::TypeOrValueErrorLike,
            ),
        ];

        Self { rules }
    }
}

impl RuleSet {
    /// Default table extended with configured keywords.
    ///
    /// Keywords targeting categories without a keyword rule are ignored;
    /// config validation rejects them before this point.
    pub fn with_extra_keywords(extra: &[KeywordConfig]) -> Self {
        let mut set = Self::default();
        for kw in extra {
            if let Some(rule) = set.rules.iter_mut().find(|r| r.category == kw.category) {
                rule.keywords
                    .push(Keyword::new(kw.keyword.to_lowercase(), kw.weight));
            }
        }
        set
    }

    pub fn keyword_rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Entity lifecycle score for a class: a recognised name suffix counts
    /// as much as the full set of lifecycle verb groups among its methods.
    pub fn score_entity(&self, signature: &Signature) -> Option<(f64, String)> {
        let name_tokens = split_identifier(&signature.name);
        let suffix = name_tokens
            .last()
            .filter(|t| ENTITY_CLASS_SUFFIXES.contains(&t.as_str()))
            .cloned();

        let method_verbs: Vec<String> = signature
            .methods
            .iter()
            .filter_map(|m| split_identifier(m).into_iter().next())
            .collect();

        let matched_groups: Vec<&str> = LIFECYCLE_VERBS
            .iter()
            .filter_map(|group| {
                method_verbs
                    .iter()
                    .find_map(|v| group.iter().find(|g| **g == v.as_str()).copied())
            })
            .collect();

        if suffix.is_none() && matched_groups.is_empty() {
            return None;
        }

        let suffix_score = if suffix.is_some() { 1.0 } else { 0.0 };
        let verb_score = matched_groups.len() as f64 / LIFECYCLE_VERBS.len() as f64;
        let keyword = suffix.unwrap_or_else(|| matched_groups[0].to_string());

        Some(((suffix_score + verb_score) / 2.0, keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(name: &str) -> Vec<String> {
        split_identifier(name)
    }

    #[test]
    fn test_keyword_matches_plural() {
        let kw = Keyword::new("email", 0.8);
        assert!(kw.matches(&tokens("validate_emails")));
        assert!(kw.matches(&tokens("validateEmail")));
        assert!(!kw.matches(&tokens("emailer")));
    }

    #[test]
    fn test_multi_token_keyword() {
        let kw = Keyword::new("e_mail", 0.8);
        assert!(kw.matches(&tokens("check_e_mail")));
        assert!(kw.matches(&tokens("is_valid_e-mail")));
        assert!(!kw.matches(&tokens("mail_e")));
    }

    #[test]
    fn test_error_kind_families() {
        assert!(is_type_error_like("TypeError"));
        assert!(is_type_error_like("InputTypeError"));
        assert!(!is_type_error_like("ValueError"));
        assert!(is_value_error_like("ValueError"));
        assert!(!is_value_error_like("KeyError"));
    }

    #[test]
    fn test_rule_order_is_stable() {
        let set = RuleSet::default();
        let order: Vec<&str> = set.keyword_rules().iter().map(|r| r.category.id()).collect();
        assert_eq!(
            order,
            vec![
                "email_validation",
                "arithmetic.divide",
                "arithmetic.multiply",
                "arithmetic.subtract",
                "arithmetic.add",
                "geometry"
            ]
        );
    }

    #[test]
    fn test_score_counts_structural_signals() {
        let set = RuleSet::default();
        let geometry = &set.keyword_rules()[5];

        let bare = Signature::function("area").with_params(&["w"]);
        let (c, kw) = geometry.score(&bare).unwrap();
        assert_eq!(kw, "area");
        assert!((c - 0.8 / 1.55).abs() < 1e-12);

        let full = Signature::function("compute_area")
            .with_params(&["w", "h"])
            .with_raises(&["ValueError"]);
        assert_eq!(geometry.score(&full).unwrap().0, 1.0);
    }

    #[test]
    fn test_isinstance_guard_satisfies_type_guard() {
        let raising = Signature::function("add").with_raises(&["ArgumentError"]);
        assert!(!GuardKind::TypeErrorLike.satisfied_by(&raising));

        let mut guarded = raising.clone();
        guarded.has_isinstance_guard = true;
        assert!(GuardKind::TypeErrorLike.satisfied_by(&guarded));
        assert!(GuardKind::TypeOrValueErrorLike.satisfied_by(&guarded));

        // a check that only returns early guards nothing
        let mut silent = Signature::function("add");
        silent.has_isinstance_guard = true;
        assert!(!GuardKind::TypeErrorLike.satisfied_by(&silent));
    }

    #[test]
    fn test_isinstance_guard_raises_confidence() {
        let set = RuleSet::default();
        let add = &set.keyword_rules()[4];

        let plain = Signature::function("add_values")
            .with_params(&["a", "b"])
            .with_raises(&["ArgumentError"]);
        let mut guarded = plain.clone();
        guarded.has_isinstance_guard = true;

        let (before, _) = add.score(&plain).unwrap();
        let (after, _) = add.score(&guarded).unwrap();
        assert!((after - before - SIGNAL_BONUS / 1.55).abs() < 1e-12);
    }

    #[test]
    fn test_entity_partial_score() {
        let set = RuleSet::default();
        let sig = Signature::class("OrderStore").with_methods(&["get_order"]);
        let (c, kw) = set.score_entity(&sig).unwrap();
        assert_eq!(kw, "store");
        assert!((c - (1.0 + 1.0 / 3.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_entity_without_signals() {
        let set = RuleSet::default();
        let sig = Signature::class("Point").with_methods(&["norm"]);
        assert!(set.score_entity(&sig).is_none());
    }
}
