//! Assertion synthesis from category templates.
//!
//! A classified signature is expanded into the ordered cases of its
//! category's bank ([`bank`]); unclassified and generic signatures get a
//! single existence check from [`fallback`].

pub mod bank;
pub mod fallback;

pub use bank::{bank_for, CaseTemplate, Expect, Include, RaiseKind};
pub use fallback::fallback_cases;

use crate::core::{AssertionCase, Expected, Signature};
use crate::patterns::PatternMatch;
use std::borrow::Cow;

/// Cases for a classified signature.
///
/// Generic matches have no bank and produce no cases here. Entries whose
/// positional inputs the signature cannot bind are left out.
pub fn synthesize(pattern: &PatternMatch, signature: &Signature) -> Vec<AssertionCase> {
    let Some(bank) = bank_for(pattern.category) else {
        return Vec::new();
    };

    bank.iter()
        .filter(|template| template.include.applies(&signature.raises))
        .filter(|template| signature.accepts_positional(template.inputs.len()))
        .map(|template| instantiate(template, signature))
        .collect()
}

/// Cases for any signature: the category bank when classified, otherwise
/// the fallback stub. A bank with no bindable entry also falls back.
pub fn cases_for(signature: &Signature, pattern: Option<&PatternMatch>) -> Vec<AssertionCase> {
    match pattern {
        Some(p) if !p.category.is_generic() => {
            let cases = synthesize(p, signature);
            if cases.is_empty() {
                fallback_cases(signature)
            } else {
                cases
            }
        }
        _ => fallback_cases(signature),
    }
}

fn instantiate(template: &CaseTemplate, signature: &Signature) -> AssertionCase {
    let expected = match &template.expect {
        Expect::Value(literal) => Expected::Value(literal.clone()),
        Expect::Raises(kind) => Expected::Raises(Cow::Owned(kind.resolve(&signature.raises))),
        Expect::Instance => Expected::Instance,
    };

    AssertionCase {
        kind: template.kind,
        topic: Cow::Borrowed(template.topic),
        inputs: template.inputs.to_vec(),
        expected,
        note: template.note.map(Cow::Borrowed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CaseKind, Literal, Parameter, ParameterKind};
    use crate::patterns::{ArithmeticOp, Category};

    fn matched(sig: &Signature, category: Category) -> PatternMatch {
        PatternMatch {
            symbol: sig.qualified_name(),
            category,
            confidence: 1.0,
            keyword: None,
        }
    }

    fn expand(sig: &Signature, category: Category) -> Vec<AssertionCase> {
        synthesize(&matched(sig, category), sig)
    }

    #[test]
    fn test_email_without_raises_has_no_type_cases() {
        let sig = Signature::function("validate_email").with_params(&["email"]);
        let cases = expand(&sig, Category::EmailValidation);
        assert!(cases.len() >= 8);
        assert!(!cases.iter().any(|c| c.is_error()));
        assert!(!cases.iter().any(|c| c.inputs == [Literal::None]));
    }

    #[test]
    fn test_email_with_raises_adds_error_cases() {
        let sig = Signature::function("validate_email")
            .with_params(&["email"])
            .with_raises(&["TypeError"]);
        let errors: Vec<_> = expand(&sig, Category::EmailValidation)
            .into_iter()
            .filter(|c| c.is_error())
            .collect();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].inputs, vec![Literal::None]);
        assert_eq!(errors[0].expected, Expected::Raises("TypeError".into()));
    }

    #[test]
    fn test_divide_zero_expectation_follows_raises() {
        let plain = Signature::function("divide").with_params(&["a", "b"]);
        let zero = |sig: &Signature| {
            expand(sig, Category::Arithmetic(ArithmeticOp::Divide))
                .into_iter()
                .find(|c| c.topic == "division_by_zero")
                .map(|c| c.expected)
        };
        assert_eq!(
            zero(&plain),
            Some(Expected::Raises("ZeroDivisionError".into()))
        );

        let guarded = plain.clone().with_raises(&["ValueError"]);
        assert_eq!(zero(&guarded), Some(Expected::Raises("ValueError".into())));
    }

    #[test]
    fn test_geometry_known_product() {
        let sig = Signature::function("calculate_area").with_params(&["length", "width"]);
        let cases = expand(&sig, Category::Geometry);
        let first = &cases[0];
        assert_eq!(first.kind, CaseKind::Positive);
        assert_eq!(first.inputs, vec![Literal::Int(5), Literal::Int(3)]);
        assert_eq!(first.expected, Expected::Value(Literal::Int(15)));
    }

    #[test]
    fn test_geometry_negative_dimensions_depend_on_value_error() {
        let plain = Signature::function("calculate_area").with_params(&["l", "w"]);
        let negatives = |sig: &Signature| -> Vec<CaseKind> {
            expand(sig, Category::Geometry)
                .into_iter()
                .filter(|c| c.topic == "negative_dimension")
                .map(|c| c.kind)
                .collect()
        };
        assert_eq!(negatives(&plain), vec![CaseKind::Edge; 3]);

        let guarded = plain.clone().with_raises(&["ValueError"]);
        assert_eq!(negatives(&guarded), vec![CaseKind::Error; 3]);

        let both_negative = expand(&plain, Category::Geometry)
            .into_iter()
            .find(|c| c.inputs == [Literal::Int(-2), Literal::Int(-4)])
            .map(|c| c.expected);
        assert_eq!(both_negative, Some(Expected::Value(Literal::Int(8))));
    }

    #[test]
    fn test_geometry_type_guard_adds_non_numeric_cases() {
        let sig = Signature::function("calculate_area")
            .with_params(&["l", "w"])
            .with_raises(&["TypeError"]);
        let non_numeric = expand(&sig, Category::Geometry)
            .into_iter()
            .filter(|c| c.topic == "non_numeric")
            .count();
        assert_eq!(non_numeric, 2);
    }

    #[test]
    fn test_entity_lifecycle_is_instantiation_only() {
        let sig = Signature::class("UserAccount");
        let cases = expand(&sig, Category::EntityLifecycle);
        assert_eq!(cases, vec![AssertionCase::instantiable()]);
    }

    #[test]
    fn test_required_keyword_only_falls_back() {
        let mut sig = Signature::function("calculate_area").with_params(&["width"]);
        sig.parameters.push(Parameter {
            kind: ParameterKind::KeywordOnly,
            ..Parameter::new("height")
        });
        let cases = cases_for(&sig, Some(&matched(&sig, Category::Geometry)));
        assert_eq!(cases, vec![AssertionCase::callable()]);
    }

    #[test]
    fn test_entity_with_required_init_args_falls_back() {
        let sig = Signature::class("UserAccount").with_params(&["store"]);
        let cases = cases_for(&sig, Some(&matched(&sig, Category::EntityLifecycle)));
        assert_eq!(cases, vec![AssertionCase::callable()]);
    }

    #[test]
    fn test_generic_falls_back() {
        let sig = Signature::function("process_file").with_params(&["path"]);
        let cases = cases_for(&sig, Some(&matched(&sig, Category::Generic)));
        assert_eq!(cases, vec![AssertionCase::callable()]);
        assert_eq!(cases_for(&sig, None), vec![AssertionCase::callable()]);
    }
}
