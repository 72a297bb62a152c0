//! Static case banks, one per category.
//!
//! Every expected value lives here; nothing is derived from the code under
//! test. Entries are gated on the exception kinds the target raises.

use crate::core::{CaseKind, Literal};
use crate::patterns::{is_type_error_like, is_value_error_like, ArithmeticOp, Category};

/// When a bank entry applies to a signature, judged on its raises.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Include {
    Always,
    WhenAnyRaise,
    WhenTypeErrorLike,
    WhenValueErrorLike,
    UnlessValueErrorLike,
}

impl Include {
    pub fn applies(self, raises: &[String]) -> bool {
        let any = |pred: fn(&str) -> bool| raises.iter().any(|r| pred(r));
        match self {
            Self::Always => true,
            Self::WhenAnyRaise => !raises.is_empty(),
            Self::WhenTypeErrorLike => any(is_type_error_like),
            Self::WhenValueErrorLike => any(is_value_error_like),
            Self::UnlessValueErrorLike => !any(is_value_error_like),
        }
    }
}

/// Exception kind an error entry expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaiseKind {
    /// First raised TypeError-like kind, else `TypeError`.
    TypeErrorLike,
    /// First raised ValueError-like kind, else `ValueError`.
    ValueErrorLike,
    /// First raised ValueError-like kind, else `ZeroDivisionError`.
    ZeroDivision,
    /// Preferably TypeError-like, else whatever the target raises first.
    Guard,
}

impl RaiseKind {
    pub fn resolve(self, raises: &[String]) -> String {
        let first = |pred: fn(&str) -> bool| raises.iter().find(|r| pred(r)).cloned();
        match self {
            Self::TypeErrorLike => {
                first(is_type_error_like).unwrap_or_else(|| "TypeError".to_string())
            }
            Self::ValueErrorLike => {
                first(is_value_error_like).unwrap_or_else(|| "ValueError".to_string())
            }
            Self::ZeroDivision => {
                first(is_value_error_like).unwrap_or_else(|| "ZeroDivisionError".to_string())
            }
            Self::Guard => first(is_type_error_like)
                .or_else(|| raises.first().cloned())
                .unwrap_or_else(|| "TypeError".to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expect {
    Value(Literal),
    Raises(RaiseKind),
    Instance,
}

/// One entry of a case bank.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseTemplate {
    pub kind: CaseKind,
    pub topic: &'static str,
    pub inputs: &'static [Literal],
    pub expect: Expect,
    pub include: Include,
    pub note: Option<&'static str>,
}

macro_rules! value {
    ($kind:ident, $topic:literal, [$($input:expr),*], $expected:expr) => {
        value!($kind, $topic, [$($input),*], $expected, Include::Always, None)
    };
    ($kind:ident, $topic:literal, [$($input:expr),*], $expected:expr, note = $note:literal) => {
        value!($kind, $topic, [$($input),*], $expected, Include::Always, Some($note))
    };
    ($kind:ident, $topic:literal, [$($input:expr),*], $expected:expr, $include:expr, $note:expr) => {
        CaseTemplate {
            kind: CaseKind::$kind,
            topic: $topic,
            inputs: &[$($input),*],
            expect: Expect::Value($expected),
            include: $include,
            note: $note,
        }
    };
}

macro_rules! raises {
    ($topic:literal, [$($input:expr),*], $raise:ident, $include:ident) => {
        CaseTemplate {
            kind: CaseKind::Error,
            topic: $topic,
            inputs: &[$($input),*],
            expect: Expect::Raises(RaiseKind::$raise),
            include: Include::$include,
            note: None,
        }
    };
}

use Literal::{Float, Int};

const VALID: Literal = Literal::Bool(true);
const INVALID: Literal = Literal::Bool(false);

pub const EMAIL_VALIDATION: &[CaseTemplate] = &[
    value!(Positive, "valid_address", [Literal::str("user@example.com")], VALID),
    value!(Positive, "valid_address", [Literal::str("a@b.co")], VALID),
    value!(Positive, "valid_address", [Literal::str("first.last@example.org")], VALID),
    value!(Positive, "valid_address", [Literal::str("user+tag@mail.example.co.uk")], VALID),
    value!(Negative, "invalid_address", [Literal::str("userexample.com")], INVALID, note = "missing @"),
    value!(Negative, "invalid_address", [Literal::str("user@")], INVALID, note = "missing domain"),
    value!(Negative, "invalid_address", [Literal::str("user@example")], INVALID, note = "missing TLD"),
    value!(Negative, "invalid_address", [Literal::str("@example.com")], INVALID, note = "missing local part"),
    value!(Negative, "invalid_address", [Literal::str("")], INVALID, note = "empty string"),
    raises!("invalid_type", [Literal::None], Guard, WhenAnyRaise),
    raises!("invalid_type", [Int(12345)], Guard, WhenAnyRaise),
    raises!("invalid_type", [Literal::EmptyList], Guard, WhenAnyRaise),
];

pub const ADD: &[CaseTemplate] = &[
    value!(Positive, "integers", [Int(2), Int(3)], Int(5)),
    value!(Positive, "integers", [Int(10), Int(20)], Int(30)),
    value!(Positive, "integers", [Int(-1), Int(1)], Int(0)),
    value!(Positive, "floats", [Float(2.5), Float(0.5)], Float(3.0)),
    value!(Positive, "floats", [Float(0.1), Float(0.2)], Float(0.3)),
    value!(Edge, "zero_operand", [Int(0), Int(5)], Int(5)),
    value!(Edge, "zero_operand", [Int(5), Int(0)], Int(5)),
    value!(Edge, "negative_operands", [Int(-2), Int(-3)], Int(-5)),
    raises!("non_numeric", [Literal::str("a"), Int(1)], TypeErrorLike, WhenTypeErrorLike),
    raises!("non_numeric", [Int(1), Literal::None], TypeErrorLike, WhenTypeErrorLike),
];

pub const SUBTRACT: &[CaseTemplate] = &[
    value!(Positive, "integers", [Int(5), Int(3)], Int(2)),
    value!(Positive, "integers", [Int(3), Int(5)], Int(-2)),
    value!(Positive, "integers", [Int(10), Int(10)], Int(0)),
    value!(Positive, "floats", [Float(5.5), Float(2.0)], Float(3.5)),
    value!(Edge, "zero_operand", [Int(5), Int(0)], Int(5)),
    value!(Edge, "zero_operand", [Int(0), Int(5)], Int(-5)),
    value!(Edge, "negative_operands", [Int(-2), Int(-3)], Int(1)),
    raises!("non_numeric", [Literal::str("a"), Int(1)], TypeErrorLike, WhenTypeErrorLike),
    raises!("non_numeric", [Int(1), Literal::None], TypeErrorLike, WhenTypeErrorLike),
];

pub const MULTIPLY: &[CaseTemplate] = &[
    value!(Positive, "integers", [Int(4), Int(5)], Int(20)),
    value!(Positive, "integers", [Int(-2), Int(3)], Int(-6)),
    value!(Positive, "integers", [Int(1), Int(7)], Int(7)),
    value!(Positive, "floats", [Float(2.5), Float(4.0)], Float(10.0)),
    value!(Edge, "zero_operand", [Int(0), Int(5)], Int(0)),
    value!(Edge, "zero_operand", [Int(7), Int(0)], Int(0)),
    value!(Edge, "negative_operands", [Int(-2), Int(-3)], Int(6)),
    raises!("non_numeric", [Literal::None, Int(2)], TypeErrorLike, WhenTypeErrorLike),
    raises!("non_numeric", [Literal::EmptyDict, Int(2)], TypeErrorLike, WhenTypeErrorLike),
];

pub const DIVIDE: &[CaseTemplate] = &[
    value!(Positive, "integers", [Int(10), Int(2)], Float(5.0)),
    value!(Positive, "integers", [Int(9), Int(3)], Float(3.0)),
    value!(Positive, "integers", [Int(7), Int(2)], Float(3.5)),
    value!(Positive, "floats", [Float(7.5), Float(2.5)], Float(3.0)),
    value!(Edge, "zero_dividend", [Int(0), Int(5)], Float(0.0)),
    value!(Edge, "negative_operands", [Int(-10), Int(2)], Float(-5.0)),
    raises!("division_by_zero", [Int(5), Int(0)], ZeroDivision, Always),
    raises!("non_numeric", [Literal::str("a"), Int(1)], TypeErrorLike, WhenTypeErrorLike),
    raises!("non_numeric", [Int(1), Literal::None], TypeErrorLike, WhenTypeErrorLike),
];

pub const GEOMETRY: &[CaseTemplate] = &[
    value!(Positive, "known_dimensions", [Int(5), Int(3)], Int(15)),
    value!(Positive, "known_dimensions", [Int(10), Int(2)], Int(20)),
    value!(Positive, "known_dimensions", [Int(1), Int(1)], Int(1)),
    value!(Positive, "fractional_dimensions", [Float(2.5), Float(4.0)], Float(10.0)),
    value!(Edge, "zero_dimension", [Int(0), Int(5)], Int(0)),
    value!(Edge, "zero_dimension", [Int(5), Int(0)], Int(0)),
    value!(Edge, "negative_dimension", [Int(-5), Int(3)], Int(-15), Include::UnlessValueErrorLike, None),
    value!(Edge, "negative_dimension", [Int(5), Int(-3)], Int(-15), Include::UnlessValueErrorLike, None),
    value!(Edge, "negative_dimension", [Int(-2), Int(-4)], Int(8), Include::UnlessValueErrorLike, None),
    raises!("negative_dimension", [Int(-5), Int(3)], ValueErrorLike, WhenValueErrorLike),
    raises!("negative_dimension", [Int(5), Int(-3)], ValueErrorLike, WhenValueErrorLike),
    raises!("negative_dimension", [Int(-2), Int(-4)], ValueErrorLike, WhenValueErrorLike),
    raises!("non_numeric", [Literal::str("5"), Int(3)], TypeErrorLike, WhenTypeErrorLike),
    raises!("non_numeric", [Int(5), Literal::None], TypeErrorLike, WhenTypeErrorLike),
];

pub const ENTITY_LIFECYCLE: &[CaseTemplate] = &[CaseTemplate {
    kind: CaseKind::Positive,
    topic: "instantiation",
    inputs: &[],
    expect: Expect::Instance,
    include: Include::Always,
    note: None,
}];

/// Bank for a category; `Generic` has none and goes to the fallback.
pub fn bank_for(category: Category) -> Option<&'static [CaseTemplate]> {
    match category {
        Category::EmailValidation => Some(EMAIL_VALIDATION),
        Category::Arithmetic(ArithmeticOp::Add) => Some(ADD),
        Category::Arithmetic(ArithmeticOp::Subtract) => Some(SUBTRACT),
        Category::Arithmetic(ArithmeticOp::Multiply) => Some(MULTIPLY),
        Category::Arithmetic(ArithmeticOp::Divide) => Some(DIVIDE),
        Category::Geometry => Some(GEOMETRY),
        Category::EntityLifecycle => Some(ENTITY_LIFECYCLE),
        Category::Generic => None,
    }
}
