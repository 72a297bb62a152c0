//! Fallback stubs for symbols without a category template.

use crate::core::{AssertionCase, Signature};

/// Exactly one positive case: instantiability for classes whose
/// constructor takes no required arguments, callability otherwise.
pub fn fallback_cases(signature: &Signature) -> Vec<AssertionCase> {
    if signature.is_class() && signature.accepts_positional(0) {
        vec![AssertionCase::instantiable()]
    } else {
        vec![AssertionCase::callable()]
    }
}
