//! Deterministic test-function naming.

use crate::common::snake_case;
use crate::core::{CaseKind, Signature};
use std::collections::HashSet;

/// Name fragment identifying a symbol inside test names.
///
/// Classes use their snake_case name, methods `<class>_<method>`.
pub fn symbol_slug(signature: &Signature) -> String {
    let slug = match &signature.owning_class {
        Some(class) => format!("{}_{}", snake_case(class), snake_case(&signature.name)),
        None => snake_case(&signature.name),
    };
    let slug = slug.trim_matches('_').to_string();
    if slug.is_empty() {
        "symbol".to_string()
    } else {
        slug
    }
}

pub fn base_test_name(signature: &Signature, kind: CaseKind, topic: &str) -> String {
    format!("test_{}_{}_{}", symbol_slug(signature), kind, snake_case(topic))
}

/// `base` unless the module imports a name equal to it, then
/// `<base>Generated`, `<base>Generated2`, ... for the first free one.
pub fn free_class_name(base: String, imported: &[&str]) -> String {
    if !imported.contains(&base.as_str()) {
        return base;
    }

    let stem = format!("{}Generated", base);
    std::iter::once(stem.clone())
        .chain((2usize..).map(|n| format!("{}{}", stem, n)))
        .find(|candidate| !imported.contains(&candidate.as_str()))
        .unwrap_or(stem)
}

/// Hands out unique names within one module.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `base`, or `base_2`, `base_3`, ... for the first unused suffix.
    pub fn allocate(&mut self, base: String) -> String {
        if self.used.insert(base.clone()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let candidate = format!("{}_{}", base, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
