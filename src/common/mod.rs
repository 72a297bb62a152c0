//! Common utilities shared across the testsynth codebase.
//!
//! Identifier handling used by the classifier (keyword tokens), the emitter
//! (test and class names) and source units (import paths).

pub mod text;

pub use text::{
    capitalize_first, is_identifier, is_module_path, pascal_case, snake_case, split_identifier,
    PYTHON_KEYWORDS,
};
