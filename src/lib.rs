//! Unit-test synthesis for Python sources.
//!
//! Parses Python source units, classifies each discovered function, method
//! and class against a fixed taxonomy, expands the match into literal test
//! cases, and emits one pytest module per unit.
//!
//! ```no_run
//! use testsynth::{synthesize_unit, SourceUnit, SynthConfig};
//!
//! let unit = SourceUnit::new("calc.py", "def add(a, b):\n    return a + b\n");
//! let module = synthesize_unit(&unit, &SynthConfig::default())?;
//! println!("{}", module.render());
//! # Ok::<(), testsynth::SynthError>(())
//! ```

pub mod analyzers;
pub mod common;
pub mod config;
pub mod core;
pub mod emitter;
pub mod io;
pub mod observability;
pub mod patterns;
pub mod pipeline;
pub mod templates;

// Re-export commonly used types
pub use crate::core::{
    AssertionCase, CaseKind, Expected, Language, Literal, Parameter, ParameterKind, Signature,
    SourceUnit, SymbolKind, SynthError,
};

pub use crate::analyzers::{
    analyze_unit, get_analyzer, Analyzer, AnalyzerRegistry, PythonAnalyzer,
};

pub use crate::patterns::{ArithmeticOp, Category, Classifier, PatternMatch};

pub use crate::emitter::{emit, render_verified, GeneratedModule, GeneratedTest};

pub use crate::config::{load_config, SynthConfig};

pub use crate::pipeline::{
    synthesize_batch, synthesize_unit, BatchReport, Synthesizer, UnitDiagnostic, UnitOutcome,
};

pub use crate::io::{
    collect_source_units, synthesize_directory, write_module, write_report, WrittenModules,
};
