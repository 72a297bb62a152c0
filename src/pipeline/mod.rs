//! Synthesis pipeline driver.
//!
//! Runs analysis, classification, case synthesis and emission for one
//! source unit, and fans out over many units in [`batch`].

pub mod batch;

pub use batch::{
    configure_thread_pool, synthesize_batch, BatchReport, BatchSummary, UnitDiagnostic,
    UnitOutcome,
};

use crate::analyzers::{analyze_unit, AnalyzerRegistry};
use crate::config::SynthConfig;
use crate::core::{Result, Signature, SourceUnit, SynthError};
use crate::emitter::{emit, render_verified, GeneratedModule, SymbolCases};
use crate::observability::{
    get_current_context, set_current_symbol, set_current_unit, set_stage, SynthesisContext,
    SynthesisStage,
};
use crate::patterns::{Category, Classifier};
use crate::templates::cases_for;
use tracing::{debug, info_span};

/// A unit failure together with where in the pipeline it happened.
type Traced<T> = std::result::Result<T, (SynthError, SynthesisContext)>;

/// Attach the current thread's synthesis context to a failure.
///
/// Must run while the stage and symbol guards are still alive.
fn traced<T>(result: Result<T>) -> Traced<T> {
    result.map_err(|error| (error, get_current_context()))
}

/// Immutable pipeline state shared by every unit of a run.
pub struct Synthesizer {
    analyzers: AnalyzerRegistry,
    classifier: Classifier,
    verify_output: bool,
}

impl Synthesizer {
    pub fn new(config: &SynthConfig) -> Self {
        Self {
            analyzers: AnalyzerRegistry::new(&config.analyzer),
            classifier: Classifier::new(&config.classifier),
            verify_output: config.emitter.verify_output,
        }
    }

    /// Produce the generated module for one unit.
    ///
    /// Stages run strictly in order; the first failing stage decides the
    /// error. The source is parsed, never executed.
    pub fn synthesize(&self, unit: &SourceUnit) -> Result<GeneratedModule> {
        self.run(unit).map_err(|(error, _)| error)
    }

    /// Like [`Self::synthesize`], but a failure becomes a diagnostic naming
    /// the stage and symbol that were active when it happened.
    pub fn diagnose(&self, unit: &SourceUnit) -> std::result::Result<GeneratedModule, UnitDiagnostic> {
        self.run(unit).map_err(|(error, context)| UnitDiagnostic {
            unit: unit.name.clone(),
            stage: context.stage,
            symbol: context.symbol,
            error,
        })
    }

    fn run(&self, unit: &SourceUnit) -> Traced<GeneratedModule> {
        let span = info_span!("synthesize_unit", unit = %unit.name, bytes = unit.source.len());
        let _span = span.enter();
        let _unit = set_current_unit(unit.name.as_str());

        let signatures = {
            let _stage = set_stage(SynthesisStage::Analysis);
            let analyzer = traced(self.analyzers.for_unit(unit))?;
            traced(analyze_unit(unit, analyzer))?
        };
        debug!(symbols = signatures.len(), "Extracted signatures");

        let symbols = signatures
            .into_iter()
            .map(|signature| self.symbol_cases(unit, signature))
            .collect::<Traced<Vec<SymbolCases>>>()?;

        let module = {
            let _stage = set_stage(SynthesisStage::Emission);
            traced(emit(unit, &symbols))?
        };

        if self.verify_output {
            let _stage = set_stage(SynthesisStage::Verification);
            traced(render_verified(&module))?;
        }

        debug!(
            tests = module.tests.len(),
            cases = module.case_count(),
            "Generated module"
        );
        Ok(module)
    }

    fn symbol_cases(&self, unit: &SourceUnit, signature: Signature) -> Traced<SymbolCases> {
        let _symbol = set_current_symbol(signature.qualified_name());

        let pattern = {
            let _stage = set_stage(SynthesisStage::Classification);
            self.classifier.classify(&signature)
        };
        let category = pattern
            .as_ref()
            .map(|p| p.category)
            .unwrap_or(Category::Generic);

        let _stage = set_stage(SynthesisStage::Synthesis);
        let cases = cases_for(&signature, pattern.as_ref());
        if cases.is_empty() {
            return traced(Err(SynthError::empty_coverage(
                &unit.name,
                signature.qualified_name(),
            )));
        }

        Ok(SymbolCases {
            signature,
            category,
            cases,
        })
    }
}

/// Run the whole pipeline for a single unit.
pub fn synthesize_unit(unit: &SourceUnit, config: &SynthConfig) -> Result<GeneratedModule> {
    Synthesizer::new(config).synthesize(unit)
}
