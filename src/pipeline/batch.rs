//! Batch synthesis over many source units.
//!
//! Units are independent rayon tasks sharing only the immutable
//! [`Synthesizer`]. A failing unit becomes a diagnostic and never aborts
//! the batch; outcomes are reported in input order.

use super::Synthesizer;
use crate::config::{ParallelConfig, SynthConfig};
use crate::core::{SourceUnit, SynthError};
use crate::emitter::GeneratedModule;
use crate::observability::{BatchProgress, SynthesisStage};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Rayon thread stack size (8MB for deeply nested syntax trees)
const RAYON_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Why a unit produced no module, and where the pipeline was when it failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDiagnostic {
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<SynthesisStage>,
    /// Qualified name of the symbol being processed, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub error: SynthError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnitOutcome {
    Generated(GeneratedModule),
    Failed(UnitDiagnostic),
}

impl UnitOutcome {
    pub fn unit_name(&self) -> &str {
        match self {
            Self::Generated(module) => &module.unit_name,
            Self::Failed(diagnostic) => &diagnostic.unit,
        }
    }

    pub fn module(&self) -> Option<&GeneratedModule> {
        match self {
            Self::Generated(module) => Some(module),
            Self::Failed(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&UnitDiagnostic> {
        match self {
            Self::Generated(_) => None,
            Self::Failed(diagnostic) => Some(diagnostic),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub units: usize,
    pub generated: usize,
    pub failed: usize,
    pub tests: usize,
    pub cases: usize,
}

/// Ordered per-unit outcomes of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub outcomes: Vec<UnitOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<UnitOutcome>) -> Self {
        let summary = outcomes.iter().fold(
            BatchSummary {
                units: outcomes.len(),
                ..BatchSummary::default()
            },
            |mut acc, outcome| {
                match outcome {
                    UnitOutcome::Generated(module) => {
                        acc.generated += 1;
                        acc.tests += module.tests.len();
                        acc.cases += module.case_count();
                    }
                    UnitOutcome::Failed(_) => acc.failed += 1,
                }
                acc
            },
        );
        Self { summary, outcomes }
    }

    pub fn modules(&self) -> impl Iterator<Item = &GeneratedModule> {
        self.outcomes.iter().filter_map(UnitOutcome::module)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &UnitDiagnostic> {
        self.outcomes.iter().filter_map(UnitOutcome::diagnostic)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Synthesize every unit, in parallel unless disabled by config.
pub fn synthesize_batch(units: &[SourceUnit], config: &SynthConfig) -> BatchReport {
    let synthesizer = Synthesizer::new(config);
    let progress = BatchProgress::new(units.len());

    info!(
        units = units.len(),
        parallel = config.parallel.enabled,
        workers = config.parallel.effective_concurrency(),
        "Starting batch synthesis"
    );

    let outcomes = if !config.parallel.enabled || units.len() <= 1 {
        units
            .iter()
            .map(|unit| run_unit(&synthesizer, &progress, unit))
            .collect()
    } else {
        run_parallel(units, &config.parallel, &synthesizer, &progress)
    };

    let report = BatchReport::new(outcomes);
    let (processed, failed, total) = progress.snapshot();
    info!(
        processed,
        total,
        failed,
        tests = report.summary.tests,
        "Finished batch synthesis"
    );
    report
}

fn run_parallel(
    units: &[SourceUnit],
    config: &ParallelConfig,
    synthesizer: &Synthesizer,
    progress: &BatchProgress,
) -> Vec<UnitOutcome> {
    let fan_out = || -> Vec<UnitOutcome> {
        units
            .par_iter()
            .map(|unit| run_unit(synthesizer, progress, unit))
            .collect()
    };

    let Some(threads) = config.max_concurrency else {
        return fan_out();
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .stack_size(RAYON_STACK_SIZE)
        .build()
    {
        Ok(pool) => pool.install(fan_out),
        Err(e) => {
            warn!(error = %e, "Falling back to the global thread pool");
            fan_out()
        }
    }
}

fn run_unit(synthesizer: &Synthesizer, progress: &BatchProgress, unit: &SourceUnit) -> UnitOutcome {
    let outcome = match synthesizer.diagnose(unit) {
        Ok(module) => UnitOutcome::Generated(module),
        Err(diagnostic) => {
            warn!(
                unit = %unit.name,
                stage = ?diagnostic.stage,
                symbol = ?diagnostic.symbol,
                error = %diagnostic.error,
                "Skipping unit"
            );
            UnitOutcome::Failed(diagnostic)
        }
    };

    let processed = progress.record(outcome.module().is_some());
    debug!(unit = %unit.name, processed, "Unit finished");
    outcome
}

/// Configure the rayon global thread pool once at startup.
///
/// Uses an 8MB worker stack. Later calls leave the first pool in place.
pub fn configure_thread_pool(config: &ParallelConfig) {
    let builder = rayon::ThreadPoolBuilder::new()
        .stack_size(RAYON_STACK_SIZE)
        .num_threads(config.effective_concurrency());

    if let Err(e) = builder.build_global() {
        debug!(error = %e, "Thread pool already configured");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> Vec<SourceUnit> {
        vec![
            SourceUnit::new("calc.py", "def add(a, b):\n    return a + b\n"),
            SourceUnit::new("broken.py", "def broken(:\n"),
            SourceUnit::new("mail.py", "def validate_email(email):\n    return '@' in email\n"),
        ]
    }

    #[test]
    fn test_failures_do_not_abort_batch() {
        let report = synthesize_batch(&units(), &SynthConfig::default());

        let names: Vec<&str> = report.outcomes.iter().map(UnitOutcome::unit_name).collect();
        assert_eq!(names, vec!["calc.py", "broken.py", "mail.py"]);
        assert_eq!(report.summary.units, 3);
        assert_eq!(report.summary.generated, 2);
        assert_eq!(report.summary.failed, 1);

        let diagnostic = report.diagnostics().next().unwrap();
        assert_eq!(diagnostic.unit, "broken.py");
        assert_eq!(diagnostic.stage, Some(SynthesisStage::Analysis));
        assert!(matches!(diagnostic.error, SynthError::Parse { .. }));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let parallel = synthesize_batch(&units(), &SynthConfig::default());
        let sequential = synthesize_batch(
            &units(),
            &SynthConfig {
                parallel: ParallelConfig::sequential(),
                ..SynthConfig::default()
            },
        );
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_bounded_pool_preserves_order() {
        let config = SynthConfig {
            parallel: ParallelConfig {
                enabled: true,
                max_concurrency: Some(2),
            },
            ..SynthConfig::default()
        };
        let report = synthesize_batch(&units(), &config);
        assert_eq!(report.outcomes[2].unit_name(), "mail.py");
    }

    #[test]
    fn test_report_json_shape() {
        let report = synthesize_batch(&units(), &SynthConfig::default());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["outcomes"][0]["status"], "generated");
        assert_eq!(json["outcomes"][1]["status"], "failed");
        assert_eq!(json["outcomes"][1]["error"]["kind"], "parse");
        assert_eq!(json["outcomes"][1]["stage"], "analysis");
        assert!(json["outcomes"][1].get("symbol").is_none());
    }

    #[test]
    fn test_empty_batch() {
        let report = synthesize_batch(&[], &SynthConfig::default());
        assert_eq!(report.summary, BatchSummary::default());
        assert_eq!(report.modules().count(), 0);
    }
}
