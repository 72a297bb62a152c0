//! Source analysis: source text in, ordered signatures out.

use crate::config::AnalyzerConfig;
use crate::core::{Language, Result, Signature, SourceUnit, SynthError};

pub mod python;

pub use python::PythonAnalyzer;

/// A parsed unit, borrowed for the duration of extraction.
pub struct SourceTree<'u> {
    pub unit: &'u SourceUnit,
    pub tree: tree_sitter::Tree,
}

pub trait Analyzer: Send + Sync {
    fn parse<'u>(&self, unit: &'u SourceUnit) -> Result<SourceTree<'u>>;
    fn extract(&self, tree: &SourceTree) -> Vec<Signature>;
    fn language(&self) -> Language;
}

/// Parse and extract in one step. Never executes the source.
pub fn analyze_unit(unit: &SourceUnit, analyzer: &dyn Analyzer) -> Result<Vec<Signature>> {
    analyzer
        .parse(unit)
        .map(|tree| analyzer.extract(&tree))
}

pub fn get_analyzer(language: Language, config: &AnalyzerConfig) -> Option<Box<dyn Analyzer>> {
    type AnalyzerFactory = fn(&AnalyzerConfig) -> Box<dyn Analyzer>;

    static ANALYZER_MAP: &[(Language, AnalyzerFactory)] =
        &[(Language::Python, |config| Box::new(PythonAnalyzer::new(config.clone())))];

    ANALYZER_MAP
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, factory)| factory(config))
}

/// One analyzer per supported language, chosen by each unit's extension.
pub struct AnalyzerRegistry {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            analyzers: Language::SUPPORTED
                .iter()
                .filter_map(|language| get_analyzer(*language, config))
                .collect(),
        }
    }

    pub fn for_unit(&self, unit: &SourceUnit) -> Result<&dyn Analyzer> {
        let language = unit.language();
        self.analyzers
            .iter()
            .find(|analyzer| analyzer.language() == language)
            .map(|analyzer| analyzer.as_ref())
            .ok_or_else(|| SynthError::unsupported_language(&unit.name, unit_extension(unit)))
    }
}

fn unit_extension(unit: &SourceUnit) -> &str {
    unit.name
        .rsplit(['/', '\\'])
        .next()
        .and_then(|file| file.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("unknown")
}
