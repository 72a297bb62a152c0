//! Python source analyzer built on tree-sitter.

pub mod parser;
pub mod raises;
pub mod signature;

pub use parser::{check_syntax, has_parse_errors, node_line, node_text, parse_source, walk_nodes};
pub use signature::SignatureExtractor;

use crate::analyzers::{Analyzer, SourceTree};
use crate::config::AnalyzerConfig;
use crate::core::{Language, Result, Signature, SourceUnit};

pub struct PythonAnalyzer {
    config: AnalyzerConfig,
}

impl PythonAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl Analyzer for PythonAnalyzer {
    fn parse<'u>(&self, unit: &'u SourceUnit) -> Result<SourceTree<'u>> {
        let tree = parse_source(unit, &self.config)?;
        Ok(SourceTree { unit, tree })
    }

    fn extract(&self, tree: &SourceTree) -> Vec<Signature> {
        SignatureExtractor::new(&tree.unit.source, self.config.include_private)
            .extract(tree.tree.root_node())
    }

    fn language(&self) -> Language {
        Language::Python
    }
}
