use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::parallel::ParallelConfig;
use crate::patterns::Category;

/// Root configuration structure for testsynth
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SynthConfig {
    /// Source analyzer limits and visibility rules
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Pattern classifier threshold and keyword additions
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Test module rendering and output placement
    #[serde(default)]
    pub emitter: EmitterConfig,

    /// Batch parallelism
    #[serde(default)]
    pub parallel: ParallelConfig,

    /// Ignore patterns for source discovery
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

impl SynthConfig {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.analyzer.max_depth == 0 {
            return Err("analyzer.max_depth must be greater than 0".to_string());
        }
        if self.analyzer.max_source_bytes == 0 {
            return Err("analyzer.max_source_bytes must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.classifier.threshold) {
            return Err(format!(
                "classifier.threshold must be within [0, 1], got {}",
                self.classifier.threshold
            ));
        }
        for keyword in &self.classifier.keywords {
            keyword.validate()?;
        }
        if self.parallel.max_concurrency == Some(0) {
            return Err("parallel.max_concurrency must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_max_depth() -> usize {
    100
}

fn default_max_source_bytes() -> usize {
    2 * 1024 * 1024
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerConfig {
    /// Maximum block nesting before a unit is rejected as pathological
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Units larger than this are rejected without parsing
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,

    /// Also record `_private` symbols and dunder methods
    #[serde(default)]
    pub include_private: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_source_bytes: default_max_source_bytes(),
            include_private: false,
        }
    }
}

fn default_threshold() -> f64 {
    0.6
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierConfig {
    /// Minimum confidence for a category to be selected over Generic
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Keywords appended to the built-in category rules
    #[serde(default)]
    pub keywords: Vec<KeywordConfig>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            keywords: Vec::new(),
        }
    }
}

fn default_keyword_weight() -> f64 {
    1.0
}

/// One `[[classifier.keywords]]` entry.
///
/// ```toml
/// [[classifier.keywords]]
/// category = "geometry"
/// keyword = "surface"
/// weight = 0.8
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordConfig {
    pub category: Category,
    pub keyword: String,
    #[serde(default = "default_keyword_weight")]
    pub weight: f64,
}

impl KeywordConfig {
    fn validate(&self) -> Result<(), String> {
        if self.keyword.trim().is_empty() {
            return Err("classifier.keywords entries need a non-empty keyword".to_string());
        }
        if !(self.weight > 0.0 && self.weight <= 1.0) {
            return Err(format!(
                "keyword '{}' weight must be within (0, 1], got {}",
                self.keyword, self.weight
            ));
        }
        if matches!(self.category, Category::Generic | Category::EntityLifecycle) {
            return Err(format!(
                "keyword '{}' cannot target category '{}'",
                self.keyword, self.category
            ));
        }
        Ok(())
    }
}

fn default_verify_output() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("tests")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmitterConfig {
    /// Re-parse rendered modules and reject invalid Python
    #[serde(default = "default_verify_output")]
    pub verify_output: bool,

    /// Directory generated modules are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            verify_output: default_verify_output(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IgnoreConfig {
    /// Glob patterns for paths skipped during discovery
    #[serde(default)]
    pub patterns: Vec<String>,
}
