//! Configuration for the synthesis pipeline.
//!
//! Settings come from `.testsynth.toml`, discovered in the working directory
//! or one of its ancestors. Every section is optional and falls back to
//! defaults field by field.

mod core;
mod loader;
mod parallel;

pub use self::core::{
    AnalyzerConfig, ClassifierConfig, EmitterConfig, IgnoreConfig, KeywordConfig, SynthConfig,
};
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from_dir,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use parallel::ParallelConfig;
