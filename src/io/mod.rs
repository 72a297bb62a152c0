//! File system edge: source discovery and generated-module output.
//!
//! Everything here reports failures as `anyhow::Error` with path context;
//! the synthesis pipeline itself never touches the file system.

pub mod walker;
pub mod writer;

pub use walker::{collect_source_units, is_test_file, SourceWalker};
pub use writer::{write_module, write_report, WrittenModules};

use crate::config::SynthConfig;
use crate::pipeline::{synthesize_batch, BatchReport};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Discover every source unit under `root` and synthesize them as a batch.
pub fn synthesize_directory(root: &Path, config: &SynthConfig) -> Result<BatchReport> {
    let units = collect_source_units(root, config)?;
    Ok(synthesize_batch(&units, config))
}
