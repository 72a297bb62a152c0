//! Places rendered test modules on disk.

use super::{ensure_dir, write_file};
use crate::emitter::GeneratedModule;
use crate::pipeline::BatchReport;
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Files written for a batch and the units left out.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WrittenModules {
    pub paths: Vec<PathBuf>,
    /// Units whose test file name collides with another unit's even when
    /// spelled out from the import path.
    pub skipped: Vec<String>,
}

/// Write `<output_dir>/test_<stem>.py`, creating the directory as needed.
pub fn write_module(module: &GeneratedModule, output_dir: &Path) -> Result<PathBuf> {
    write_module_as(module, output_dir, &module.file_name)
}

fn write_module_as(module: &GeneratedModule, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    ensure_dir(output_dir)?;
    let path = output_dir.join(file_name);
    write_file(&path, &module.render())?;
    info!(unit = %module.unit_name, path = %path.display(), tests = module.tests.len(), "Wrote test module");
    Ok(path)
}

/// Write every generated module of a batch.
///
/// Units sharing a stem (`a/utils.py`, `b/utils.py`) are written under
/// their import path instead (`test_a_utils.py`, `test_b_utils.py`). Units
/// that still collide are skipped and reported; the rest are written.
pub fn write_report(report: &BatchReport, output_dir: &Path) -> Result<WrittenModules> {
    let modules: Vec<&GeneratedModule> = report.modules().collect();

    let stems = count_names(modules.iter().map(|m| m.file_name.as_str()));
    let planned: Vec<(&GeneratedModule, String)> = modules
        .iter()
        .map(|module| {
            let file_name = if stems.get(module.file_name.as_str()).copied().unwrap_or(0) > 1 {
                module.qualified_file_name()
            } else {
                module.file_name.clone()
            };
            (*module, file_name)
        })
        .collect();
    let targets = count_names(planned.iter().map(|(_, name)| name.as_str()));

    let mut written = WrittenModules::default();
    for (module, file_name) in &planned {
        if targets.get(file_name.as_str()).copied().unwrap_or(0) > 1 {
            warn!(unit = %module.unit_name, file = %file_name, "Skipping unit whose test file collides with another unit");
            written.skipped.push(module.unit_name.clone());
            continue;
        }
        written.paths.push(write_module_as(module, output_dir, file_name)?);
    }
    Ok(written)
}

fn count_names<'a>(names: impl Iterator<Item = &'a str>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}
