use crate::config::SynthConfig;
use crate::core::SourceUnit;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &[
    "tests",
    "__pycache__",
    "venv",
    "site-packages",
    "node_modules",
    "build",
    "dist",
];

/// Finds Python sources under a root, honouring `.gitignore`.
pub struct SourceWalker {
    root: PathBuf,
    ignore_patterns: Vec<glob::Pattern>,
}

impl SourceWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ignore_patterns: vec![],
        }
    }

    /// Invalid glob patterns are reported and dropped.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore_patterns = patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(pattern = %p, error = %e, "Ignoring invalid ignore pattern");
                    None
                }
            })
            .collect();
        self
    }

    /// Source file paths, sorted.
    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .require_git(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir && entry.depth() > 0 && is_skipped_dir(entry.file_name()))
            })
            .build();

        for entry in walker {
            let entry =
                entry.with_context(|| format!("Failed to walk {}", self.root.display()))?;
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            return false;
        }
        if is_test_file(path) {
            return false;
        }

        let relative = self.relative_name(path);
        !self.ignore_patterns.iter().any(|p| p.matches(&relative))
    }

    /// Root-relative path with `/` separators.
    fn relative_name(&self, path: &Path) -> String {
        if self.root.is_file() {
            return path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn is_skipped_dir(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    SKIPPED_DIRS.contains(&name.as_ref()) || name.ends_with(".egg-info")
}

/// `test_*.py`, `*_test.py` and `conftest.py`.
pub fn is_test_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name == "conftest.py"
        || name.starts_with("test_")
        || name.strip_suffix(".py").is_some_and(|s| s.ends_with("_test"))
}

/// Collect every Python source under `root` as a [`SourceUnit`].
///
/// Unit names are root-relative, so `root/pkg/calc.py` becomes
/// `pkg/calc.py`. Files that are not valid UTF-8 are skipped with a warning.
pub fn collect_source_units(root: &Path, config: &SynthConfig) -> Result<Vec<SourceUnit>> {
    let walker =
        SourceWalker::new(root.to_path_buf()).with_ignore_patterns(&config.ignore.patterns);
    let paths = walker.walk()?;
    debug!(root = %root.display(), files = paths.len(), "Discovered source files");

    let mut units = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes =
            std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        match String::from_utf8(bytes) {
            Ok(source) => units.push(SourceUnit::new(walker.relative_name(&path), source)),
            Err(_) => warn!(file = %path.display(), "Skipping file that is not valid UTF-8"),
        }
    }
    Ok(units)
}
