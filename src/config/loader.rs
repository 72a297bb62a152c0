use anyhow::{Context, Result};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::SynthConfig;

/// Name of the configuration file searched for in the working directory
/// and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".testsynth.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<SynthConfig, String> {
    let config = toml::from_str::<SynthConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    config
        .validate()
        .map_err(|e| format!("Invalid {}: {}", CONFIG_FILE_NAME, e))?;

    Ok(config)
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<SynthConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file.
///
/// The nearest file wins even when it is invalid; an invalid file yields
/// defaults rather than an ancestor's config.
pub fn load_config_from_dir(start: &Path) -> SynthConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let Some(config_path) = directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
    else {
        log::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        return SynthConfig::default();
    };

    try_load_config_from_path(&config_path).unwrap_or_default()
}

/// Load configuration from the current directory hierarchy, falling back
/// to defaults.
pub fn load_config() -> SynthConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from_dir(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            SynthConfig::default()
        }
    }
}

/// Load an explicitly named config file; unlike discovery, problems are
/// errors rather than warnings.
pub fn load_config_file(path: &Path) -> Result<SynthConfig> {
    let contents = read_config_file(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_and_validate_config(&contents).map_err(anyhow::Error::msg)
}
