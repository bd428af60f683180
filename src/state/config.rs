//! Configuration: CLI flag > environment variable > TOML file > default

use anyhow::{Context, Result};
use banshelf_core::{SortMode, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "banshelf.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON array of book records
    pub data_path: PathBuf,
    pub page_size: usize,
    /// Facet values shown per group in text output
    pub facet_limit: usize,
    pub subject_sort: SortMode,
    pub state_sort: SortMode,
    pub district_sort: SortMode,
    /// Subjects listed per state in the report
    pub report_top: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.json"),
            page_size: DEFAULT_PAGE_SIZE,
            facet_limit: 20,
            subject_sort: SortMode::Count,
            state_sort: SortMode::Count,
            district_sort: SortMode::Count,
            report_top: 5,
        }
    }
}

/// Parse a TOML config file
pub fn load_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    if config.page_size == 0 {
        anyhow::bail!("page_size in {} must be at least 1", path.display());
    }
    Ok(config)
}

/// Resolve the base config before CLI overrides are applied
/// An explicit path must exist; the default file is optional
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config file");
        return load_config_file(path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        debug!(path = %default_path.display(), "loading config file");
        return load_config_file(default_path);
    }

    debug!("no config file, using defaults");
    Ok(Config::default())
}
