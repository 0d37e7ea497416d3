//! Config file loading

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

/// Nested table name accepted in TOML and YAML config files.
const SECTION: &str = "repo-dump";

const CANDIDATES: &[&str] = &[
    "repo-dump.toml",
    ".repo-dump.toml",
    "repo-dump.yml",
    ".repo-dump.yml",
    "repo-dump.yaml",
    ".repo-dump.yaml",
];

/// Settings read from a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub out: Option<PathBuf>,
    pub max_bytes: Option<u64>,
    pub include_diff: Option<bool>,
    #[serde(deserialize_with = "string_list")]
    pub exclude_dirs: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub exclude_globs: Vec<String>,
}

/// Load the config file for a run.
///
/// An explicit `config_path` must exist and parse. Without one, the
/// repository root is searched for a known file name; a discovered file that
/// fails to parse is ignored with a warning.
pub fn load_config(repo_root: &Path, config_path: Option<&Path>) -> Result<FileConfig> {
    let explicit = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(repo_root),
    };

    let Some(config_file) = discovered else {
        return Ok(FileConfig::default());
    };

    match parse_config_file(&config_file) {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::warn!(
                "Ignoring auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(FileConfig::default())
        }
    }
}

fn parse_config_file(config_file: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "toml" => parse_toml_config(&content, config_file),
        "yaml" | "yml" => parse_yaml_config(&content, config_file),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

/// Parse TOML config, optionally nested under a `[repo-dump]` table.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = raw.get(SECTION).cloned().unwrap_or(raw);

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, optionally nested under a `repo-dump` key.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    // An empty document parses as null
    if raw.is_null() {
        return Ok(FileConfig::default());
    }
    let config_val = raw.get(SECTION).cloned().unwrap_or(raw);

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(repo_root: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|candidate| repo_root.join(candidate)).find(|path| path.is_file())
}

/// Accept either a list of strings or one comma-separated string.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let items = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => s.split(',').map(str::to_string).collect(),
        OneOrMany::Many(v) => v,
    };
    Ok(items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect())
}
