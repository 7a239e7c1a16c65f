//! Configuration loading for Suitescope

mod schema;

pub use schema::{Config, FilterDefaults};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".suitescoperc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_config_with_extends(&path, &mut HashSet::new())
        }
        None => Ok(Config::default()),
    }
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference relative to the config that names it
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = config_dir.join(extends);

    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .suitescoperc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Write a starter config into `dir`. Returns `None` when one already exists.
pub fn write_default_config(dir: &Path, config: &Config) -> Result<Option<PathBuf>> {
    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        return Ok(None);
    }
    let mut json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    json.push('\n');
    fs::write(&config_path, json)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(Some(config_path))
}
