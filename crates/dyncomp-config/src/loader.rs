//! Configuration loading

use crate::types::CompressionSettings;
use crate::ConfigFormat;
use dyncomp_core::{Error, Result};
use regex::{Captures, Regex};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Load settings from a file
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<CompressionSettings> {
    let path = path.as_ref();

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

    let format = ConfigFormat::from_path(path)?;

    load_from_str(&content, format)
}

static ENV_VAR_PATTERN: OnceLock<Regex> = OnceLock::new();

fn env_var_pattern() -> Result<&'static Regex> {
    if let Some(re) = ENV_VAR_PATTERN.get() {
        return Ok(re);
    }
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}")
        .map_err(|e| Error::Config(format!("Invalid regex: {e}")))?;
    Ok(ENV_VAR_PATTERN.get_or_init(|| re))
}

/// Expand `${VAR}` and `${VAR:-default}` references
///
/// Fails on the first variable that is neither set nor defaulted.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut missing: Option<String> = None;

    let expanded = env_var_pattern()?.replace_all(content, |caps: &Captures<'_>| {
        let name = &caps[1];
        match (env::var(name), caps.get(3)) {
            (Ok(value), _) => value,
            (Err(_), Some(default)) => default.as_str().to_string(),
            (Err(_), None) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(Error::Config(format!(
            "Environment variable '{name}' not set and no default provided"
        ))),
        None => Ok(expanded.into_owned()),
    }
}

/// Load settings from a string
pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<CompressionSettings> {
    let expanded_content = expand_env_vars(content)?;

    let settings = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse YAML: {e}")))?,
        ConfigFormat::Toml => toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))?,
        ConfigFormat::Json => serde_json::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse JSON: {e}")))?,
    };

    Ok(settings)
}

/// Load and validate settings from a file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CompressionSettings> {
    let settings = load_from_file(path)?;

    crate::validator::validate_settings(&settings)?;

    Ok(settings)
}

/// Load and merge multiple settings files
///
/// Files are merged in order, with later files overriding earlier ones:
/// - base.yaml (server defaults)
/// - production.yaml (env-specific)
pub fn load_and_merge<P: AsRef<Path>>(paths: Vec<P>) -> Result<CompressionSettings> {
    if paths.is_empty() {
        return Err(Error::Config("No configuration files provided".to_string()));
    }

    let settings = paths
        .into_iter()
        .map(load_from_file)
        .collect::<Result<Vec<_>>>()?;

    let merged = crate::merger::merge_settings(settings)?;
    crate::validator::validate_settings(&merged)?;

    Ok(merged)
}
