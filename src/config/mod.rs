// src/config/mod.rs
//! Settings file loading (TOML or JSON) and environment secrets.

pub mod secrets;
pub mod settings;

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use secrets::{EmailSecrets, Secrets};
pub use settings::{DispatchSettings, HttpSettings, Settings, SummarizerProvider, SummarizerSettings};

pub const ENV_CONFIG_PATH: &str = "DIGEST_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/digest.toml";
pub const DEFAULT_JSON_PATH: &str = "config/digest.json";

/// Load and validate settings from an explicit path. TOML or JSON, by extension
/// first and by trying both otherwise.
pub fn load_settings_from(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let settings = parse_settings(&content, ext.as_str())
        .with_context(|| format!("parsing settings in {}", path.display()))?;
    settings
        .validate()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    Ok(settings)
}

/// Load settings using env var + fallbacks:
/// 1) $DIGEST_CONFIG_PATH
/// 2) config/digest.toml
/// 3) config/digest.json
pub fn load_settings_default() -> Result<Settings> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_settings_from(&pb);
        }
        return Err(anyhow!(
            "{ENV_CONFIG_PATH} points to non-existent path {}",
            pb.display()
        ));
    }
    let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
    if toml_p.exists() {
        return load_settings_from(&toml_p);
    }
    let json_p = PathBuf::from(DEFAULT_JSON_PATH);
    if json_p.exists() {
        return load_settings_from(&json_p);
    }
    Err(anyhow!(
        "no settings file: set {ENV_CONFIG_PATH} or create {DEFAULT_TOML_PATH}"
    ))
}

fn parse_settings(s: &str, hint_ext: &str) -> Result<Settings> {
    match hint_ext {
        "toml" => toml::from_str(s).context("toml"),
        "json" => serde_json::from_str(s).context("json"),
        _ => {
            // Unknown extension: JSON documents start with '{'.
            if s.trim_start().starts_with('{') {
                serde_json::from_str(s).context("json")
            } else {
                toml::from_str(s).context("toml")
            }
        }
    }
}
