//! Engine configuration loaded from TOML.
//!
//! The host constructs an [`EngineConfig`] (typically via
//! [`parse_config_toml`]) and passes it to
//! [`ConversionDictionary::open`](crate::dict::ConversionDictionary::open).
//! There is deliberately no process-global singleton: paths are
//! per-user and one engine instance owns one history file.

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub dictionaries: DictionaryPaths,
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Dictionary layers in their fixed load order. Any layer may be
/// absent; a missing or unreadable file is logged and skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictionaryPaths {
    /// Katakana-only base dictionary, loaded first so its candidates
    /// rank after kanji candidates from later layers.
    pub katakana: Option<PathBuf>,
    /// Optional supplementary base dictionary.
    pub supplement: Option<PathBuf>,
    /// Primary system dictionary.
    pub system: Option<PathBuf>,
    /// User dictionary, merged into the active layer only.
    pub user: Option<PathBuf>,
    /// History overlay; also the path `save_history` writes to.
    pub history: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingConfig {
    /// Disable dakuten-tolerant comparison in the okurigana matcher.
    #[serde(default)]
    pub strict_voicing: bool,
}

pub fn parse_config_toml(toml_str: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig =
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Returns the embedded default configuration TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    let paths = [
        ("dictionaries.katakana", &config.dictionaries.katakana),
        ("dictionaries.supplement", &config.dictionaries.supplement),
        ("dictionaries.system", &config.dictionaries.system),
        ("dictionaries.user", &config.dictionaries.user),
        ("dictionaries.history", &config.dictionaries.history),
    ];
    for (field, path) in paths {
        if let Some(p) = path {
            if p.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "path must not be empty".to_string(),
                });
            }
        }
    }
    Ok(())
}
