//! # Configuration Module
//!
//! Data directory layout and tunable scoring parameters.
//!
//! ## Data Storage
//!
//! Tastemaker keeps its files in the platform-standard data directory:
//! - Linux: `~/.local/share/tastemaker/`
//! - macOS: `~/Library/Application Support/tastemaker/`
//! - Windows: `%APPDATA%\tastemaker\`
//!
//! It holds `profiles.db` (the SQLite profile store) and an optional
//! `config.json` with [`ScoringConfig`] overrides.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "tastemaker";
const DB_FILE: &str = "profiles.db";
const CONFIG_FILE: &str = "config.json";

/// Create (if needed) and return the `tastemaker` directory under `base`.
fn app_dir_in(base: &Path) -> Result<PathBuf> {
    let dir = base.join(APP_DIR);
    fs::create_dir_all(&dir).with_context(|| {
        format!(
            "Failed to create Tastemaker data directory at {}. Please check file permissions.",
            dir.display()
        )
    })?;
    Ok(dir)
}

/// Returns the platform-appropriate data directory for Tastemaker,
/// creating it on first use.
///
/// # Errors
///
/// Fails when the system data directory cannot be determined or the
/// subdirectory cannot be created.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;
    app_dir_in(&data_dir)
}

/// Path of the SQLite profile store.
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn get_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(DB_FILE))
}

/// Path of the optional scoring config file.
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(CONFIG_FILE))
}

/// Tunable scoring parameters. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Share of the similarity score in a context blend.
    pub base_weight: f64,
    /// Share of the energy fit in a context blend.
    pub energy_weight: f64,
    /// Share of the mood fit in a context blend.
    pub mood_weight: f64,
    /// Weight added (liked) or removed (disliked) per feedback entry.
    pub feedback_increment: f64,
    /// A context fit above this is worth explaining.
    pub explanation_threshold: f64,
    /// Fraction of the top effective weight a genre/mood needs to be
    /// mentioned in an explanation.
    pub top_weight_ratio: f64,
    pub default_count: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_weight: 0.6,
            energy_weight: 0.25,
            mood_weight: 0.15,
            feedback_increment: 0.2,
            explanation_threshold: 0.5,
            top_weight_ratio: 0.5,
            default_count: crate::model::DEFAULT_RECOMMENDATION_COUNT,
        }
    }
}

impl ScoringConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for negative or non-finite weights,
    /// a zero blend, or a zero default count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("base_weight", self.base_weight),
            ("energy_weight", self.energy_weight),
            ("mood_weight", self.mood_weight),
            ("feedback_increment", self.feedback_increment),
            ("explanation_threshold", self.explanation_threshold),
            ("top_weight_ratio", self.top_weight_ratio),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Invalid(format!("`{name}` must be a non-negative number, got {value}")));
        }
        if self.base_weight + self.energy_weight + self.mood_weight == 0.0 {
            return Err(ConfigError::Invalid("blend weights sum to zero".into()));
        }
        if self.default_count == 0 {
            return Err(ConfigError::Invalid("`default_count` must be positive".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. The document must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON, a non-object document or
    /// invalid values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        // Objects only: a sequence would deserialize field by field in order
        let fields: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let config: Self = serde_json::from_value(serde_json::Value::Object(fields))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file exists but cannot be read or
    /// holds an invalid config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No scoring config at {}, using defaults.", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Configuration for runtime behavior
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Path to the profile database file
    pub db_path: PathBuf,
    pub scoring: ScoringConfig,
}

impl RuntimeConfig {
    /// Resolve paths and scoring parameters, honoring explicit overrides.
    ///
    /// # Errors
    ///
    /// Fails when the data directory is unavailable or the config file is
    /// invalid.
    pub fn resolve(db_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(path) => path,
            None => get_db_path()?,
        };
        let config_path = match config_path {
            Some(path) => path,
            None => get_config_path()?,
        };
        let scoring = ScoringConfig::load(&config_path)
            .with_context(|| format!("Failed to load scoring config from {}", config_path.display()))?;
        Ok(Self { db_path, scoring })
    }

    /// Create configuration with explicit values
    pub fn with_db_path(db_path: PathBuf, scoring: ScoringConfig) -> Self {
        Self { db_path, scoring }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_app_dir_created() -> Result<()> {
        let base = TempDir::new()?;
        let dir = app_dir_in(base.path())?;

        assert!(dir.exists());
        assert!(dir.is_dir());
        assert_eq!(dir.file_name().unwrap(), "tastemaker");

        // Idempotent
        assert_eq!(app_dir_in(base.path())?, dir);
        Ok(())
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.base_weight + config.energy_weight + config.mood_weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ScoringConfig::from_json(r#"{"feedback_increment": 0.35}"#).unwrap();
        assert_eq!(config.feedback_increment, 0.35);
        assert_eq!(config.base_weight, 0.6);
        assert_eq!(config.default_count, 5);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            ScoringConfig::from_json(r#"{"mood_weight": -1.0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ScoringConfig::from_json(r#"{"base_weight": 0, "energy_weight": 0, "mood_weight": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(ScoringConfig::from_json("[1, 2]"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_non_object_documents_rejected() {
        for json in ["[1, 2]", "[0.6, 0.25, 0.15]", "[]", "0.5", "\"defaults\"", "null"] {
            assert!(
                matches!(ScoringConfig::from_json(json), Err(ConfigError::Parse(_))),
                "accepted {json}"
            );
        }
        assert_eq!(ScoringConfig::from_json("{}").unwrap(), ScoringConfig::default());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let config = ScoringConfig::load(&dir.path().join("config.json"))?;
        assert_eq!(config, ScoringConfig::default());
        Ok(())
    }

    #[test]
    fn test_runtime_config_with_explicit_paths() -> Result<()> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{"top_weight_ratio": 0.9}"#)?;

        let runtime = RuntimeConfig::resolve(Some(dir.path().join("p.db")), Some(config_path))?;
        assert_eq!(runtime.db_path, dir.path().join("p.db"));
        assert_eq!(runtime.scoring.top_weight_ratio, 0.9);
        Ok(())
    }
}
