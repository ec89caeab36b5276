//! Configuration loading, validation, and management for Windlass.
//!
//! Loads configuration from `~/.windlass/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The root configuration structure.
///
/// Maps directly to `~/.windlass/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Context window assembly settings
    #[serde(default)]
    pub window: WindowConfig,

    /// Summary window and summarizer settings
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Where conversations, the offload ledger, and the index live
    #[serde(default)]
    pub storage: StorageConfig,

    /// Retrieval index settings
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Token budgets and section shares for the conversation window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Total token budget for one assembled prompt
    #[serde(default = "default_ceiling_tokens")]
    pub ceiling_tokens: usize,

    /// Fraction of the conversation section's budget migrated per pager call
    #[serde(default = "default_chunk_ratio")]
    pub chunk_ratio: f64,

    /// Number of most-recent turns never offloaded
    #[serde(default = "default_recent_keep")]
    pub recent_keep: usize,

    /// Section name -> fraction of the ceiling, summing to <= 1.0
    #[serde(default = "default_ratios")]
    pub ratios: BTreeMap<String, f64>,
}

fn default_ceiling_tokens() -> usize {
    8192
}
fn default_chunk_ratio() -> f64 {
    0.5
}
fn default_recent_keep() -> usize {
    1
}
fn default_ratios() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("SYSTEM_PROMPT".to_string(), 0.15),
        ("TASK".to_string(), 0.05),
        ("TOOL_CONTRACT".to_string(), 0.10),
        ("RETRIEVED_KNOWLEDGE".to_string(), 0.40),
        ("CURRENT_CONVERSATION".to_string(), 0.30),
    ])
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            ceiling_tokens: default_ceiling_tokens(),
            chunk_ratio: default_chunk_ratio(),
            recent_keep: default_recent_keep(),
            ratios: default_ratios(),
        }
    }
}

/// Settings for the summary window and the bounded-retry summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Token budget for one summary prompt
    #[serde(default = "default_summary_ceiling")]
    pub ceiling_tokens: usize,

    /// Maximum generation attempts before falling back to the raw response
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_summary_ceiling() -> usize {
    4096
}
fn default_max_attempts() -> usize {
    3
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            ceiling_tokens: default_summary_ceiling(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Filesystem layout for persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for conversations, ledgers, and the file index
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    AppConfig::config_dir().join("data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Retrieval index selection and query defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Index backend: "file" or "memory"
    #[serde(default = "default_index_backend")]
    pub backend: String,

    /// How many chunks the retrieved-knowledge section asks for
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_index_backend() -> String {
    "file".into()
}
fn default_top_k() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            backend: default_index_backend(),
            top_k: default_top_k(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.windlass/config.toml).
    ///
    /// Environment variable overrides (highest priority):
    /// - `WINDLASS_DATA_DIR` — storage root
    /// - `WINDLASS_CEILING` — window token ceiling
    /// - `WINDLASS_INDEX_BACKEND` — retrieval backend name
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(dir) = std::env::var("WINDLASS_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }

        if let Ok(ceiling) = std::env::var("WINDLASS_CEILING") {
            config.window.ceiling_tokens = ceiling.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "WINDLASS_CEILING must be a positive integer, got {ceiling:?}"
                ))
            })?;
        }

        if let Ok(backend) = std::env::var("WINDLASS_INDEX_BACKEND") {
            config.retrieval.backend = backend;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".windlass")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.ceiling_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "window.ceiling_tokens must be > 0".into(),
            ));
        }

        if self.window.chunk_ratio <= 0.0 || self.window.chunk_ratio > 1.0 {
            return Err(ConfigError::ValidationError(
                "window.chunk_ratio must be in (0, 1]".into(),
            ));
        }

        if self.window.recent_keep == 0 {
            return Err(ConfigError::ValidationError(
                "window.recent_keep must be >= 1".into(),
            ));
        }

        for (name, ratio) in &self.window.ratios {
            if *ratio < 0.0 || *ratio > 1.0 {
                return Err(ConfigError::ValidationError(format!(
                    "window.ratios.{name} must be in [0, 1], got {ratio}"
                )));
            }
        }

        let ratio_sum: f64 = self.window.ratios.values().sum();
        if ratio_sum > 1.0 + 1e-6 {
            return Err(ConfigError::ValidationError(format!(
                "window.ratios sum to {ratio_sum:.2}, must be <= 1.0"
            )));
        }

        if self.summary.ceiling_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "summary.ceiling_tokens must be > 0".into(),
            ));
        }

        if self.summary.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "summary.max_attempts must be >= 1".into(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k must be >= 1".into(),
            ));
        }

        if self.retrieval.backend != "file" && self.retrieval.backend != "memory" {
            return Err(ConfigError::ValidationError(format!(
                "retrieval.backend must be \"file\" or \"memory\", got {:?}",
                self.retrieval.backend
            )));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            summary: SummaryConfig::default(),
            storage: StorageConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
