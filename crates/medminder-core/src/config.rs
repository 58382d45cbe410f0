//! TOML configuration for MedMinder front ends.
//!
//! Every section is optional; an empty document yields the defaults.
//!
//! ```toml
//! [storage]
//! path = "medminder-data.json"
//!
//! [seeding]
//! policy = "lazy"        # or "on-create"
//!
//! [assistant]
//! language = "en"        # or "hi"
//!
//! [voice]
//! enabled = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use medminder_contracts::error::{MedMinderError, MedMinderResult};

/// Languages the chat assistant can answer in.
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "hi"];

/// When default medications and vitals are written for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedingPolicy {
    /// `create_profile` starts with empty lists; the first `load` of a
    /// profile with no persisted lists seeds them.
    #[default]
    Lazy,
    /// `create_profile` seeds and persists the defaults immediately.
    OnCreate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON document backing the key-value store.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("medminder-data.json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    pub policy: SeedingPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// One of [`SUPPORTED_LANGUAGES`].
    pub language: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// When false, spoken responses are suppressed.
    pub enabled: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedMinderConfig {
    pub storage: StorageConfig,
    pub seeding: SeedingConfig,
    pub assistant: AssistantConfig,
    pub voice: VoiceConfig,
}

impl MedMinderConfig {
    /// Parse `s` as TOML.
    ///
    /// Returns `MedMinderError::ConfigError` if the TOML is malformed, does
    /// not match the schema, or names an unsupported assistant language.
    pub fn from_toml_str(s: &str) -> MedMinderResult<Self> {
        let config: MedMinderConfig = toml::from_str(s).map_err(|e| MedMinderError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;

        if !SUPPORTED_LANGUAGES.contains(&config.assistant.language.as_str()) {
            return Err(MedMinderError::ConfigError {
                reason: format!(
                    "assistant.language '{}' is not one of {:?}",
                    config.assistant.language, SUPPORTED_LANGUAGES
                ),
            });
        }

        Ok(config)
    }

    /// Read and parse the TOML file at `path`.
    pub fn from_file(path: &Path) -> MedMinderResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedMinderError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}
