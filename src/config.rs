//! Configuration loading and discovery
//!
//! Settings are read from the first file found in this hierarchy:
//! 1. Current directory: ./word-lookup.toml or ./.word-lookup/config.toml
//! 2. User config: ~/.word-lookup/config.toml
//! 3. System config: /etc/word-lookup/config.toml
//! 4. Built-in defaults
//!
//! Environment overrides (`WORD_LOOKUP_DISABLED`, `WORD_LOOKUP_PROVIDER`,
//! `LEXICALA_API_KEY`) are applied on top of whatever was loaded.

use crate::env;
use crate::lexicon::types::ProviderId;
use serde::{Deserialize, Serialize};
use std::env as std_env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Missing API credentials for provider {0}")]
    MissingCredentials(ProviderId),
}

/// Operational settings for the lookup service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    /// Kill switch: when false every lookup fails with API_ERROR
    pub enabled: bool,
    pub primary_provider: ProviderId,
    pub timeout_ms: u64,
    pub retry_attempts: u32,
    pub backoff_base_ms: u64,
    /// Relative random spread applied to each backoff delay, `0.0..=1.0`
    pub backoff_jitter: f64,
    pub cache_ttl_secs: u64,
    pub default_target_language: String,
    pub providers: ProviderSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub free_dictionary: FreeDictionarySettings,
    pub lexicala: LexicalaSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeDictionarySettings {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalaSettings {
    pub base_url: String,
    pub api_host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            primary_provider: ProviderId::FreeDictionary,
            timeout_ms: env::lookup::DEFAULT_TIMEOUT_MS,
            retry_attempts: env::lookup::DEFAULT_RETRY_ATTEMPTS,
            backoff_base_ms: env::lookup::DEFAULT_BACKOFF_BASE_MS,
            backoff_jitter: 0.0,
            cache_ttl_secs: env::lookup::CACHE_TTL.as_secs(),
            default_target_language: env::lookup::DEFAULT_TARGET_LANGUAGE.to_string(),
            providers: ProviderSettings::default(),
        }
    }
}

impl Default for FreeDictionarySettings {
    fn default() -> Self {
        Self {
            base_url: env::provider::FREE_DICTIONARY_BASE_URL.to_string(),
        }
    }
}

impl Default for LexicalaSettings {
    fn default() -> Self {
        Self {
            base_url: env::provider::LEXICALA_BASE_URL.to_string(),
            api_host: env::provider::LEXICALA_API_HOST.to_string(),
            api_key: None,
        }
    }
}

impl LookupSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry_attempts must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.backoff_jitter) {
            return Err(ConfigError::Invalid(
                "backoff_jitter must be between 0.0 and 1.0".to_string(),
            ));
        }
        if self.default_target_language.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "default_target_language must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: LookupSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save to TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std_env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env::vars::DISABLED) {
            let disabled = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
            if disabled {
                warn!("Lookup service disabled via {}", env::vars::DISABLED);
                self.enabled = false;
            }
        }

        if let Some(value) = lookup(env::vars::PROVIDER) {
            self.primary_provider = value.parse().map_err(ConfigError::Invalid)?;
            debug!("Primary provider overridden: {}", self.primary_provider);
        }

        if let Some(key) = lookup(env::vars::LEXICALA_API_KEY).filter(|k| !k.trim().is_empty()) {
            self.providers.lexicala.api_key = Some(key);
        }

        Ok(())
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover and load configuration using the hierarchy, then apply
    /// environment overrides.
    pub fn discover_config() -> Result<LookupSettings, ConfigError> {
        let mut settings = if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            LookupSettings::from_toml_file(config_path)?
        } else {
            info!("No configuration file found, using defaults");
            LookupSettings::default()
        };

        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Find configuration file using discovery hierarchy
    pub fn find_config_file() -> Option<PathBuf> {
        for candidate in Self::get_config_candidates() {
            debug!("Checking for config file: {:?}", candidate);
            if candidate.is_file() {
                debug!("Found config file: {:?}", candidate);
                return Some(candidate);
            }
        }

        debug!("No config file found in discovery hierarchy");
        None
    }

    /// Configuration file candidates in priority order
    pub fn get_config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std_env::current_dir() {
            candidates.push(env::local_standalone_config_path(&current_dir));
            candidates.push(env::local_config_file_path(&current_dir));
        }

        if let Some(home_dir) = Self::get_home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        #[cfg(unix)]
        candidates.push(PathBuf::from("/etc/word-lookup/config.toml"));

        #[cfg(windows)]
        if let Ok(program_data) = std_env::var("PROGRAMDATA") {
            candidates.push(
                PathBuf::from(program_data)
                    .join("word-lookup")
                    .join(env::CONFIG_FILE_NAME),
            );
        }

        candidates
    }

    fn get_home_dir() -> Option<PathBuf> {
        std_env::var("HOME")
            .ok()
            .or_else(|| std_env::var("USERPROFILE").ok())
            .map(PathBuf::from)
    }

    /// Create a default config file in the user's home directory
    pub fn create_default_user_config() -> Result<PathBuf, ConfigError> {
        let home_dir = Self::get_home_dir()
            .ok_or_else(|| ConfigError::Invalid("could not determine home directory".to_string()))?;

        let config_dir = env::user_config_dir_path(&home_dir);
        let config_path = env::user_config_file_path(&home_dir);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
            info!("Created configuration directory: {:?}", config_dir);
        }

        if !config_path.exists() {
            LookupSettings::default().to_toml_file(&config_path)?;
            info!("Created default configuration file: {:?}", config_path);
        } else {
            warn!("Configuration file already exists: {:?}", config_path);
        }

        Ok(config_path)
    }
}
