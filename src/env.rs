//! Environment constants and path utilities for word lookup.
//!
//! This module centralizes the hardcoded defaults, directory names and
//! environment variable names used throughout the crate, making them
//! easier to maintain and modify.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory name (hidden directory like .git, .vscode)
pub const APP_DIR_NAME: &str = ".word-lookup";

/// Configuration file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Stand-alone configuration file name looked up in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "word-lookup.toml";

/// Lookup defaults
pub mod lookup {
    use super::Duration;

    /// Target language used when the caller does not specify one
    pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

    /// Cache key component used when no source language is given
    pub const DEFAULT_SOURCE_KEY: &str = "default";

    /// How long a cached word stays live
    pub const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

    /// Deadline for a single provider round trip
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

    /// Attempts per lookup, including the first one
    pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;

    /// Time unit multiplied by `2^attempt` between attempts
    pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1_000;

    /// Upper bound for a single backoff wait
    pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

    /// Longest word accepted before a request is considered malformed
    pub const MAX_WORD_LENGTH: usize = 100;
}

/// Provider endpoints and credentials
pub mod provider {
    /// Free Dictionary API base URL (entries endpoint, language appended)
    pub const FREE_DICTIONARY_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries";

    /// Lexicala search endpoint (RapidAPI gateway)
    pub const LEXICALA_BASE_URL: &str = "https://lexicala1.p.rapidapi.com/search-entries";

    /// Lexicala RapidAPI host header value
    pub const LEXICALA_API_HOST: &str = "lexicala1.p.rapidapi.com";

    /// Header carrying the provider API key
    pub const API_KEY_HEADER: &str = "X-RapidAPI-Key";

    /// Header carrying the provider API host
    pub const API_HOST_HEADER: &str = "X-RapidAPI-Host";

    /// User agent sent with every provider request
    pub const USER_AGENT: &str = concat!("word-lookup/", env!("CARGO_PKG_VERSION"));
}

/// Environment variable names read as configuration overrides
pub mod vars {
    /// Truthy value turns the lookup service off
    pub const DISABLED: &str = "WORD_LOOKUP_DISABLED";

    /// Overrides the configured primary provider
    pub const PROVIDER: &str = "WORD_LOOKUP_PROVIDER";

    /// Lexicala API key
    pub const LEXICALA_API_KEY: &str = "LEXICALA_API_KEY";
}

/// Build config directory path in user's home directory
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    home_dir.join(APP_DIR_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build local config file path in current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Build the stand-alone config file path in current directory
pub fn local_standalone_config_path(current_dir: &Path) -> PathBuf {
    current_dir.join(LOCAL_CONFIG_FILE_NAME)
}
