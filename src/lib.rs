//! # Word Lookup
//!
//! Word information lookup over external lexical providers. A word goes
//! in; a provider-independent [`WordInfo`] comes out, carrying
//! definitions, part-of-speech groups, synonyms, antonyms, examples and
//! an estimated frequency.
//!
//! ## Architecture Overview
//!
//! - **[`lexicon`]**: Provider clients, response transformers and the
//!   canonical word model
//! - **[`lookup`]**: Retry orchestration, the TTL cache and the
//!   caller-facing service with its error taxonomy
//! - **[`config`]**: TOML settings and configuration discovery
//! - **[`system`]**: Wires the layers together from settings
//!
//! ## Features
//!
//! ### Providers
//! - **Two interchangeable backends**: a free dictionary keyed by URL path
//!   and a keyed multilingual API, selected at runtime
//! - **Connectivity aware**: clients refuse to make calls while offline
//!
//! ### Reliability
//! - **Bounded retries**: exponential backoff, definitive outcomes are
//!   never retried
//! - **Per-attempt deadline**: slow providers surface as `TIMEOUT`
//! - **TTL cache**: thirty minutes by default, compacted on write
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use word_lookup::{ConfigDiscovery, LookupSystem};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = ConfigDiscovery::discover_config()?;
//!     let system = LookupSystem::from_settings(settings).await?;
//!
//!     match system.service().get_word_info("serendipity", None, None).await {
//!         Ok(info) => println!("{} definition(s)", info.definitions.len()),
//!         Err(e) => eprintln!("{}", serde_json::to_string(&e)?),
//!     }
//!     Ok(())
//! }
//! ```

/// TOML settings and configuration discovery.
pub mod config;

/// Environment constants and path utilities.
///
/// Centralizes default values, endpoints and configuration file locations.
pub mod env;

/// Provider-facing layer: clients, transformers and the canonical model.
pub mod lexicon;

/// Orchestration layer: manager, retry, cache and service.
pub mod lookup;

pub mod system;

// CLI module for command-line interface
pub mod cli;

pub use config::{ConfigDiscovery, ConfigError, LookupSettings};

pub use lexicon::{
    ConnectivityMonitor, Definition, Frequency, FrequencyLevel, LexicalClient, PartOfSpeechGroup,
    ProviderError, ProviderId, ProviderRequest, RawPayload, ResponseTransformer, WordInfo,
};

pub use lookup::{
    CacheStats, ErrorCode, ErrorDetails, LookupConfig, LookupError, LookupManager,
    LookupManagerError, LookupParams, LookupService,
};

pub use system::LookupSystem;
