//! Provider selection and retry orchestration.
//!
//! The [`LookupManager`] keeps two registries keyed by [`ProviderId`]: one
//! of wire clients and one of response transformers. A search resolves
//! the configured primary provider, runs the client under a
//! [`RetryPolicy`] with a per-attempt deadline, and maps the raw payload
//! with the transformer registered for the same provider. Mapping is part
//! of the attempt, so a malformed body is retried like any other API error.

use crate::env;
use crate::lexicon::provider::{LexicalClient, ProviderPair, ResponseTransformer};
use crate::lexicon::types::{ProviderError, ProviderId, ProviderRequest, WordInfo};
use crate::lookup::error::LookupManagerError;
use crate::lookup::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Runtime-adjustable manager configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    pub primary_provider: ProviderId,
    pub timeout_ms: u64,
    pub retry_attempts: u32,
    pub backoff_base_ms: u64,
    /// Relative backoff jitter, `0.0..=1.0`
    pub backoff_jitter: f64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            primary_provider: ProviderId::FreeDictionary,
            timeout_ms: env::lookup::DEFAULT_TIMEOUT_MS,
            retry_attempts: env::lookup::DEFAULT_RETRY_ATTEMPTS,
            backoff_base_ms: env::lookup::DEFAULT_BACKOFF_BASE_MS,
            backoff_jitter: 0.0,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy<LookupManagerError> {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.backoff_base_ms),
            LookupManagerError::is_retriable,
        )
        .with_jitter(self.backoff_jitter)
    }
}

/// Parameters of one manager search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupParams {
    pub word: String,
    pub from_language: Option<String>,
    pub target_language: Option<String>,
}

impl LookupParams {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Default::default()
        }
    }

    pub fn from_language(mut self, language: impl Into<String>) -> Self {
        self.from_language = Some(language.into());
        self
    }

    pub fn target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = Some(language.into());
        self
    }
}

type TransformerRegistry = HashMap<ProviderId, Arc<dyn ResponseTransformer>>;

pub struct LookupManager {
    clients: RwLock<HashMap<ProviderId, Arc<dyn LexicalClient>>>,
    transformers: Arc<RwLock<TransformerRegistry>>,
    config: RwLock<LookupConfig>,
}

impl LookupManager {
    pub fn new(config: LookupConfig) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            transformers: Arc::new(RwLock::new(HashMap::new())),
            config: RwLock::new(config),
        }
    }

    /// Register a client, returning the one it replaces
    pub async fn add_client(
        &self,
        provider: ProviderId,
        client: Arc<dyn LexicalClient>,
    ) -> Option<Arc<dyn LexicalClient>> {
        debug!("Registering client for {}", provider);
        self.clients.write().await.insert(provider, client)
    }

    pub async fn remove_client(&self, provider: ProviderId) -> Option<Arc<dyn LexicalClient>> {
        debug!("Removing client for {}", provider);
        self.clients.write().await.remove(&provider)
    }

    /// Register a transformer, returning the one it replaces
    pub async fn add_transformer(
        &self,
        provider: ProviderId,
        transformer: Arc<dyn ResponseTransformer>,
    ) -> Option<Arc<dyn ResponseTransformer>> {
        debug!("Registering transformer for {}", provider);
        self.transformers.write().await.insert(provider, transformer)
    }

    pub async fn remove_transformer(
        &self,
        provider: ProviderId,
    ) -> Option<Arc<dyn ResponseTransformer>> {
        debug!("Removing transformer for {}", provider);
        self.transformers.write().await.remove(&provider)
    }

    /// Register a client and its transformer under the same id
    pub async fn register_provider(&self, provider: ProviderId, pair: ProviderPair) {
        self.add_client(provider, pair.client).await;
        self.add_transformer(provider, pair.transformer).await;
    }

    pub async fn registered_providers(&self) -> Vec<ProviderId> {
        let mut providers: Vec<ProviderId> = self.clients.read().await.keys().copied().collect();
        providers.sort_by_key(|p| p.as_str());
        providers
    }

    pub async fn update_config(&self, config: LookupConfig) {
        info!(
            "Lookup config updated: primary={}, timeout={}ms, attempts={}",
            config.primary_provider, config.timeout_ms, config.retry_attempts
        );
        *self.config.write().await = config;
    }

    pub async fn get_config(&self) -> LookupConfig {
        self.config.read().await.clone()
    }

    /// Look a word up with the configured primary provider.
    pub async fn search_word(&self, params: LookupParams) -> Result<WordInfo, LookupManagerError> {
        let config = self.get_config().await;
        let lookup_id = Uuid::new_v4();
        let span = info_span!(
            "search_word",
            %lookup_id,
            provider = %config.primary_provider,
            word = %params.word
        );

        self.search_with(config, params).instrument(span).await
    }

    async fn search_with(
        &self,
        config: LookupConfig,
        params: LookupParams,
    ) -> Result<WordInfo, LookupManagerError> {
        let provider = config.primary_provider;
        let target_language = params
            .target_language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| env::lookup::DEFAULT_TARGET_LANGUAGE.to_string());

        let client = self
            .clients
            .read()
            .await
            .get(&provider)
            .cloned()
            .ok_or(LookupManagerError::ClientNotRegistered(provider))?;

        if !client.is_available() {
            warn!("Client for {} reports it is unavailable", provider);
            return Err(LookupManagerError::ClientUnavailable(provider));
        }

        let request = ProviderRequest {
            word: params.word,
            from_language: params.from_language,
            target_language,
        };
        let timeout = config.timeout();

        let word = config
            .retry_policy()
            .execute(|attempt| {
                Box::pin(Self::attempt(
                    attempt,
                    provider,
                    Arc::clone(&client),
                    Arc::clone(&self.transformers),
                    request.clone(),
                    timeout,
                ))
            })
            .await?;

        info!(
            "Resolved '{}' with {} definition(s)",
            word.word,
            word.definitions.len()
        );
        Ok(word)
    }

    /// One round trip plus mapping, bounded by `timeout`.
    async fn attempt(
        attempt: u32,
        provider: ProviderId,
        client: Arc<dyn LexicalClient>,
        transformers: Arc<RwLock<TransformerRegistry>>,
        request: ProviderRequest,
        timeout: Duration,
    ) -> Result<WordInfo, LookupManagerError> {
        debug!("Provider attempt {}", attempt);

        let raw = match tokio::time::timeout(timeout, client.search_word(&request)).await {
            Ok(result) => result?,
            Err(_) => {
                let message = format!("no response within {:?}", timeout);
                return Err(ProviderError::Timeout(message).into());
            }
        };

        let transformer = transformers
            .read()
            .await
            .get(&provider)
            .cloned()
            .ok_or(LookupManagerError::NoTransformer(provider))?;

        Ok(transformer.map(&raw)?)
    }
}

impl Default for LookupManager {
    fn default() -> Self {
        Self::new(LookupConfig::default())
    }
}
