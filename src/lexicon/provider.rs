use crate::config::{ConfigError, LookupSettings};
use crate::lexicon::connectivity::ConnectivityMonitor;
use crate::lexicon::free_dictionary::{FreeDictionaryClient, FreeDictionaryTransformer};
use crate::lexicon::lexicala::{LexicalaClient, LexicalaTransformer};
use crate::lexicon::types::{ProviderError, ProviderId, ProviderRequest, RawPayload, WordInfo};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Wire-level client for one external lexical API
#[async_trait]
pub trait LexicalClient: Send + Sync {
    /// Perform one round trip for `request`.
    ///
    /// Blank words fail with [`ProviderError::InvalidRequest`] before any
    /// network attempt, and an offline client fails with
    /// [`ProviderError::Network`] without calling out.
    async fn search_word(&self, request: &ProviderRequest) -> Result<RawPayload, ProviderError>;

    /// Whether the client currently believes it can reach its provider
    fn is_available(&self) -> bool;

    /// Provider this client speaks for
    fn provider_id(&self) -> ProviderId;
}

/// Pure mapping from one provider's payload to the canonical word model
pub trait ResponseTransformer: Send + Sync {
    /// Map a raw payload. Missing optional fields degrade gracefully;
    /// only a body that does not have the provider's shape at all is
    /// reported, as [`ProviderError::Api`].
    fn map(&self, raw: &RawPayload) -> Result<WordInfo, ProviderError>;

    /// Minimal well-formedness check available to callers
    fn validate(&self, candidate: &WordInfo) -> bool {
        candidate.is_well_formed()
    }

    fn provider_id(&self) -> ProviderId;
}

/// Client and transformer registered together under one provider id
#[derive(Clone)]
pub struct ProviderPair {
    pub client: Arc<dyn LexicalClient>,
    pub transformer: Arc<dyn ResponseTransformer>,
}

/// Factory for creating provider clients from settings
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create(
        provider: ProviderId,
        settings: &LookupSettings,
        connectivity: &ConnectivityMonitor,
    ) -> Result<ProviderPair, ConfigError> {
        let timeout = settings.timeout();
        debug!("Creating provider {} (timeout {:?})", provider, timeout);

        match provider {
            ProviderId::FreeDictionary => Ok(ProviderPair {
                client: Arc::new(FreeDictionaryClient::new(
                    &settings.providers.free_dictionary,
                    timeout,
                    connectivity.subscribe(),
                )?),
                transformer: Arc::new(FreeDictionaryTransformer),
            }),
            ProviderId::Lexicala => Ok(ProviderPair {
                client: Arc::new(LexicalaClient::new(
                    &settings.providers.lexicala,
                    timeout,
                    connectivity.subscribe(),
                )?),
                transformer: Arc::new(LexicalaTransformer),
            }),
        }
    }
}
