use super::*;
use crate::lexicon::free_dictionary::FreeDictionaryTransformer;
use crate::lexicon::provider::{LexicalClient, ResponseTransformer};
use crate::lexicon::types::{ProviderError, ProviderId, ProviderRequest, RawPayload};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Client that replays scripted outcomes and counts its invocations.
/// Once the script runs out it keeps answering with the fallback body.
struct ScriptedClient {
    provider: ProviderId,
    script: Mutex<VecDeque<Result<serde_json::Value, ProviderError>>>,
    fallback: serde_json::Value,
    calls: AtomicU32,
    available: AtomicBool,
    delay: Duration,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedClient {
    fn new(script: Vec<Result<serde_json::Value, ProviderError>>) -> Arc<Self> {
        Self::build(script, Duration::ZERO)
    }

    fn slow(delay: Duration) -> Arc<Self> {
        Self::build(Vec::new(), delay)
    }

    fn build(script: Vec<Result<serde_json::Value, ProviderError>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            provider: ProviderId::FreeDictionary,
            script: Mutex::new(script.into()),
            fallback: hello_body(),
            calls: AtomicU32::new(0),
            available: AtomicBool::new(true),
            delay,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LexicalClient for ScriptedClient {
    async fn search_word(&self, request: &ProviderRequest) -> Result<RawPayload, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()));

        outcome.map(|body| RawPayload {
            provider: self.provider,
            word: request.word.clone(),
            target_language: request.target_language.clone(),
            body,
            received_at: Utc::now(),
        })
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn provider_id(&self) -> ProviderId {
        self.provider
    }
}

fn hello_body() -> serde_json::Value {
    json!([{
        "word": "hello",
        "phonetic": "/həˈloʊ/",
        "meanings": [
            {
                "partOfSpeech": "noun",
                "definitions": [{ "definition": "A greeting.", "synonyms": ["greeting"] }]
            },
            {
                "partOfSpeech": "verb",
                "definitions": [{ "definition": "To greet with \"hello\".", "synonyms": ["greeting", "hail"] }]
            }
        ]
    }])
}

fn transient() -> ProviderError {
    ProviderError::Network("connection reset".to_string())
}

fn test_config(retry_attempts: u32) -> LookupConfig {
    LookupConfig {
        primary_provider: ProviderId::FreeDictionary,
        timeout_ms: 5_000,
        retry_attempts,
        backoff_base_ms: 10,
        backoff_jitter: 0.0,
    }
}

async fn manager_with(client: Arc<ScriptedClient>, retry_attempts: u32) -> Arc<LookupManager> {
    let manager = Arc::new(LookupManager::new(test_config(retry_attempts)));
    manager
        .add_client(ProviderId::FreeDictionary, client)
        .await;
    manager
        .add_transformer(ProviderId::FreeDictionary, Arc::new(FreeDictionaryTransformer))
        .await;
    manager
}

async fn service_with(client: Arc<ScriptedClient>, retry_attempts: u32) -> LookupService {
    let manager = manager_with(client, retry_attempts).await;
    LookupService::new(manager, Duration::from_secs(30 * 60))
}

// -- Manager --

#[tokio::test(start_paused = true)]
async fn test_manager_returns_canonical_word() {
    let client = ScriptedClient::new(vec![]);
    let manager = manager_with(client.clone(), 2).await;

    let word = manager.search_word(LookupParams::new("hello")).await.unwrap();
    assert_eq!(word.word, "hello");
    assert_eq!(word.definitions.len(), 2);
    assert_eq!(word.synonyms, vec!["greeting", "hail"]);
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_manager_defaults_target_language() {
    let client = ScriptedClient::new(vec![]);
    let manager = manager_with(client.clone(), 2).await;

    manager
        .search_word(LookupParams::new("hello").from_language("de"))
        .await
        .unwrap();

    let request = client.last_request().unwrap();
    assert_eq!(request.target_language, "en");
    assert_eq!(request.from_language.as_deref(), Some("de"));
}

#[tokio::test(start_paused = true)]
async fn test_retry_bound_exhausted() {
    for attempts in 1..=4 {
        let client = ScriptedClient::new(
            (0..attempts)
                .map(|i| Err(ProviderError::api(format!("failure {}", i + 1))))
                .collect(),
        );
        let manager = manager_with(client.clone(), attempts).await;

        let error = manager
            .search_word(LookupParams::new("hello"))
            .await
            .unwrap_err();

        assert_eq!(client.calls(), attempts);
        assert_eq!(
            error,
            LookupManagerError::Provider(ProviderError::api(format!("failure {}", attempts)))
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_retry_succeeds_on_final_attempt() {
    let attempts = 3;
    let client = ScriptedClient::new(vec![Err(transient()), Err(transient())]);
    let manager = manager_with(client.clone(), attempts).await;

    let word = manager.search_word(LookupParams::new("hello")).await.unwrap();
    assert_eq!(word.word, "hello");
    assert_eq!(client.calls(), attempts);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_body_is_retried() {
    let client = ScriptedClient::new(vec![Ok(json!({ "title": "upstream glitch" }))]);
    let manager = manager_with(client.clone(), 2).await;

    let word = manager.search_word(LookupParams::new("hello")).await.unwrap();
    assert_eq!(word.word, "hello");
    assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_persistently_malformed_body_is_api_error() {
    let client = ScriptedClient::new(vec![
        Ok(json!({ "title": "upstream glitch" })),
        Ok(json!("not an entry list")),
    ]);
    let service = service_with(client.clone(), 2).await;

    let error = service.get_word_info("hello", None, None).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ApiError);
    assert_eq!(client.calls(), 2);
    assert_eq!(service.get_cache_stats().unwrap().size, 0);
}

#[test]
fn test_config_jitter_reaches_policy() {
    let config = LookupConfig {
        backoff_base_ms: 100,
        backoff_jitter: 0.5,
        ..test_config(3)
    };
    let policy = config.retry_policy();

    for _ in 0..50 {
        let delay = policy.delay_for(1);
        assert!(delay >= Duration::from_millis(99), "{:?}", delay);
        assert!(delay <= Duration::from_millis(300), "{:?}", delay);
    }
    assert_eq!(
        test_config(3).retry_policy().delay_for(1),
        Duration::from_millis(20)
    );
}

#[tokio::test(start_paused = true)]
async fn test_definitive_outcomes_not_retried() {
    for outcome in [
        ProviderError::NotFound("zzzznotaword".to_string()),
        ProviderError::InvalidRequest("word must not be empty".to_string()),
    ] {
        let client = ScriptedClient::new(vec![Err(outcome.clone())]);
        let manager = manager_with(client.clone(), 5).await;

        let error = manager
            .search_word(LookupParams::new("zzzznotaword"))
            .await
            .unwrap_err();

        assert_eq!(client.calls(), 1);
        assert_eq!(error, LookupManagerError::Provider(outcome));
    }
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_client_is_never_called() {
    let client = ScriptedClient::new(vec![]);
    client.set_available(false);
    let manager = manager_with(client.clone(), 3).await;

    let error = manager
        .search_word(LookupParams::new("hello"))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        LookupManagerError::ClientUnavailable(ProviderId::FreeDictionary)
    );
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_missing_client_is_configuration_error() {
    let manager = LookupManager::new(test_config(2));

    let error = manager
        .search_word(LookupParams::new("hello"))
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "client not available for free_dictionary");
    assert_eq!(error.code(), ErrorCode::ApiError);
}

#[tokio::test(start_paused = true)]
async fn test_missing_transformer_after_successful_request() {
    let client = ScriptedClient::new(vec![]);
    let manager = manager_with(client.clone(), 2).await;
    let removed = manager.remove_transformer(ProviderId::FreeDictionary).await;
    assert!(removed.is_some());

    let error = manager
        .search_word(LookupParams::new("hello"))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        LookupManagerError::NoTransformer(ProviderId::FreeDictionary)
    );
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out_and_is_retried() {
    let client = ScriptedClient::slow(Duration::from_secs(60));
    let manager = manager_with(client.clone(), 2).await;
    manager
        .update_config(LookupConfig {
            timeout_ms: 100,
            ..test_config(2)
        })
        .await;

    let error = manager
        .search_word(LookupParams::new("hello"))
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        LookupManagerError::Provider(ProviderError::Timeout(_))
    ));
    assert_eq!(error.code(), ErrorCode::Timeout);
    assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_config_switches_primary_provider() {
    let free = ScriptedClient::new(vec![]);
    let manager = manager_with(free.clone(), 2).await;

    let mut config = manager.get_config().await;
    config.primary_provider = ProviderId::Lexicala;
    manager.update_config(config.clone()).await;
    assert_eq!(manager.get_config().await, config);

    // Nothing registered under the new primary provider yet
    let error = manager
        .search_word(LookupParams::new("hello"))
        .await
        .unwrap_err();
    assert_eq!(
        error,
        LookupManagerError::ClientNotRegistered(ProviderId::Lexicala)
    );
    assert_eq!(free.calls(), 0);

    let removed = manager.remove_client(ProviderId::FreeDictionary).await;
    assert!(removed.is_some());
    assert!(manager.registered_providers().await.is_empty());
}

#[test]
fn test_transformer_contract_on_zero_senses() {
    let raw = RawPayload {
        provider: ProviderId::FreeDictionary,
        word: "hello".to_string(),
        target_language: "en".to_string(),
        body: json!([{ "word": "hello", "meanings": [] }]),
        received_at: Utc::now(),
    };

    let word = FreeDictionaryTransformer.map(&raw).unwrap();
    assert!(FreeDictionaryTransformer.validate(&word));
    assert_eq!(word.definitions.len(), 1);
}

// -- Service --

#[tokio::test(start_paused = true)]
async fn test_second_lookup_served_from_cache() {
    let client = ScriptedClient::new(vec![]);
    let service = service_with(client.clone(), 2).await;

    let first = service.get_word_info("hello", None, None).await.unwrap();
    assert_eq!(client.calls(), 1);
    assert_eq!(first.definitions.len(), 2);

    let second = service.get_word_info("hello", None, None).await.unwrap();
    assert_eq!(client.calls(), 1);
    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn test_normalization_shares_cache_key() {
    let client = ScriptedClient::new(vec![]);
    let service = service_with(client.clone(), 2).await;

    let a = service.get_word_info("  Hello ", None, None).await.unwrap();
    let b = service.get_word_info("HELLO", None, None).await.unwrap();
    let c = service.get_word_info("hello", None, None).await.unwrap();

    assert_eq!(client.calls(), 1);
    assert_eq!(a, b);
    assert_eq!(b, c);
    assert_eq!(client.last_request().unwrap().word, "hello");

    let stats = service.get_cache_stats().unwrap();
    assert_eq!(stats.keys, vec!["hello:default:en".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_languages_are_part_of_the_key() {
    let client = ScriptedClient::new(vec![]);
    let service = service_with(client.clone(), 2).await;

    service.get_word_info("hello", None, Some("en")).await.unwrap();
    service.get_word_info("hello", Some("de"), Some("en")).await.unwrap();
    service.get_word_info("hello", None, Some("fr")).await.unwrap();

    assert_eq!(client.calls(), 3);
    assert_eq!(
        service.get_cache_stats().unwrap().keys,
        vec!["hello:de:en", "hello:default:en", "hello:default:fr"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_blank_source_language_is_unspecified() {
    let client = ScriptedClient::new(vec![]);
    let service = service_with(client.clone(), 2).await;

    service.get_word_info("hello", Some("  "), None).await.unwrap();
    assert_eq!(client.last_request().unwrap().from_language, None);

    service.get_word_info("hello", None, None).await.unwrap();
    assert_eq!(client.calls(), 1);

    service.get_word_info("hola", Some(" es "), None).await.unwrap();
    assert_eq!(client.last_request().unwrap().from_language.as_deref(), Some("es"));
    assert_eq!(
        service.get_cache_stats().unwrap().keys,
        vec!["hello:default:en", "hola:es:en"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_entry_expires_after_ttl() {
    let client = ScriptedClient::new(vec![]);
    let service = service_with(client.clone(), 2).await;

    service.get_word_info("hello", None, None).await.unwrap();
    service.get_word_info("world", None, None).await.unwrap();
    assert_eq!(client.calls(), 2);

    tokio::time::advance(Duration::from_secs(30 * 60 - 1)).await;
    service.get_word_info("hello", None, None).await.unwrap();
    assert_eq!(client.calls(), 2);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(service.get_cached_word("hello", None, None).unwrap().is_none());

    service.get_word_info("hello", None, None).await.unwrap();
    assert_eq!(client.calls(), 3);

    // The fresh write compacted the expired "world" entry
    let stats = service.get_cache_stats().unwrap();
    assert_eq!(stats.keys, vec!["hello:default:en".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_compacted_by_other_write() {
    let client = ScriptedClient::new(vec![]);
    let service = service_with(client.clone(), 2).await;

    service.get_word_info("hello", None, None).await.unwrap();
    assert!(service.expire_cached_word("hello", None, None).unwrap());
    assert_eq!(service.get_cache_stats().unwrap().size, 1);

    service.get_word_info("world", None, None).await.unwrap();

    let stats = service.get_cache_stats().unwrap();
    assert_eq!(stats.size, 1);
    assert_eq!(stats.keys, vec!["world:default:en".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_maps_to_word_not_found() {
    let client = ScriptedClient::new(vec![Err(ProviderError::NotFound(
        "zzzznotaword".to_string(),
    ))]);
    let service = service_with(client.clone(), 2).await;

    let error = service
        .get_word_info("zzzznotaword", None, None)
        .await
        .unwrap_err();

    assert_eq!(error.code, ErrorCode::WordNotFound);
    assert_eq!(error.details.word, "zzzznotaword");
    assert_eq!(error.details.target_language.as_deref(), Some("en"));
    assert_eq!(client.calls(), 1);
    assert_eq!(service.get_cache_stats().unwrap().size, 0);
}

#[tokio::test(start_paused = true)]
async fn test_transient_twice_with_two_attempts_fails() {
    let client = ScriptedClient::new(vec![
        Err(transient()),
        Err(ProviderError::Timeout("second".to_string())),
    ]);
    let service = service_with(client.clone(), 2).await;

    let error = service.get_word_info("hello", None, None).await.unwrap_err();

    assert_eq!(client.calls(), 2);
    assert_eq!(error.code, ErrorCode::Timeout);
    assert!(service.get_cached_word("hello", None, None).unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_disabled_service_rejects_everything() {
    let client = ScriptedClient::new(vec![]);
    let service = service_with(client.clone(), 2).await;
    service.set_disabled(true);

    let lookup = service.get_word_info("hello", None, None).await.unwrap_err();
    assert_eq!(lookup.code, ErrorCode::ApiError);
    assert_eq!(lookup.message, "service is disabled");

    let blank = service.get_word_info("   ", None, None).await.unwrap_err();
    assert_eq!(blank.code, ErrorCode::ApiError);

    assert_eq!(
        service.get_cached_word("hello", None, None).unwrap_err().code,
        ErrorCode::ApiError
    );
    assert_eq!(service.clear_cache().unwrap_err().code, ErrorCode::ApiError);
    assert_eq!(service.get_cache_stats().unwrap_err().code, ErrorCode::ApiError);
    assert_eq!(client.calls(), 0);

    service.set_disabled(false);
    assert!(service.get_word_info("hello", None, None).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_get_cached_word_never_calls_provider() {
    let client = ScriptedClient::new(vec![]);
    let service = service_with(client.clone(), 2).await;

    assert!(service.get_cached_word("hello", None, None).unwrap().is_none());
    assert_eq!(client.calls(), 0);

    service.get_word_info("hello", None, None).await.unwrap();
    let cached = service.get_cached_word(" HELLO", None, None).unwrap();
    assert_eq!(cached.unwrap().word, "hello");
    assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_clear_cache_forces_new_round_trip() {
    let client = ScriptedClient::new(vec![]);
    let service = service_with(client.clone(), 2).await;

    service.get_word_info("hello", None, None).await.unwrap();
    service.clear_cache().unwrap();
    assert_eq!(service.get_cache_stats().unwrap().size, 0);

    service.get_word_info("hello", None, None).await.unwrap();
    assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_lookup_does_not_write() {
    let client = ScriptedClient::slow(Duration::from_secs(2));
    let service = service_with(client.clone(), 2).await;

    let abandoned = tokio::time::timeout(
        Duration::from_millis(500),
        service.get_word_info("hello", None, None),
    )
    .await;
    assert!(abandoned.is_err());
    assert_eq!(client.calls(), 1);

    tokio::time::advance(Duration::from_secs(5)).await;
    assert_eq!(service.get_cache_stats().unwrap().size, 0);
}

#[tokio::test(start_paused = true)]
async fn test_lookup_started_before_clear_is_not_cached() {
    let client = ScriptedClient::slow(Duration::from_secs(1));
    let service = Arc::new(service_with(client.clone(), 2).await);

    let pending = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.get_word_info("hello", None, None).await })
    };

    // Let the lookup reach the provider, then clear underneath it
    while client.calls() == 0 {
        tokio::task::yield_now().await;
    }
    service.clear_cache().unwrap();

    let word = pending.await.unwrap().unwrap();
    assert_eq!(word.word, "hello");
    assert_eq!(service.get_cache_stats().unwrap().size, 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_identical_lookups_are_not_coalesced() {
    let client = ScriptedClient::slow(Duration::from_millis(100));
    let service = service_with(client.clone(), 2).await;

    let (a, b) = tokio::join!(
        service.get_word_info("hello", None, None),
        service.get_word_info("hello", None, None)
    );

    // Separate round trips: same content, independent receive times
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.word, b.word);
    assert_eq!(a.definitions, b.definitions);
    assert_eq!(client.calls(), 2);
    assert_eq!(service.get_cache_stats().unwrap().size, 1);
}
