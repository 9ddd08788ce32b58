//! Lexicala provider (RapidAPI gateway).
//!
//! Request: `GET {base_url}?text={word}&language={target}` with the API
//! key and host headers. Response: `{ n_results, results: [...] }` where
//! every result carries a headword (object or array of objects) and a
//! list of senses. `n_results == 0` or an empty result list means the
//! word is unknown.

use crate::config::{ConfigError, LexicalaSettings};
use crate::env;
use crate::lexicon::connectivity::ConnectivityHandle;
use crate::lexicon::frequency::{dedup_preserving_order, estimate, from_rank};
use crate::lexicon::http::{
    build_http_client, classify_status, classify_transport_error, parse_base_url, validate_word,
};
use crate::lexicon::provider::{LexicalClient, ResponseTransformer};
use crate::lexicon::types::{
    Definition, PartOfSpeechGroup, ProviderError, ProviderId, ProviderRequest, RawPayload,
    WordInfo,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct LexicalaClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    api_host: String,
    connectivity: ConnectivityHandle,
}

impl LexicalaClient {
    pub fn new(
        settings: &LexicalaSettings,
        timeout: Duration,
        connectivity: ConnectivityHandle,
    ) -> Result<Self, ConfigError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredentials(ProviderId::Lexicala))?
            .to_string();

        let base_url = parse_base_url(&settings.base_url)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let http = build_http_client(timeout).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key,
            api_host: settings.api_host.clone(),
            connectivity,
        })
    }

    fn search_url(&self, word: &str, language: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("text", word)
            .append_pair("language", language);
        url
    }
}

#[async_trait]
impl LexicalClient for LexicalaClient {
    async fn search_word(&self, request: &ProviderRequest) -> Result<RawPayload, ProviderError> {
        let word = validate_word(&request.word)?;

        if !self.is_available() {
            return Err(ProviderError::Network("client is offline".to_string()));
        }

        let url = self.search_url(&word, &request.target_language);
        debug!("Lexicala request: {}", url);

        let response = self
            .http
            .get(url)
            .header(env::provider::API_KEY_HEADER, &self.api_key)
            .header(env::provider::API_HOST_HEADER, &self.api_host)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        classify_status(response.status(), &word)?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        check_result_set(&body, &word)?;

        Ok(RawPayload {
            provider: ProviderId::Lexicala,
            word,
            target_language: request.target_language.clone(),
            body,
            received_at: Utc::now(),
        })
    }

    fn is_available(&self) -> bool {
        self.connectivity.is_online()
    }

    fn provider_id(&self) -> ProviderId {
        ProviderId::Lexicala
    }
}

/// A zero count or an empty `results` array means the word is unknown; a
/// body without a `results` array is not a Lexicala answer at all.
fn check_result_set(body: &serde_json::Value, word: &str) -> Result<(), ProviderError> {
    if body.get("n_results").and_then(|n| n.as_u64()) == Some(0) {
        return Err(ProviderError::NotFound(word.to_string()));
    }

    match body.get("results").and_then(|r| r.as_array()) {
        Some(results) if results.is_empty() => Err(ProviderError::NotFound(word.to_string())),
        Some(_) => Ok(()),
        None => Err(ProviderError::api(
            "unexpected Lexicala payload: missing results array",
        )),
    }
}

// -- Payload shape --

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<LexEntry>,
}

#[derive(Debug, Deserialize)]
struct LexEntry {
    headword: Option<OneOrMany<Headword>>,
    #[serde(default)]
    senses: Vec<LexSense>,
    /// Corpus rank, served either as a number or a numeric string
    frequency: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Headword {
    text: Option<String>,
    pos: Option<OneOrMany<String>>,
    pronunciation: Option<OneOrMany<Pronunciation>>,
}

#[derive(Debug, Deserialize)]
struct Pronunciation {
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LexSense {
    definition: Option<String>,
    #[serde(default)]
    examples: Vec<LexExample>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
    range_of_application: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LexExample {
    text: Option<String>,
}

fn parse_rank(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub struct LexicalaTransformer;

impl ResponseTransformer for LexicalaTransformer {
    fn map(&self, raw: &RawPayload) -> Result<WordInfo, ProviderError> {
        let response: SearchResponse = serde_json::from_value(raw.body.clone())
            .map_err(|e| ProviderError::api(format!("unexpected Lexicala payload: {}", e)))?;

        let mut headword_text = None;
        let mut phonetic = None;
        let mut rank = None;
        let mut definitions = Vec::new();
        let mut groups: Vec<PartOfSpeechGroup> = Vec::new();

        for entry in response.results {
            let headwords = entry.headword.map(OneOrMany::into_vec).unwrap_or_default();

            if headword_text.is_none() {
                headword_text = headwords
                    .iter()
                    .filter_map(|h| h.text.as_deref())
                    .map(|t| t.trim().to_lowercase())
                    .find(|t| !t.is_empty());
            }

            if phonetic.is_none() {
                phonetic = headwords
                    .iter()
                    .filter_map(|h| h.pronunciation.as_ref())
                    .flat_map(|p| match p {
                        OneOrMany::One(p) => vec![p],
                        OneOrMany::Many(ps) => ps.iter().collect(),
                    })
                    .filter_map(|p| p.value.as_deref())
                    .map(str::trim)
                    .find(|v| !v.is_empty())
                    .map(str::to_string);
            }

            if rank.is_none() {
                rank = entry.frequency.as_ref().and_then(parse_rank);
            }

            let part_of_speech = headwords
                .into_iter()
                .filter_map(|h| h.pos)
                .flat_map(OneOrMany::into_vec)
                .map(|p| p.trim().to_string())
                .find(|p| !p.is_empty());

            for sense in entry.senses {
                let Some(text) = sense
                    .definition
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                else {
                    continue;
                };

                if let Some(pos) = &part_of_speech {
                    match groups.iter_mut().find(|g| &g.kind == pos) {
                        Some(group) => group.definitions.push(text.clone()),
                        None => groups.push(PartOfSpeechGroup {
                            kind: pos.clone(),
                            definitions: vec![text.clone()],
                        }),
                    }
                }

                definitions.push(Definition {
                    definition: text,
                    part_of_speech: part_of_speech.clone(),
                    examples: dedup_preserving_order(
                        sense.examples.iter().filter_map(|e| e.text.as_deref()),
                    ),
                    synonyms: dedup_preserving_order(&sense.synonyms),
                    antonyms: dedup_preserving_order(&sense.antonyms),
                    context: sense
                        .range_of_application
                        .map(|c| c.trim().to_string())
                        .filter(|c| !c.is_empty()),
                });
            }
        }

        let word = headword_text.unwrap_or_else(|| raw.word.trim().to_lowercase());

        let examples = dedup_preserving_order(definitions.iter().flat_map(|d| d.examples.iter()));
        let synonyms = dedup_preserving_order(definitions.iter().flat_map(|d| d.synonyms.iter()));
        let antonyms = dedup_preserving_order(definitions.iter().flat_map(|d| d.antonyms.iter()));

        let frequency = match rank {
            Some(rank) => from_rank(rank),
            None => estimate(&word, definitions.len()),
        };

        if definitions.is_empty() {
            definitions.push(Definition::placeholder(&word));
        }

        Ok(WordInfo {
            word,
            phonetic,
            definitions,
            parts_of_speech: groups,
            examples,
            synonyms,
            antonyms,
            frequency: Some(frequency),
            source: ProviderId::Lexicala.to_string(),
            last_updated: raw.received_at,
        })
    }

    fn provider_id(&self) -> ProviderId {
        ProviderId::Lexicala
    }
}
