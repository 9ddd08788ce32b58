//! Free Dictionary API (dictionaryapi.dev) provider.
//!
//! Request: `GET {base_url}/{language}/{word}`, no credentials.
//! Response: an array of entries, each carrying a `meanings` array of
//! part-of-speech groups with their definitions. A 404 or an empty array
//! means the word is unknown.

use crate::config::{ConfigError, FreeDictionarySettings};
use crate::lexicon::connectivity::ConnectivityHandle;
use crate::lexicon::frequency::{dedup_preserving_order, estimate};
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

pub struct FreeDictionaryClient {
    http: reqwest::Client,
    base_url: Url,
    connectivity: ConnectivityHandle,
}

impl FreeDictionaryClient {
    pub fn new(
        settings: &FreeDictionarySettings,
        timeout: Duration,
        connectivity: ConnectivityHandle,
    ) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&settings.base_url)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "free dictionary base URL cannot carry a path: {}",
                settings.base_url
            )));
        }
        let http = build_http_client(timeout).map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            connectivity,
        })
    }

    fn entry_url(&self, language: &str, word: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(language).push(word);
        }
        url
    }
}

#[async_trait]
impl LexicalClient for FreeDictionaryClient {
    async fn search_word(&self, request: &ProviderRequest) -> Result<RawPayload, ProviderError> {
        let word = validate_word(&request.word)?;

        if !self.is_available() {
            return Err(ProviderError::Network("client is offline".to_string()));
        }

        let url = self.entry_url(&request.target_language, &word);
        debug!("Free Dictionary request: {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        classify_status(response.status(), &word)?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        check_entries(&body, &word)?;

        Ok(RawPayload {
            provider: ProviderId::FreeDictionary,
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
        ProviderId::FreeDictionary
    }
}

/// The API answers with a list of entries; an empty list means the word
/// is unknown, anything else is a malformed response.
fn check_entries(body: &serde_json::Value, word: &str) -> Result<(), ProviderError> {
    match body.as_array() {
        Some(entries) if entries.is_empty() => Err(ProviderError::NotFound(word.to_string())),
        Some(_) => Ok(()),
        None => Err(ProviderError::api(
            "unexpected Free Dictionary payload: expected an entry list",
        )),
    }
}

// -- Payload shape --

#[derive(Debug, Deserialize)]
struct Entry {
    word: Option<String>,
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<Phonetic>,
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(rename = "partOfSpeech")]
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<Sense>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Sense {
    #[serde(default)]
    definition: String,
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

pub struct FreeDictionaryTransformer;

impl ResponseTransformer for FreeDictionaryTransformer {
    fn map(&self, raw: &RawPayload) -> Result<WordInfo, ProviderError> {
        let entries: Vec<Entry> = serde_json::from_value(raw.body.clone()).map_err(|e| {
            ProviderError::api(format!("unexpected Free Dictionary payload: {}", e))
        })?;

        let word = entries
            .iter()
            .filter_map(|e| e.word.as_deref())
            .map(|w| w.trim().to_lowercase())
            .find(|w| !w.is_empty())
            .unwrap_or_else(|| raw.word.trim().to_lowercase());

        let phonetic = entries
            .iter()
            .filter_map(|e| e.phonetic.as_deref())
            .chain(
                entries
                    .iter()
                    .flat_map(|e| e.phonetics.iter())
                    .filter_map(|p| p.text.as_deref()),
            )
            .map(str::trim)
            .find(|p| !p.is_empty())
            .map(str::to_string);

        let mut definitions = Vec::new();
        let mut groups: Vec<PartOfSpeechGroup> = Vec::new();
        let mut synonyms = Vec::new();
        let mut antonyms = Vec::new();

        for meaning in entries.iter().flat_map(|e| e.meanings.iter()) {
            let part_of_speech = meaning
                .part_of_speech
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string);

            for sense in &meaning.definitions {
                let text = sense.definition.trim();
                if text.is_empty() {
                    continue;
                }

                if let Some(pos) = &part_of_speech {
                    match groups.iter_mut().find(|g| &g.kind == pos) {
                        Some(group) => group.definitions.push(text.to_string()),
                        None => groups.push(PartOfSpeechGroup {
                            kind: pos.clone(),
                            definitions: vec![text.to_string()],
                        }),
                    }
                }

                synonyms.extend(sense.synonyms.iter().cloned());
                antonyms.extend(sense.antonyms.iter().cloned());

                definitions.push(Definition {
                    definition: text.to_string(),
                    part_of_speech: part_of_speech.clone(),
                    examples: dedup_preserving_order(sense.example.iter()),
                    synonyms: dedup_preserving_order(&sense.synonyms),
                    antonyms: dedup_preserving_order(&sense.antonyms),
                    context: None,
                });
            }

            synonyms.extend(meaning.synonyms.iter().cloned());
            antonyms.extend(meaning.antonyms.iter().cloned());
        }

        let examples =
            dedup_preserving_order(definitions.iter().flat_map(|d| d.examples.iter()));
        let frequency = estimate(&word, definitions.len());

        if definitions.is_empty() {
            definitions.push(Definition::placeholder(&word));
        }

        Ok(WordInfo {
            word,
            phonetic,
            definitions,
            parts_of_speech: groups,
            examples,
            synonyms: dedup_preserving_order(synonyms),
            antonyms: dedup_preserving_order(antonyms),
            frequency: Some(frequency),
            source: ProviderId::FreeDictionary.to_string(),
            last_updated: raw.received_at,
        })
    }

    fn provider_id(&self) -> ProviderId {
        ProviderId::FreeDictionary
    }
}
