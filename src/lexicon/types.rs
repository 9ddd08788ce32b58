use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical, provider-independent word information.
///
/// Created once per successful provider round trip and never mutated
/// afterwards; consumers must not assume any provider shape behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    pub definitions: Vec<Definition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts_of_speech: Vec<PartOfSpeechGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    pub source: String,
    pub last_updated: DateTime<Utc>,
}

/// A single sense of a word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub antonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Definitions grouped under one part of speech, in provider order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartOfSpeechGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub definitions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrequencyLevel {
    Common,
    Uncommon,
    Rare,
    VeryRare,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frequency {
    pub level: FrequencyLevel,
    /// Normalized to `0.0..=1.0`, higher means more frequent.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl Definition {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
            part_of_speech: None,
            examples: Vec::new(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            context: None,
        }
    }

    /// Definition synthesized when a provider supplies no senses.
    pub fn placeholder(word: &str) -> Self {
        Self::new(format!("Word: {}", word))
    }
}

impl WordInfo {
    /// Minimal well-formedness: a word, at least one definition, and no
    /// blank definition text.
    pub fn is_well_formed(&self) -> bool {
        !self.word.trim().is_empty()
            && !self.definitions.is_empty()
            && self
                .definitions
                .iter()
                .all(|d| !d.definition.trim().is_empty())
    }
}

impl fmt::Display for FrequencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FrequencyLevel::Common => "common",
            FrequencyLevel::Uncommon => "uncommon",
            FrequencyLevel::Rare => "rare",
            FrequencyLevel::VeryRare => "very-rare",
        };
        f.write_str(label)
    }
}

/// Supported lexical data providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// dictionaryapi.dev: meanings array of part-of-speech + definitions
    FreeDictionary,
    /// Lexicala: results array of headword + senses, API key required
    Lexicala,
}

impl ProviderId {
    pub const ALL: [ProviderId; 2] = [ProviderId::FreeDictionary, ProviderId::Lexicala];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::FreeDictionary => "free_dictionary",
            ProviderId::Lexicala => "lexicala",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "free_dictionary" | "freedictionary" => Ok(ProviderId::FreeDictionary),
            "lexicala" => Ok(ProviderId::Lexicala),
            other => Err(format!("unknown provider '{}'", other)),
        }
    }
}

/// Request handed to a provider client for one round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub word: String,
    pub from_language: Option<String>,
    pub target_language: String,
}

/// Raw provider response, kept opaque until a transformer maps it
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayload {
    pub provider: ProviderId,
    /// Word as it was requested, used when the payload lacks a headword
    pub word: String,
    pub target_language: String,
    pub body: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

/// Outcome vocabulary shared by all provider clients
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Word not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },
    #[error("Request timed out: {0}")]
    Timeout(String),
}

impl ProviderError {
    pub fn api(message: impl Into<String>) -> Self {
        ProviderError::Api {
            status: None,
            message: message.into(),
        }
    }

    /// Definitive outcomes are surfaced immediately; everything else is
    /// worth another attempt.
    pub fn is_retriable(&self) -> bool {
        match self {
            ProviderError::NotFound(_) | ProviderError::InvalidRequest(_) => false,
            ProviderError::Network(_) | ProviderError::Api { .. } | ProviderError::Timeout(_) => {
                true
            }
        }
    }
}
