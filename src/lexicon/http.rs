//! HTTP plumbing shared by the provider clients.
//!
//! Every client funnels its transport outcomes through the classifiers
//! here so the manager only ever sees the [`ProviderError`] vocabulary.

use crate::env;
use crate::lexicon::types::ProviderError;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(env::provider::USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Network(format!("failed to build HTTP client: {}", e)))
}

/// Trim the word and reject input that can never produce a lookup.
pub fn validate_word(word: &str) -> Result<String, ProviderError> {
    let trimmed = word.trim();

    if trimmed.is_empty() {
        return Err(ProviderError::InvalidRequest(
            "word must not be empty".to_string(),
        ));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(ProviderError::InvalidRequest(format!(
            "word contains control characters: {:?}",
            trimmed
        )));
    }

    if trimmed.chars().count() > env::lookup::MAX_WORD_LENGTH {
        return Err(ProviderError::InvalidRequest(format!(
            "word exceeds {} characters",
            env::lookup::MAX_WORD_LENGTH
        )));
    }

    Ok(trimmed.to_string())
}

/// Map a non-success status to the client vocabulary.
pub fn classify_status(status: StatusCode, word: &str) -> Result<(), ProviderError> {
    if status.is_success() {
        return Ok(());
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ProviderError::NotFound(word.to_string()));
    }

    Err(ProviderError::Api {
        status: Some(status.as_u16()),
        message: format!("provider returned status {}", status),
    })
}

pub fn classify_transport_error(error: &reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(error.to_string())
    } else if error.is_decode() || error.is_body() {
        ProviderError::api(format!("malformed response: {}", error))
    } else if let Some(status) = error.status() {
        ProviderError::Api {
            status: Some(status.as_u16()),
            message: error.to_string(),
        }
    } else {
        ProviderError::Network(error.to_string())
    }
}

/// Parse a configured base URL, reporting failures as API errors.
pub fn parse_base_url(base_url: &str) -> Result<Url, ProviderError> {
    Url::parse(base_url)
        .map_err(|e| ProviderError::api(format!("invalid base URL '{}': {}", base_url, e)))
}
