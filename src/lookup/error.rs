use crate::lexicon::types::{ProviderError, ProviderId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes exposed to every caller of the lookup service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Provider confirms there is no entry; never retried
    WordNotFound,
    /// Blank or malformed input; fails before any network attempt
    InvalidRequest,
    /// Transport failure; retried
    NetworkError,
    /// Non-success status or malformed/empty response; retried
    ApiError,
    /// Deadline exceeded; retried
    Timeout,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorCode::WordNotFound => "WORD_NOT_FOUND",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
        };
        f.write_str(code)
    }
}

impl From<&ProviderError> for ErrorCode {
    fn from(error: &ProviderError) -> Self {
        match error {
            ProviderError::NotFound(_) => ErrorCode::WordNotFound,
            ProviderError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            ProviderError::Network(_) => ErrorCode::NetworkError,
            ProviderError::Api { .. } => ErrorCode::ApiError,
            ProviderError::Timeout(_) => ErrorCode::Timeout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// The only error type that crosses the service boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct LookupError {
    pub code: ErrorCode,
    pub message: String,
    pub details: ErrorDetails,
}

impl LookupError {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: ErrorDetails) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    /// Error raised by every call while the service is switched off.
    pub fn disabled(details: ErrorDetails) -> Self {
        Self::new(ErrorCode::ApiError, "service is disabled", details)
    }
}

impl ErrorDetails {
    pub fn new(
        word: impl Into<String>,
        from_language: Option<&str>,
        target_language: Option<&str>,
    ) -> Self {
        Self {
            word: word.into(),
            from_language: from_language.map(str::to_string),
            target_language: target_language.map(str::to_string),
            timestamp: Utc::now(),
        }
    }
}

/// Failures produced by the lookup manager
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupManagerError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("client not available for {0}")]
    ClientNotRegistered(ProviderId),
    #[error("client not available: {0}")]
    ClientUnavailable(ProviderId),
    #[error("no transformer available for provider {0}")]
    NoTransformer(ProviderId),
}

impl LookupManagerError {
    /// Canonical code for this failure. Configuration problems carry no
    /// code of their own and surface as API errors.
    pub fn code(&self) -> ErrorCode {
        match self {
            LookupManagerError::Provider(error) => ErrorCode::from(error),
            LookupManagerError::ClientUnavailable(_) => ErrorCode::NetworkError,
            LookupManagerError::ClientNotRegistered(_) | LookupManagerError::NoTransformer(_) => {
                ErrorCode::ApiError
            }
        }
    }

    /// Only transient provider outcomes deserve another attempt.
    pub fn is_retriable(&self) -> bool {
        matches!(self, LookupManagerError::Provider(error) if error.is_retriable())
    }

    pub fn into_lookup_error(self, details: ErrorDetails) -> LookupError {
        LookupError::new(self.code(), self.to_string(), details)
    }
}
