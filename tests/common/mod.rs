#![allow(dead_code)]

use wiremock::MockServer;
use word_lookup::LookupSettings;

/// Settings that route both providers to `server` with fast retries
pub fn settings_for(server: &MockServer) -> LookupSettings {
    let mut settings = LookupSettings {
        timeout_ms: 2_000,
        retry_attempts: 2,
        backoff_base_ms: 5,
        ..LookupSettings::default()
    };
    settings.providers.free_dictionary.base_url = format!("{}/api/v2/entries", server.uri());
    settings.providers.lexicala.base_url = format!("{}/search-entries", server.uri());
    settings.providers.lexicala.api_key = Some("test-key".to_string());
    settings
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

pub fn hello_entries() -> serde_json::Value {
    serde_json::json!([{
        "word": "hello",
        "phonetic": "/həˈloʊ/",
        "phonetics": [{ "text": "/həˈloʊ/" }],
        "meanings": [
            {
                "partOfSpeech": "noun",
                "definitions": [{
                    "definition": "\"Hello!\" or an equivalent greeting.",
                    "synonyms": ["greeting"],
                    "antonyms": []
                }],
                "synonyms": ["greeting"],
                "antonyms": ["bye"]
            },
            {
                "partOfSpeech": "interjection",
                "definitions": [{
                    "definition": "A greeting used when answering the telephone.",
                    "example": "Hello? How may I help you?"
                }]
            }
        ]
    }])
}

pub fn not_found_body() -> serde_json::Value {
    serde_json::json!({
        "title": "No Definitions Found",
        "message": "Sorry pal, we couldn't find definitions for the word you were looking for."
    })
}
