//! Caller-facing word lookup.
//!
//! [`LookupService`] normalizes the word, answers from the TTL cache when
//! it can, and otherwise delegates to the [`LookupManager`]. Every
//! failure leaves as a [`LookupError`] carrying one of the five canonical
//! codes. Concurrent lookups for the same uncached word are not
//! coalesced; each performs its own provider round trip.
//!
//! Dropping a pending `get_word_info` future abandons the lookup without
//! touching the cache, and a lookup that started before
//! [`LookupService::clear_cache`] never writes its result afterwards.

use crate::env;
use crate::lexicon::types::WordInfo;
use crate::lookup::cache::{CacheStats, WordCache};
use crate::lookup::error::{ErrorDetails, LookupError};
use crate::lookup::manager::{LookupManager, LookupParams};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct LookupService {
    manager: Arc<LookupManager>,
    cache: WordCache,
    disabled: AtomicBool,
    default_target_language: String,
}

impl LookupService {
    pub fn new(manager: Arc<LookupManager>, cache_ttl: Duration) -> Self {
        Self {
            manager,
            cache: WordCache::new(cache_ttl),
            disabled: AtomicBool::new(false),
            default_target_language: env::lookup::DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }

    pub fn with_default_target_language(mut self, language: impl Into<String>) -> Self {
        self.default_target_language = language.into();
        self
    }

    pub fn manager(&self) -> &Arc<LookupManager> {
        &self.manager
    }

    /// Operational kill switch; while set every call fails with API_ERROR.
    pub fn set_disabled(&self, disabled: bool) {
        if disabled {
            warn!("Lookup service disabled");
        } else {
            info!("Lookup service enabled");
        }
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// Trimmed, lowercased form used for keys and requests
    pub fn normalize(word: &str) -> String {
        word.trim().to_lowercase()
    }

    fn resolve_target<'a>(&'a self, target_language: Option<&'a str>) -> &'a str {
        target_language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.default_target_language)
    }

    /// Blank source languages mean "unspecified" for both key and request
    fn resolve_source(from_language: Option<&str>) -> Option<&str> {
        from_language.map(str::trim).filter(|l| !l.is_empty())
    }

    fn ensure_enabled(&self, details: impl FnOnce() -> ErrorDetails) -> Result<(), LookupError> {
        if self.is_disabled() {
            return Err(LookupError::disabled(details()));
        }
        Ok(())
    }

    pub async fn get_word_info(
        &self,
        word: &str,
        from_language: Option<&str>,
        target_language: Option<&str>,
    ) -> Result<WordInfo, LookupError> {
        let from_language = Self::resolve_source(from_language);
        let target = self.resolve_target(target_language);
        self.ensure_enabled(|| ErrorDetails::new(word, from_language, Some(target)))?;

        let normalized = Self::normalize(word);
        let key = WordCache::key(&normalized, from_language, target);

        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }
        debug!("Cache miss for {}", key);

        let generation = self.cache.generation();
        let mut params = LookupParams::new(normalized.clone()).target_language(target);
        params.from_language = from_language.map(str::to_string);

        match self.manager.search_word(params).await {
            Ok(info) => {
                self.cache.insert_if_current(key, info.clone(), generation);
                Ok(info)
            }
            Err(error) => {
                warn!("Lookup for '{}' failed: {}", normalized, error);
                Err(error.into_lookup_error(ErrorDetails::new(
                    normalized,
                    from_language,
                    Some(target),
                )))
            }
        }
    }

    /// Cached value only; never reaches the manager or the network.
    pub fn get_cached_word(
        &self,
        word: &str,
        from_language: Option<&str>,
        target_language: Option<&str>,
    ) -> Result<Option<WordInfo>, LookupError> {
        let from_language = Self::resolve_source(from_language);
        let target = self.resolve_target(target_language);
        self.ensure_enabled(|| ErrorDetails::new(word, from_language, Some(target)))?;

        let key = WordCache::key(&Self::normalize(word), from_language, target);
        Ok(self.cache.get(&key))
    }

    pub fn clear_cache(&self) -> Result<(), LookupError> {
        self.ensure_enabled(|| ErrorDetails::new("", None, None))?;
        self.cache.clear();
        info!("Word cache cleared");
        Ok(())
    }

    pub fn get_cache_stats(&self) -> Result<CacheStats, LookupError> {
        self.ensure_enabled(|| ErrorDetails::new("", None, None))?;
        Ok(self.cache.stats())
    }

    /// Expire one cached entry in place; it is compacted on the next write.
    pub fn expire_cached_word(
        &self,
        word: &str,
        from_language: Option<&str>,
        target_language: Option<&str>,
    ) -> Result<bool, LookupError> {
        let from_language = Self::resolve_source(from_language);
        let target = self.resolve_target(target_language);
        self.ensure_enabled(|| ErrorDetails::new(word, from_language, Some(target)))?;

        let key = WordCache::key(&Self::normalize(word), from_language, target);
        Ok(self.cache.mark_expired(&key))
    }
}
