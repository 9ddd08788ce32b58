//! Time-bounded cache of canonical words.
//!
//! One map from key to `{value, expires_at}`. Expired entries are treated
//! as absent on read and physically removed the next time any entry is
//! written (compaction on write); nothing runs in the background.

use crate::env;
use crate::lexicon::types::WordInfo;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: WordInfo,
    expires_at: Instant,
    generation: u64,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

#[derive(Debug)]
pub struct WordCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    generation: AtomicU64,
}

impl WordCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            generation: AtomicU64::new(0),
        }
    }

    /// `word:fromLanguage-or-"default":targetLanguage`
    pub fn key(word: &str, from_language: Option<&str>, target_language: &str) -> String {
        let from = from_language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(env::lookup::DEFAULT_SOURCE_KEY);
        format!("{}:{}:{}", word, from, target_language)
    }

    /// Live value for `key`, if any. Never mutates the cache.
    pub fn get(&self, key: &str) -> Option<WordInfo> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Current clear-generation; pass it back to [`Self::insert_if_current`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store `value` under `key`, then compact expired entries.
    pub fn insert(&self, key: String, value: WordInfo) {
        let generation = self.generation();
        self.insert_if_current(key, value, generation);
    }

    /// Store `value` only if the cache has not been cleared since
    /// `generation` was read. Returns whether the value was kept.
    pub fn insert_if_current(&self, key: String, value: WordInfo, generation: u64) -> bool {
        if self.generation() != generation {
            debug!("Dropping stale cache write for {}", key);
            return false;
        }

        let expires_at = Instant::now() + self.ttl;
        self.entries.insert(
            key.clone(),
            CacheEntry {
                value,
                expires_at,
                generation,
            },
        );

        // A clear that raced with the insert wins
        if self.generation() != generation {
            self.entries
                .remove_if(&key, |_, entry| entry.generation == generation);
            debug!("Dropping stale cache write for {}", key);
            return false;
        }

        let evicted = self.evict_expired();
        if evicted > 0 {
            debug!("Evicted {} expired cache entr(ies)", evicted);
        }
        true
    }

    /// Physically remove every expired entry, returning how many went.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    /// Expire `key` immediately without removing it.
    pub fn mark_expired(&self, key: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.expires_at = Instant::now();
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
    }

    /// Entries physically held, expired or not, with keys sorted.
    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}

impl Default for WordCache {
    fn default() -> Self {
        Self::new(env::lookup::CACHE_TTL)
    }
}
