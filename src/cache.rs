//! Review cache with LRU eviction.
//!
//! Cache key is a SHA-256 digest of `(language, code)`. Entries live until
//! evicted by capacity pressure or process restart; there is no TTL and no
//! persistence. A hit returns the stored feedback and short-circuits the
//! model call entirely.

use std::collections::HashMap;
use std::sync::Mutex;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::review::ReviewFeedback;

struct CacheEntry {
    feedback: ReviewFeedback,
    /// Logical access tick; the smallest value is the LRU victim.
    accessed_at: u64,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    tick: u64,
}

/// Bounded in-memory cache mapping code fingerprints to review feedback.
pub struct ReviewCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

impl ReviewCache {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// `capacity` is clamped to a minimum of 1 to keep eviction well-founded.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Build a deterministic cache key: SHA-256 of `(language, code)`.
    ///
    /// Uses length-prefixed encoding so field boundaries cannot collide
    /// (e.g. `language="py", code="thon"` vs `language="pyt", code="hon"`).
    pub fn cache_key(language: &str, code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update((language.len() as u64).to_le_bytes());
        hasher.update(language.as_bytes());
        hasher.update((code.len() as u64).to_le_bytes());
        hasher.update(code.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up cached feedback. A hit refreshes the entry's LRU position.
    pub fn get(&self, key: &str) -> Option<ReviewFeedback> {
        let mut inner = self.inner.lock().expect("review cache lock poisoned");
        inner.tick += 1;
        let tick = inner.tick;
        let entry = inner.entries.get_mut(key)?;
        entry.accessed_at = tick;
        Some(entry.feedback.clone())
    }

    /// Store feedback, evicting the least-recently-used entry at capacity.
    pub fn put(&self, key: String, feedback: ReviewFeedback) {
        let mut inner = self.inner.lock().expect("review cache lock poisoned");
        inner.tick += 1;
        let tick = inner.tick;

        // Overwriting an existing key must not trigger eviction.
        if !inner.entries.contains_key(&key) {
            while inner.entries.len() >= self.capacity {
                evict_lru(&mut inner.entries);
            }
        }

        inner.entries.insert(
            key,
            CacheEntry {
                feedback,
                accessed_at: tick,
            },
        );
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("review cache lock poisoned")
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn evict_lru(entries: &mut HashMap<String, CacheEntry>) {
    if let Some(lru_key) = entries
        .iter()
        .min_by_key(|(_, e)| e.accessed_at)
        .map(|(k, _)| k.clone())
    {
        debug!(key = %&lru_key[..8.min(lru_key.len())], "Evicting LRU cache entry");
        entries.remove(&lru_key);
    }
}
