use crate::domain::fingerprint::Fingerprint;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone)]
struct ResultCacheEntry {
    result: String,
    created_at: Instant,
}

/// LRU cache of analysis results keyed by fingerprint, with TTL
pub struct ResultCache {
    cache: HashMap<Fingerprint, ResultCacheEntry>,
    max_size: usize,
    ttl: Duration,
    access_order: Vec<Fingerprint>,
    hits: usize,
    misses: usize,
}

impl ResultCache {
    pub fn new(max_size: usize, ttl_secs: u64) -> Self {
        Self::with_ttl(max_size, Duration::from_secs(ttl_secs))
    }

    pub fn with_ttl(max_size: usize, ttl: Duration) -> Self {
        Self {
            cache: HashMap::new(),
            max_size,
            ttl,
            access_order: Vec::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Get a result if present and not expired
    pub fn get(&mut self, key: &Fingerprint) -> Option<String> {
        let result = self
            .cache
            .get(key)
            .filter(|entry| entry.created_at.elapsed() < self.ttl)
            .map(|entry| entry.result.clone());

        if result.is_some() {
            self.hits += 1;
            self.touch(key);
        } else {
            self.misses += 1;
            // Drop the expired entry, if any
            if self.cache.remove(key).is_some() {
                self.access_order.retain(|k| k != key);
            }
        }

        result
    }

    /// Store a result, evicting least recently used entries at capacity
    pub fn put(&mut self, key: Fingerprint, result: String) {
        if self.max_size == 0 {
            return;
        }

        if self.cache.remove(&key).is_some() {
            self.access_order.retain(|k| k != &key);
        }

        while self.cache.len() >= self.max_size && !self.access_order.is_empty() {
            let oldest = self.access_order.remove(0);
            self.cache.remove(&oldest);
        }

        self.cache.insert(
            key.clone(),
            ResultCacheEntry {
                result,
                created_at: Instant::now(),
            },
        );
        self.access_order.push(key);
    }

    pub fn invalidate(&mut self, key: &Fingerprint) -> bool {
        let removed = self.cache.remove(key).is_some();
        if removed {
            self.access_order.retain(|k| k != key);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.access_order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    fn touch(&mut self, key: &Fingerprint) {
        self.access_order.retain(|k| k != key);
        self.access_order.push(key.clone());
    }

    pub fn stats(&self) -> ResultCacheStats {
        let total_requests = self.hits + self.misses;
        let hit_rate = if total_requests > 0 {
            self.hits as f32 / total_requests as f32
        } else {
            0.0
        };

        ResultCacheStats {
            entries: self.cache.len(),
            max_size: self.max_size,
            ttl_secs: self.ttl.as_secs(),
            hits: self.hits,
            misses: self.misses,
            hit_rate,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultCacheStats {
    pub entries: usize,
    pub max_size: usize,
    pub ttl_secs: u64,
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f32,
}
