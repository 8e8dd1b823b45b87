use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use image::RgbaImage;

use crate::assets::decode::decode_image;
use crate::foundation::error::CardResult;

const DEFAULT_CAPACITY: usize = 32;

/// Cache key: caller-chosen identifier plus an xxh3 fingerprint of the encoded bytes.
///
/// The fingerprint makes a replaced file under the same identifier a miss instead of a stale hit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetKey {
    id: String,
    fingerprint: u64,
}

impl AssetKey {
    /// Build a key for `bytes` stored under `id`.
    pub fn new(id: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            id: id.into(),
            fingerprint: xxhash_rust::xxh3::xxh3_64(bytes),
        }
    }

    /// Identifier part of the key.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Content fingerprint part of the key.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

/// Hit/miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that had to decode.
    pub misses: u64,
}

/// Bounded LRU of decoded assets.
#[derive(Debug)]
pub struct AssetCache {
    entries: HashMap<AssetKey, Arc<RgbaImage>>,
    lru: VecDeque<AssetKey>,
    capacity: usize,
    stats: CacheStats,
}

impl Default for AssetCache {
    /// Capacity comes from `THUMBCARD_ASSET_CACHE_CAPACITY` when set to a positive integer.
    fn default() -> Self {
        let capacity = std::env::var("THUMBCARD_ASSET_CACHE_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_CAPACITY);
        Self::new(capacity)
    }
}

impl AssetCache {
    /// Create a cache holding at most `capacity` images (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
            stats: CacheStats::default(),
        }
    }

    /// Look up a decoded image, marking it most recently used.
    pub fn get(&mut self, key: &AssetKey) -> Option<Arc<RgbaImage>> {
        let img = self.entries.get(key).cloned();
        if img.is_some() {
            self.touch(key);
        }
        img
    }

    /// Insert a decoded image, evicting the least recently used entries over capacity.
    pub fn insert(&mut self, key: AssetKey, image: Arc<RgbaImage>) {
        self.entries.insert(key.clone(), image);
        self.touch(&key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                self.entries.remove(&old);
            }
        }
    }

    /// Return the cached decode of `bytes` under `id`, decoding and inserting on a miss.
    pub fn get_or_decode(&mut self, id: &str, bytes: &[u8]) -> CardResult<Arc<RgbaImage>> {
        let key = AssetKey::new(id, bytes);
        if let Some(img) = self.get(&key) {
            self.stats.hits += 1;
            return Ok(img);
        }
        self.stats.misses += 1;
        let img = Arc::new(decode_image(bytes)?);
        self.insert(key, img.clone());
        Ok(img)
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no images.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached images.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Hit/miss counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn touch(&mut self, key: &AssetKey) {
        if let Some(pos) = self.lru.iter().position(|k| k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key.clone());
    }
}

/// [`AssetCache`] behind a mutex, for sharing across batch workers.
///
/// Decoding happens outside the lock, so two workers missing on the same key may both decode; the
/// second insert simply refreshes the entry.
#[derive(Debug, Default)]
pub struct SharedAssetCache {
    inner: Mutex<AssetCache>,
}

impl SharedAssetCache {
    /// Create a shared cache holding at most `capacity` images.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(AssetCache::new(capacity)),
        }
    }

    /// Thread-safe [`AssetCache::get_or_decode`].
    pub fn get_or_decode(&self, id: &str, bytes: &[u8]) -> CardResult<Arc<RgbaImage>> {
        let key = AssetKey::new(id, bytes);
        {
            let mut cache = self.lock();
            if let Some(img) = cache.get(&key) {
                cache.stats.hits += 1;
                return Ok(img);
            }
            cache.stats.misses += 1;
        }
        let img = Arc::new(decode_image(bytes)?);
        self.lock().insert(key, img.clone());
        Ok(img)
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no images.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Hit/miss counters since creation.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AssetCache> {
        // The cache holds no invariants a panicking holder could break.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
