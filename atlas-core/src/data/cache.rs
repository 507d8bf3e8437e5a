//! Content-addressed parse cache.
//!
//! Key: BLAKE3 hash of the raw input bytes. Loading identical bytes twice
//! returns the same `Arc<Dataset>` without re-parsing. Failed loads are never
//! cached. Capacity is bounded; the least recently used entry is evicted.

use std::sync::Arc;

use super::dataset::Dataset;
use super::loader::{content_hash, load_from_reader, read_file, LoadError};

/// Hit/miss counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug)]
struct Entry {
    hash: String,
    dataset: Arc<Dataset>,
    last_used: u64,
}

/// The parse cache.
#[derive(Debug)]
pub struct DatasetCache {
    capacity: usize,
    entries: Vec<Entry>,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl DatasetCache {
    /// Create a cache holding at most `capacity` datasets (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Load a dataset from bytes, parsing only on a cache miss.
    pub fn load(&mut self, bytes: &[u8]) -> Result<Arc<Dataset>, LoadError> {
        let hash = content_hash(bytes);
        self.clock += 1;

        if let Some(entry) = self.entries.iter_mut().find(|e| e.hash == hash) {
            entry.last_used = self.clock;
            self.hits += 1;
            tracing::debug!(hash = %short(&hash), "dataset cache hit");
            return Ok(Arc::clone(&entry.dataset));
        }

        self.misses += 1;
        tracing::debug!(hash = %short(&hash), "dataset cache miss");

        let dataset = Arc::new(load_from_reader(bytes)?.with_content_hash(hash.clone()));
        self.insert(hash, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Read a file and load it through the cache.
    pub fn load_path(&mut self, path: &std::path::Path) -> Result<Arc<Dataset>, LoadError> {
        let bytes = read_file(path)?;
        self.load(&bytes)
    }

    pub fn contains(&self, bytes: &[u8]) -> bool {
        let hash = content_hash(bytes);
        self.entries.iter().any(|e| e.hash == hash)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, hash: String, dataset: Arc<Dataset>) {
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(i, _)| i)
            {
                let evicted = self.entries.swap_remove(oldest);
                tracing::debug!(hash = %short(&evicted.hash), "evicted dataset from cache");
            }
        }
        self.entries.push(Entry {
            hash,
            dataset,
            last_used: self.clock,
        });
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(8)
    }
}

fn short(hash: &str) -> &str {
    &hash[..hash.len().min(12)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &[u8] = b"coarse_label,fine_label\nTech,AI\n";
    const B: &[u8] = b"coarse_label,fine_label\nHealth,General\n";
    const C: &[u8] = b"coarse_label,fine_label\nRetail,Shops\n";

    #[test]
    fn test_identical_input_hits_cache() {
        let mut cache = DatasetCache::new(4);
        let first = cache.load(A).unwrap();
        let second = cache.load(A).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let mut cache = DatasetCache::new(4);
        assert!(cache.load(b"name\nA\n").is_err());
        assert_eq!(cache.stats().entries, 0);
        assert!(!cache.contains(b"name\nA\n"));
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = DatasetCache::new(2);
        cache.load(A).unwrap();
        cache.load(B).unwrap();
        // Touch A so B becomes the eviction candidate.
        cache.load(A).unwrap();
        cache.load(C).unwrap();

        assert!(cache.contains(A));
        assert!(!cache.contains(B));
        assert!(cache.contains(C));
        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = DatasetCache::new(0);
        assert_eq!(cache.capacity(), 1);
    }
}
