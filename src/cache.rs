//! Memo of encoded CSV payloads.
//!
//! Encodings are keyed on a SHA-256 digest of the selected columns and the
//! rendered cells, so two identical filtered tables share one entry no matter
//! which request produced them.

use crate::error::Result;
use crate::export;
use crate::models::{Column, SaleRecord};
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Arc;

type Key = [u8; 32];

/// Bounded LRU cache of CSV encodings.
pub struct CsvCache {
    entries: LruCache<Key, Arc<Vec<u8>>>,
    hits: u64,
    misses: u64,
}

impl CsvCache {
    /// Create a cache holding at most `capacity` payloads (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the CSV for `records` projected on `columns`, encoding it only
    /// when the same table content has not been seen recently.
    pub fn get_or_encode(&mut self, records: &[SaleRecord], columns: &[Column]) -> Result<Arc<Vec<u8>>> {
        let key = content_key(records, columns);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(rows = records.len(), "csv cache hit");
            return Ok(Arc::clone(hit));
        }

        self.misses += 1;
        let encoded = Arc::new(export::encode_csv(records, columns)?);
        self.entries.put(key, Arc::clone(&encoded));
        Ok(encoded)
    }

    /// Number of cached payloads.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Digest of the column selection and every rendered cell.
fn content_key(records: &[SaleRecord], columns: &[Column]) -> Key {
    let mut hasher = Sha256::new();
    for column in columns {
        hasher.update(column.label().as_bytes());
        hasher.update([0x1f]);
    }
    hasher.update([0x1e]);
    for record in records {
        for column in columns {
            hasher.update(column.value_of(record).as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update([0x1e]);
    }
    hasher.finalize().into()
}
