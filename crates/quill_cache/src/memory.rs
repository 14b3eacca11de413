//! Process-local bounded cache store.
//!
//! Keys are kept in canonical form rather than digested, which keeps them
//! legible when inspecting the store. Eviction is by write recency only:
//! reads do not refresh an entry's position, so the store behaves as
//! write-order FIFO, not true LRU, and callers may rely on that.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::CacheError;
use crate::key::{normalize, CanonicalKey, KeyPart};
use crate::store::{CacheOption, Store};

/// Capacity used when a memory store is requested without an explicit one.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-memory store bounded to a fixed number of entries.
///
/// Holds an independent mapping per process, so it is unsuitable for
/// multi-process builds; use [`FilesystemStore`](crate::FilesystemStore)
/// when several processes must share cache state.
pub struct MemoryStore {
    capacity: usize,
    inner: Mutex<Inner>,
}

struct Inner {
    entries: HashMap<CanonicalKey, Vec<u8>>,
    /// Keys in write order, least recently written first.
    recency: Vec<CanonicalKey>,
}

impl MemoryStore {
    /// Creates a store that retains at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                recency: Vec::new(),
            }),
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &KeyPart) -> Result<Option<Vec<u8>>, CacheError> {
        let canonical = normalize(key);
        // Reads deliberately leave the recency order untouched.
        Ok(self.lock().entries.get(&canonical).cloned())
    }

    fn set(&self, key: &KeyPart, payload: &[u8]) -> Result<(), CacheError> {
        let canonical = normalize(key);
        let mut guard = self.lock();
        let Inner { entries, recency } = &mut *guard;

        entries.insert(canonical.clone(), payload.to_vec());
        if let Some(pos) = recency.iter().position(|k| k == &canonical) {
            recency.remove(pos);
        }
        recency.push(canonical);

        // Evict exactly the oldest entries beyond capacity.
        let excess = recency.len().saturating_sub(self.capacity);
        for evicted in recency.drain(..excess) {
            entries.remove(&evicted);
        }
        Ok(())
    }

    fn matches_option(&self, option: &CacheOption) -> bool {
        match option {
            CacheOption::Disabled => true,
            CacheOption::Instance(other) => std::ptr::eq(
                self as *const Self as *const (),
                std::sync::Arc::as_ptr(other) as *const (),
            ),
            _ => false,
        }
    }
}
