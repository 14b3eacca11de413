//! Content-addressed persistent cache store.
//!
//! Each entry lives in its own file directly under the root directory, named
//! by the hex digest of its key. File existence is the entire index: there
//! is no manifest and no sharding, and the store never deletes entries on
//! its own (external cleanup owns that).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CacheError;
use crate::hasher::digest_key;
use crate::key::KeyPart;
use crate::store::{CacheOption, Store};

/// Persistent store writing one file per key digest.
///
/// This is the store to use when several processes share cache state. It
/// performs no locking: two writers racing on the same digest, or a reader
/// racing a writer, may observe a torn file. A torn non-raw payload fails
/// to decode and degrades to a miss.
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    /// Creates a store rooted at the given directory.
    ///
    /// No I/O happens here. An explicit root must exist before the first
    /// `set`; the factory creates the default location automatically.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &KeyPart) -> Result<PathBuf, CacheError> {
        Ok(self.root.join(digest_key(key)?.to_string()))
    }
}

impl Store for FilesystemStore {
    fn get(&self, key: &KeyPart) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read(&path)
            .map(Some)
            .map_err(|e| CacheError::Io { path, source: e })
    }

    fn set(&self, key: &KeyPart, payload: &[u8]) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        std::fs::write(&path, payload).map_err(|e| CacheError::Io { path, source: e })
    }

    fn matches_option(&self, option: &CacheOption) -> bool {
        match option {
            CacheOption::Default => true,
            CacheOption::Dir(dir) => dir == &self.root,
            CacheOption::Instance(other) => std::ptr::eq(
                self as *const Self as *const (),
                Arc::as_ptr(other) as *const (),
            ),
            _ => false,
        }
    }
}
