//! Store interface, configuration options, and the store factory.
//!
//! Calling code describes the cache it wants declaratively (a boolean, a
//! path, a concrete instance) and [`resolve`] turns that into a live store.
//! The cache layer itself stays ignorant of configuration syntax.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::{Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::CacheError;
use crate::filesystem::FilesystemStore;
use crate::key::KeyPart;
use crate::memory::{MemoryStore, DEFAULT_CAPACITY};

/// Directory created under the build root when the cache is configured with
/// a bare `true`.
pub const DEFAULT_CACHE_DIR: &str = ".quill-cache";

/// A cache store holding raw byte payloads addressed by composite keys.
///
/// One store serves several caching purposes at once; callers namespace
/// their keys with a leading tag element, as in
/// `KeyPart::Seq(vec!["bundle-def".into(), actual_key])`, so unrelated
/// subsystems never collide.
///
/// A miss is indistinguishable from "never computed", whatever its cause;
/// callers must always be prepared to recompute.
pub trait Store: Send + Sync {
    /// Looks up the raw payload stored for `key`.
    fn get(&self, key: &KeyPart) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores `payload` under `key`, replacing any previous entry.
    fn set(&self, key: &KeyPart, payload: &[u8]) -> Result<(), CacheError>;

    /// Returns `true` if this store is equivalent to what [`resolve`] would
    /// produce for `option`, letting callers detect whether a
    /// reconfiguration actually changed anything.
    fn matches_option(&self, option: &CacheOption) -> bool;
}

/// Typed convenience layer over [`Store`] for non-raw values.
pub trait StoreExt: Store {
    /// Looks up and decodes a value stored with [`StoreExt::set_encoded`].
    ///
    /// A payload that fails to decode is reported as absent; only I/O
    /// problems surface as errors.
    fn get_decoded<T: serde::de::DeserializeOwned>(
        &self,
        key: &KeyPart,
    ) -> Result<Option<T>, CacheError> {
        Ok(self.get(key)?.and_then(|payload| codec::decode(&payload)))
    }

    /// Encodes a value through the codec and stores the payload.
    fn set_encoded<T: Serialize>(&self, key: &KeyPart, value: &T) -> Result<(), CacheError> {
        self.set(key, &codec::encode(value)?)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

/// Which store kind to instantiate with default settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// A [`MemoryStore`] with the default capacity.
    Memory,
    /// A [`FilesystemStore`] at the default location under the build root.
    Filesystem,
}

/// Declarative description of the cache a caller wants.
///
/// Configuration files can express `Disabled`, `Default`, and `Dir` (a
/// boolean or a path string); the remaining forms exist for programmatic
/// callers.
#[derive(Clone)]
pub enum CacheOption {
    /// No caching at all.
    Disabled,
    /// Persistent cache at the default location under the build root.
    Default,
    /// Persistent cache rooted at an explicit directory.
    Dir(PathBuf),
    /// A store kind instantiated with its defaults.
    Kind(StoreKind),
    /// An existing store used as-is.
    Instance(Arc<dyn Store>),
}

impl fmt::Debug for CacheOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Default => f.write_str("Default"),
            Self::Dir(p) => f.debug_tuple("Dir").field(p).finish(),
            Self::Kind(k) => f.debug_tuple("Kind").field(k).finish(),
            Self::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

impl From<bool> for CacheOption {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Default
        } else {
            Self::Disabled
        }
    }
}

impl From<PathBuf> for CacheOption {
    fn from(dir: PathBuf) -> Self {
        Self::Dir(dir)
    }
}

impl From<&Path> for CacheOption {
    fn from(dir: &Path) -> Self {
        Self::Dir(dir.to_path_buf())
    }
}

impl<'de> Deserialize<'de> for CacheOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OptionVisitor;

        impl Visitor<'_> for OptionVisitor {
            type Value = CacheOption;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or a directory path string")
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(CacheOption::from(v))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(CacheOption::Dir(PathBuf::from(v)))
            }
        }

        deserializer.deserialize_any(OptionVisitor)
    }
}

/// Resolves a configuration option into a live store.
///
/// `build_root` anchors the default cache location, which is created on
/// demand; creation failure propagates, since a non-functional persistent
/// cache is a configuration error the caller must know about. An explicit
/// `Dir` path is used as given and must exist before the first write.
/// Returns `None` when caching is disabled.
pub fn resolve(
    option: &CacheOption,
    build_root: &Path,
) -> Result<Option<Arc<dyn Store>>, CacheError> {
    match option {
        CacheOption::Disabled => Ok(None),
        CacheOption::Instance(store) => Ok(Some(Arc::clone(store))),
        CacheOption::Kind(StoreKind::Memory) => {
            Ok(Some(Arc::new(MemoryStore::new(DEFAULT_CAPACITY))))
        }
        CacheOption::Kind(StoreKind::Filesystem) | CacheOption::Default => {
            let dir = build_root.join(DEFAULT_CACHE_DIR);
            std::fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
                path: dir.clone(),
                source: e,
            })?;
            Ok(Some(Arc::new(FilesystemStore::new(dir))))
        }
        CacheOption::Dir(dir) => Ok(Some(Arc::new(FilesystemStore::new(dir.clone())))),
    }
}
