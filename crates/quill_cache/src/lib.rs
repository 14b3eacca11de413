//! Memoization layer for the Quill asset pipeline.
//!
//! Expensive, deterministic build steps (filter runs, bundle assembly) are
//! keyed by a composite description of their inputs so that unchanged inputs
//! skip recomputation. The layer offers a bounded in-memory store for
//! single-process builds and a content-addressed filesystem store for sharing
//! between processes, both behind one [`Store`] interface resolved from
//! declarative configuration.

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod filesystem;
pub mod hasher;
pub mod key;
pub mod memory;
pub mod store;

pub use error::CacheError;
pub use filesystem::FilesystemStore;
pub use hasher::digest_key;
pub use key::{normalize, CanonicalKey, Filter, Hunk, KeyPart};
pub use memory::MemoryStore;
pub use store::{resolve, CacheOption, Store, StoreExt, StoreKind, DEFAULT_CACHE_DIR};
