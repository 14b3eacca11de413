//! Shared foundational types used across the Quill asset pipeline.
//!
//! This crate provides the content hashing primitives used for cache
//! addressing and change detection.

#![warn(missing_docs)]

pub mod hash;

pub use hash::{ContentHash, ContentHasher};
