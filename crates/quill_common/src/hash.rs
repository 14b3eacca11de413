//! Content hashing for cache addressing and invalidation.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::Xxh3;

/// A 128-bit content hash computed using XXH3.
///
/// Two inputs with the same `ContentHash` are assumed to have identical
/// content. Used throughout the pipeline to detect changed inputs and to
/// address cached artifacts on disk; the `Display` form (32 lowercase hex
/// characters) is the on-disk file name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Incremental construction of a [`ContentHash`] from multiple chunks.
///
/// Feeding the chunks in sequence produces the same digest as hashing
/// their concatenation with [`ContentHash::from_bytes`].
pub struct ContentHasher(Xxh3);

impl ContentHasher {
    /// Creates a hasher with no input consumed yet.
    pub fn new() -> Self {
        Self(Xxh3::new())
    }

    /// Feeds a chunk of bytes into the hasher.
    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    /// Consumes the hasher and returns the digest of everything fed so far.
    pub fn finish(self) -> ContentHash {
        ContentHash(self.0.digest128().to_le_bytes())
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::from_bytes(b"hello world");
        let b = ContentHash::from_bytes(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = ContentHash::from_bytes(b"hello");
        let b = ContentHash::from_bytes(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn display_format() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h}");
        assert_eq!(s.len(), 32, "Display should be 32 hex chars");
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_abbreviated() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h:?}");
        assert!(s.starts_with("ContentHash("));
        assert!(s.ends_with(")"));
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::from_bytes(b"serde test");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut hasher = ContentHasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        assert_eq!(hasher.finish(), ContentHash::from_bytes(b"hello world"));
    }

    #[test]
    fn streaming_empty_chunks_are_neutral() {
        let mut hasher = ContentHasher::new();
        hasher.update(b"");
        hasher.update(b"data");
        hasher.update(b"");
        assert_eq!(hasher.finish(), ContentHash::from_bytes(b"data"));
    }

    #[test]
    fn empty_input_digest() {
        assert_eq!(ContentHasher::new().finish(), ContentHash::from_bytes(b""));
    }
}
