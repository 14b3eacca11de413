//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache operations.
///
/// Reads are largely fail-safe: a missing or corrupt entry is a cache miss,
/// not an error. Errors are reserved for the cases the caller must know
/// about: a key element the hasher refuses to digest, and I/O problems with
/// the persistent store's backing directory.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A composite key contained an element kind the hasher does not digest.
    #[error("cannot digest key element of kind `{kind}`")]
    UnsupportedKeyType {
        /// Name of the offending element kind.
        kind: &'static str,
    },

    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A value could not be serialized for storage.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_key_type_display() {
        let err = CacheError::UnsupportedKeyType { kind: "float" };
        let msg = err.to_string();
        assert!(msg.contains("cannot digest"));
        assert!(msg.contains("float"));
    }

    #[test]
    fn io_error_display() {
        let err = CacheError::Io {
            path: PathBuf::from("/tmp/cache/0123abcd"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("cache I/O error"));
        assert!(msg.contains("0123abcd"));
    }

    #[test]
    fn serialization_error_display() {
        let err = CacheError::Serialization {
            reason: "unrepresentable value".to_string(),
        };
        assert!(err.to_string().contains("unrepresentable value"));
    }
}
