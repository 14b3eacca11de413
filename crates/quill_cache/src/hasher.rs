//! Deterministic digesting of composite keys for content addressing.
//!
//! The digest walks a key depth-first in a canonical order and feeds each
//! leaf into a streaming 128-bit hasher. Keys containing element kinds
//! outside the digestable set fail loudly: a silently wrong digest surfaces
//! later as unexplainable cache staleness, which is far harder to diagnose
//! than an immediate error.

use quill_common::{ContentHash, ContentHasher};

use crate::error::CacheError;
use crate::key::{normalize, CanonicalKey, KeyPart};

/// Computes the 128-bit content digest of a composite key.
///
/// The walk visits sequences in element order and mapping entries in
/// key-sorted order (key, then value). Hunks contribute their raw content,
/// filters their identity token, integers and strings their string form.
/// Keys with equal canonical forms always produce the same digest.
///
/// Fails with [`CacheError::UnsupportedKeyType`] if any element of the key,
/// at any depth, is not a digestable kind.
pub fn digest_key(key: &KeyPart) -> Result<ContentHash, CacheError> {
    let mut hasher = ContentHasher::new();
    walk(&normalize(key), &mut hasher)?;
    Ok(hasher.finish())
}

fn walk(key: &CanonicalKey, hasher: &mut ContentHasher) -> Result<(), CacheError> {
    match key {
        CanonicalKey::Int(v) => hasher.update(v.to_string().as_bytes()),
        CanonicalKey::Str(v) => hasher.update(v.as_bytes()),
        CanonicalKey::Float(_) => {
            return Err(CacheError::UnsupportedKeyType { kind: "float" });
        }
        CanonicalKey::Seq(items) => {
            for item in items {
                walk(item, hasher)?;
            }
        }
        CanonicalKey::Map(entries) => {
            for (k, v) in entries {
                walk(k, hasher)?;
                walk(v, hasher)?;
            }
        }
        CanonicalKey::Hunk(h) => hasher.update(h.content_bytes().as_ref()),
        CanonicalKey::Filter(f) => hasher.update(f.identity_token().as_bytes()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{Filter, Hunk};
    use std::borrow::Cow;

    #[derive(Debug)]
    struct StaticHunk(&'static [u8]);

    impl Hunk for StaticHunk {
        fn content_bytes(&self) -> Cow<'_, [u8]> {
            Cow::Borrowed(self.0)
        }
    }

    #[derive(Debug)]
    struct NamedFilter(&'static str);

    impl Filter for NamedFilter {
        fn identity_token(&self) -> String {
            self.0.to_string()
        }
    }

    fn map(entries: Vec<(&str, i64)>) -> KeyPart {
        KeyPart::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[test]
    fn deterministic() {
        let key = KeyPart::Seq(vec!["bundle".into(), 3.into()]);
        assert_eq!(digest_key(&key).unwrap(), digest_key(&key).unwrap());
    }

    #[test]
    fn map_order_does_not_change_digest() {
        let a = map(vec![("a", 1), ("b", 2)]);
        let b = map(vec![("b", 2), ("a", 1)]);
        assert_eq!(digest_key(&a).unwrap(), digest_key(&b).unwrap());
    }

    #[test]
    fn sequence_order_changes_digest() {
        let a = KeyPart::Seq(vec!["x".into(), "y".into()]);
        let b = KeyPart::Seq(vec!["y".into(), "x".into()]);
        assert_ne!(digest_key(&a).unwrap(), digest_key(&b).unwrap());
    }

    #[test]
    fn normalize_equal_implies_digest_equal() {
        let a = KeyPart::Seq(vec![
            "css".into(),
            map(vec![("debug", 0), ("minify", 1)]),
            KeyPart::hunk(StaticHunk(b"a { margin: 0 }")),
        ]);
        let b = KeyPart::Seq(vec![
            "css".into(),
            map(vec![("minify", 1), ("debug", 0)]),
            KeyPart::hunk(StaticHunk(b"a { margin: 0 }")),
        ]);
        assert_eq!(crate::key::normalize(&a), crate::key::normalize(&b));
        assert_eq!(digest_key(&a).unwrap(), digest_key(&b).unwrap());
    }

    #[test]
    fn hunk_content_drives_digest() {
        let a = KeyPart::hunk(StaticHunk(b"content one"));
        let b = KeyPart::hunk(StaticHunk(b"content two"));
        assert_ne!(digest_key(&a).unwrap(), digest_key(&b).unwrap());
    }

    #[test]
    fn filter_token_drives_digest() {
        let a = KeyPart::filter(NamedFilter("uglify:v1"));
        let b = KeyPart::filter(NamedFilter("uglify:v2"));
        assert_ne!(digest_key(&a).unwrap(), digest_key(&b).unwrap());
    }

    #[test]
    fn digest_is_32_hex_chars() {
        let s = digest_key(&"key".into()).unwrap().to_string();
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn float_is_rejected() {
        let err = digest_key(&KeyPart::Float(1.25)).unwrap_err();
        assert!(matches!(
            err,
            CacheError::UnsupportedKeyType { kind: "float" }
        ));
    }

    #[test]
    fn nested_float_is_rejected() {
        let key = KeyPart::Seq(vec![
            "tag".into(),
            KeyPart::Map(vec![("ratio".into(), KeyPart::Float(0.5))]),
        ]);
        assert!(matches!(
            digest_key(&key),
            Err(CacheError::UnsupportedKeyType { .. })
        ));
    }

    #[test]
    fn empty_containers_digest() {
        let seq = digest_key(&KeyPart::Seq(vec![])).unwrap();
        let map = digest_key(&KeyPart::Map(vec![])).unwrap();
        // Both walk zero leaves; the digest is the empty-input digest.
        assert_eq!(seq, map);
    }
}
