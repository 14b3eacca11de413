//! Composite cache keys and their canonical, comparable form.
//!
//! A cache key describes everything that went into producing a cached value:
//! input content, the transforms applied to it, and configuration scalars.
//! Keys nest arbitrarily as sequences and mappings over a small set of
//! element kinds. [`normalize`] projects a key into a [`CanonicalKey`] whose
//! equality ignores mapping insertion order, suitable for use as an
//! in-memory lookup key.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A content-bearing chunk of asset data participating in a cache key.
///
/// The cache never interprets the content; it only reads the raw bytes when
/// digesting a key or comparing canonical keys.
pub trait Hunk: fmt::Debug + Send + Sync {
    /// Returns the raw content of this hunk.
    fn content_bytes(&self) -> Cow<'_, [u8]>;
}

/// A transform step with a stable identity participating in a cache key.
///
/// The token must be stable across processes for a given configuration: two
/// filters that would produce the same output must report the same token,
/// and any configuration change must change it.
pub trait Filter: fmt::Debug + Send + Sync {
    /// Returns the stable identity token of this filter.
    fn identity_token(&self) -> String;
}

/// One element of a composite cache key.
///
/// Sequences are ordered; mappings are key-unique and their entry order
/// carries no meaning. `Float` is representable so that configuration data
/// can flow through unmodified, but it is not a digestable kind and the
/// hasher rejects it. Every other kind a key could be built from is
/// unrepresentable by construction.
#[derive(Debug, Clone)]
pub enum KeyPart {
    /// An integer scalar.
    Int(i64),
    /// A string scalar.
    Str(String),
    /// A floating-point scalar. Not digestable.
    Float(f64),
    /// An ordered sequence of elements.
    Seq(Vec<KeyPart>),
    /// A mapping with unique keys; entry order carries no meaning.
    Map(Vec<(KeyPart, KeyPart)>),
    /// An opaque content-bearing object.
    Hunk(Arc<dyn Hunk>),
    /// An opaque filter identified by a stable token.
    Filter(Arc<dyn Filter>),
}

impl KeyPart {
    /// Wraps a content-bearing object as a key element.
    pub fn hunk(hunk: impl Hunk + 'static) -> Self {
        Self::Hunk(Arc::new(hunk))
    }

    /// Wraps a filter as a key element.
    pub fn filter(filter: impl Filter + 'static) -> Self {
        Self::Filter(Arc::new(filter))
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// A normalized projection of a [`KeyPart`] with order-independent mappings.
///
/// Canonical keys compare by content: mapping entries are key-sorted, opaque
/// objects compare by their content bytes or identity token, floats by their
/// IEEE bit pattern. The element values are carried, not digested, which
/// keeps memory-store keys legible when debugging.
#[derive(Debug, Clone)]
pub enum CanonicalKey {
    /// An integer scalar.
    Int(i64),
    /// A string scalar.
    Str(String),
    /// A floating-point scalar, compared and hashed by bit pattern.
    Float(f64),
    /// An ordered sequence of canonical elements.
    Seq(Vec<CanonicalKey>),
    /// Mapping entries sorted by key.
    Map(Vec<(CanonicalKey, CanonicalKey)>),
    /// An opaque content-bearing object, compared by its content.
    Hunk(Arc<dyn Hunk>),
    /// An opaque filter, compared by its identity token.
    Filter(Arc<dyn Filter>),
}

impl CanonicalKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Str(_) => 1,
            Self::Float(_) => 2,
            Self::Seq(_) => 3,
            Self::Map(_) => 4,
            Self::Hunk(_) => 5,
            Self::Filter(_) => 6,
        }
    }
}

impl Ord for CanonicalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Seq(a), Self::Seq(b)) => a.cmp(b),
            (Self::Map(a), Self::Map(b)) => a.cmp(b),
            (Self::Hunk(a), Self::Hunk(b)) => {
                a.content_bytes().as_ref().cmp(b.content_bytes().as_ref())
            }
            (Self::Filter(a), Self::Filter(b)) => a.identity_token().cmp(&b.identity_token()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CanonicalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CanonicalKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CanonicalKey {}

impl Hash for CanonicalKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Int(v) => v.hash(state),
            Self::Str(v) => v.hash(state),
            Self::Float(v) => v.to_bits().hash(state),
            Self::Seq(v) => v.hash(state),
            Self::Map(v) => v.hash(state),
            Self::Hunk(h) => h.content_bytes().hash(state),
            Self::Filter(f) => f.identity_token().hash(state),
        }
    }
}

/// Projects a composite key into its canonical, comparable form.
///
/// Mapping entries are sorted by their normalized key, so two mappings with
/// the same content always normalize identically regardless of insertion
/// order. Sequences keep their order; scalars and opaque objects pass
/// through unchanged. No side effects.
pub fn normalize(key: &KeyPart) -> CanonicalKey {
    match key {
        KeyPart::Int(v) => CanonicalKey::Int(*v),
        KeyPart::Str(v) => CanonicalKey::Str(v.clone()),
        KeyPart::Float(v) => CanonicalKey::Float(*v),
        KeyPart::Seq(items) => CanonicalKey::Seq(items.iter().map(normalize).collect()),
        KeyPart::Map(entries) => {
            let mut entries: Vec<_> = entries
                .iter()
                .map(|(k, v)| (normalize(k), normalize(v)))
                .collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            CanonicalKey::Map(entries)
        }
        KeyPart::Hunk(h) => CanonicalKey::Hunk(Arc::clone(h)),
        KeyPart::Filter(f) => CanonicalKey::Filter(Arc::clone(f)),
    }
}
