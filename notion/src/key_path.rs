//! A newtype wrapper for key paths into Notion item payloads
//!
//! A `KeyPath` is an ordered, non-empty list of object keys. Resolving it against a
//! payload performs one key lookup per segment, e.g. `["title", "content"]` locates
//! `payload["title"]["content"]`.

use std::fmt;

use error_stack::Report;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// Ordered, non-empty sequence of object keys locating a value inside a payload
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Create a single-segment path
    pub fn single(segment: impl Into<String>) -> Self { Self(vec![segment.into()]) }

    /// Create a path from segments, rejecting an empty sequence
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyPath`] when `segments` yields nothing.
    pub fn try_from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(Report::new(Error::InvalidKeyPath(
                "key path must have at least one segment".to_string(),
            )));
        }
        Ok(Self(segments))
    }

    /// Create a path from a declaration's static segments
    ///
    /// Declarations are checked to be non-empty before they reach this point.
    pub(crate) fn from_static(segments: &'static [&'static str]) -> Self {
        Self(segments.iter().map(|segment| (*segment).to_string()).collect())
    }

    /// Append a segment and return self (builder pattern)
    #[must_use]
    pub fn key(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Create a new path with `prefix` segments placed before this path's segments
    #[must_use]
    pub fn prefixed(&self, prefix: &Self) -> Self {
        let mut segments = prefix.0.clone();
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    /// Get the segments of this path
    pub fn segments(&self) -> &[String] { &self.0 }

    /// Get the number of segments in this path
    pub const fn len(&self) -> usize { self.0.len() }

    /// Always `false`: a key path has at least one segment
    pub const fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Split into the intermediate segments and the final segment
    pub(crate) fn split_last(&self) -> Option<(&String, &[String])> { self.0.split_last() }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0.join(".")) }
}

impl From<&str> for KeyPath {
    fn from(segment: &str) -> Self { Self::single(segment) }
}

impl From<String> for KeyPath {
    fn from(segment: String) -> Self { Self::single(segment) }
}
