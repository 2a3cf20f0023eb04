//! Opaque share-link token.
//!
//! A [`ShareToken`] is taken from the `/s/{token}` path segment exactly once,
//! at the router boundary, and passed around typed from then on. The console
//! never inspects or stores it; validity is decided by the backend.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Maximum accepted token length. Longer segments are rejected before any
/// backend call is made.
pub const MAX_TOKEN_LEN: usize = 256;

/// Bearer token granting one staff member read-only access to their own
/// schedule.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShareToken(String);

/// Reasons a path segment is not a well-formed token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareTokenError {
    /// The segment was empty.
    #[error("share token is empty")]
    Empty,
    /// The segment exceeded [`MAX_TOKEN_LEN`].
    #[error("share token is too long")]
    TooLong,
    /// The segment contained characters outside the URL-safe alphabet.
    #[error("share token contains invalid characters")]
    InvalidCharacters,
    /// The segment was `.` or `..`, which URL builders and browsers collapse
    /// as path navigation.
    #[error("share token is a dot segment")]
    DotSegment,
}

impl ShareToken {
    /// Parses a raw path segment.
    ///
    /// Accepts the URL-safe alphabet (`A-Z a-z 0-9 - _ . ~`), except for the
    /// bare segments `.` and `..`.
    ///
    /// # Errors
    ///
    /// Returns a [`ShareTokenError`] when the segment is empty, too long, a
    /// dot segment, or contains characters outside the accepted alphabet.
    pub fn parse(raw: &str) -> Result<Self, ShareTokenError> {
        if raw.is_empty() {
            return Err(ShareTokenError::Empty);
        }
        if raw.len() > MAX_TOKEN_LEN {
            return Err(ShareTokenError::TooLong);
        }
        let url_safe = raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~'));
        if !url_safe {
            return Err(ShareTokenError::InvalidCharacters);
        }
        if matches!(raw, "." | "..") {
            return Err(ShareTokenError::DotSegment);
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the literal token, for building backend URLs and links.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix safe to write to logs.
    #[must_use]
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{prefix}…")
    }

    /// Path of the schedule view for this token.
    #[must_use]
    pub fn schedule_path(&self) -> String {
        format!("/s/{}/schedule", self.0)
    }
}

// Tokens are credentials: keep them out of Debug output.
impl fmt::Debug for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ShareToken").field(&self.redacted()).finish()
    }
}

impl<'de> Deserialize<'de> for ShareToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
