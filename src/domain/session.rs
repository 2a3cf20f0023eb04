//! Operator session and client-profile identity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TenantId;

/// Opaque identifier of an operator session, carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Creates a new random `SessionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parses a cookie value. Returns `None` for anything that is not a UUID.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<uuid::Uuid>().ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend access credential obtained at login.
///
/// Sent as a bearer token on authenticated backend calls only; the share
/// domain never sees it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw access token.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw token for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A live operator session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Cookie identifier.
    pub id: SessionId,
    /// Credential for authenticated backend calls.
    pub credential: Credential,
    /// Tenant scope, once the backend has assigned one. Operators who have
    /// not finished onboarding have none yet.
    pub tenant: Option<TenantId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Hard expiry; an expired session is treated as absent.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns `true` if the session is past its expiry at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Identity of one browser profile's durable storage.
///
/// Minted on the first dashboard visit and kept in a long-lived cookie, so
/// it survives reloads and is shared by tabs of the same browser, but differs
/// across browsers and devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientProfile(uuid::Uuid);

impl ClientProfile {
    /// Mints a fresh profile identity.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parses a cookie value. Returns `None` for anything that is not a UUID.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<uuid::Uuid>().ok().map(Self)
    }
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client profile of one request.
///
/// `minted` is set when the profile was created for this request because the
/// client sent no usable profile cookie. Such a profile is not known to come
/// back, so its venue context is kept only for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestProfile {
    /// The profile identity.
    pub id: ClientProfile,
    /// Whether the profile was minted for this request.
    pub minted: bool,
}

impl RequestProfile {
    /// A profile read back from the client's cookie.
    #[must_use]
    pub const fn returning(id: ClientProfile) -> Self {
        Self { id, minted: false }
    }

    /// A profile created for the current request.
    #[must_use]
    pub const fn minted(id: ClientProfile) -> Self {
        Self { id, minted: true }
    }
}

impl fmt::Display for RequestProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}
