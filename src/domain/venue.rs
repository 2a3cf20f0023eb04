//! Venue reference data and tenant identity.
//!
//! Venues are owned by the scheduling backend. The console treats them as
//! immutable values fetched per tenant; only the *selection* of one venue is
//! mutable state (see [`crate::storage::VenueContextStore`]).

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Backend identifier of a venue.
///
/// Opaque to the console; compared by value only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct VenueId(String);

impl VenueId {
    /// Wraps a backend venue identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VenueId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identity of the operator account (restaurant) that owns venues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Wraps a backend tenant identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single restaurant location belonging to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Venue {
    /// Backend identifier.
    pub id: VenueId,
    /// Display name.
    pub name: String,
    /// Postal address, free-form.
    #[serde(default)]
    pub address: String,
}

/// Result of asking for the current tenant's venues.
///
/// `Pending` means the tenant identity is not known yet. It is *not* the
/// same as an empty list and must never drive venue auto-selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenueListing {
    /// Tenant identity unknown; nothing was fetched.
    Pending,
    /// Authoritative list in backend order.
    Loaded(Vec<Venue>),
}

impl VenueListing {
    /// Returns the loaded venues, or `None` while pending.
    #[must_use]
    pub fn venues(&self) -> Option<&[Venue]> {
        match self {
            Self::Pending => None,
            Self::Loaded(venues) => Some(venues),
        }
    }

    /// Returns `true` if `id` is one of the loaded venues.
    #[must_use]
    pub fn contains(&self, id: &VenueId) -> bool {
        self.venues()
            .is_some_and(|venues| venues.iter().any(|v| &v.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(id: &str) -> Venue {
        Venue {
            id: VenueId::from(id),
            name: format!("Venue {id}"),
            address: String::new(),
        }
    }

    #[test]
    fn venue_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&VenueId::from("v1")).ok();
        assert_eq!(json.as_deref(), Some("\"v1\""));
    }

    #[test]
    fn venue_without_address_deserializes() {
        let parsed: Option<Venue> = serde_json::from_str(r#"{"id":"v9","name":"Dock"}"#).ok();
        assert_eq!(parsed.map(|v| v.address), Some(String::new()));
    }

    #[test]
    fn pending_listing_contains_nothing() {
        assert!(!VenueListing::Pending.contains(&VenueId::from("v1")));
        assert!(VenueListing::Pending.venues().is_none());
    }

    #[test]
    fn loaded_listing_lookup() {
        let listing = VenueListing::Loaded(vec![venue("v1"), venue("v2")]);
        assert!(listing.contains(&VenueId::from("v2")));
        assert!(!listing.contains(&VenueId::from("v3")));
    }
}
