//! Venue-scoped view envelope shared by every dashboard view.

use serde::Serialize;

use crate::domain::Venue;
use crate::service::{Scoped, VenueScope};

/// Prompt shown while the operator's restaurant account has no tenant yet.
pub const PENDING_MESSAGE: &str = "Finish setting up your restaurant to manage venues.";

/// Prompt shown when the tenant has no venues.
pub const NO_VENUES_MESSAGE: &str = "You have no venues yet. Create a venue to get started.";

/// Where the "create a venue" call to action points.
pub const CREATE_VENUE_HREF: &str = "/dashboard/venues/new";

/// Dashboard view body, tagged by `state`.
///
/// ```json
/// { "state": "ready", "venue": { "id": "v1", ... }, "data": [ ... ] }
/// { "state": "empty", "message": "...", "create_venue_href": "/dashboard/venues/new" }
/// { "state": "pending", "message": "..." }
/// ```
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScopedView<T> {
    /// Tenant identity not known yet.
    Pending {
        /// Onboarding prompt.
        message: &'static str,
    },
    /// The tenant owns no venues.
    Empty {
        /// "Create a venue" prompt.
        message: &'static str,
        /// Link to the venue creation view.
        create_venue_href: &'static str,
    },
    /// Data for the selected venue.
    Ready {
        /// Selected venue.
        venue: Venue,
        /// View payload.
        data: T,
    },
}

impl<T> ScopedView<T> {
    fn pending() -> Self {
        Self::Pending {
            message: PENDING_MESSAGE,
        }
    }

    fn empty() -> Self {
        Self::Empty {
            message: NO_VENUES_MESSAGE,
            create_venue_href: CREATE_VENUE_HREF,
        }
    }
}

impl<T> From<Scoped<T>> for ScopedView<T> {
    fn from(scoped: Scoped<T>) -> Self {
        match scoped {
            Scoped::Pending => Self::pending(),
            Scoped::NoVenues => Self::empty(),
            Scoped::Ready { venue, data } => Self::Ready { venue, data },
        }
    }
}

impl From<VenueScope> for ScopedView<Vec<Venue>> {
    fn from(scope: VenueScope) -> Self {
        match scope {
            VenueScope::Pending => Self::pending(),
            VenueScope::NoVenues => Self::empty(),
            VenueScope::Selected { venue, venues } => Self::Ready {
                venue,
                data: venues,
            },
        }
    }
}
