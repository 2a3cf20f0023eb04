//! Venue selection and share-link DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Venue, VenueId};

/// Request body for `PUT /dashboard/venues/selection`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectVenueRequest {
    /// Venue to make active.
    pub venue_id: VenueId,
}

/// Response body for `PUT /dashboard/venues/selection`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SelectionResponse {
    /// Stored selection after the write.
    pub selected_venue_id: VenueId,
    /// The selected venue.
    pub venue: Venue,
}

/// Response body for `POST /dashboard/staff/{staff_id}/share-link`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShareLinkResponse {
    /// Staff member the link is bound to.
    pub staff_id: String,
    /// Absolute link to hand out.
    pub url: String,
}
