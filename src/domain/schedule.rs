//! Staff and schedule payloads exchanged with the scheduling backend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::VenueId;

/// A staff member employed at a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StaffMember {
    /// Backend identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role, e.g. `"server"`, `"line cook"`.
    #[serde(default)]
    pub role: String,
}

/// One assigned shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Shift {
    /// Backend identifier.
    pub id: String,
    /// Assigned staff member.
    pub staff_id: String,
    /// Staff display name, denormalised by the backend.
    #[serde(default)]
    pub staff_name: String,
    /// Role covered by the shift.
    #[serde(default)]
    pub role: String,
    /// Shift start.
    pub starts_at: DateTime<Utc>,
    /// Shift end.
    pub ends_at: DateTime<Utc>,
}

/// Schedule of one venue, as generated by the scheduling service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VenueSchedule {
    /// Venue the schedule belongs to.
    pub venue_id: VenueId,
    /// Assigned shifts in chronological order.
    #[serde(default)]
    pub shifts: Vec<Shift>,
    /// When the schedule was last generated, if ever.
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

/// Parameters for an AI schedule generation run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerationRequest {
    /// Monday of the week to schedule.
    pub week_start: NaiveDate,
    /// Free-form hints forwarded to the scheduler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Read-only schedule exposed through a share link.
///
/// Scoped server-side to one venue and one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SharedSchedule {
    /// Venue display name.
    pub venue_name: String,
    /// Staff member the link was minted for.
    pub staff_name: String,
    /// Upcoming shifts; may be empty.
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

impl SharedSchedule {
    /// Returns `true` when there are no upcoming shifts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}
