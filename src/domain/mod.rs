//! Domain layer: identifiers, venue reference data, sessions, share tokens,
//! venue auto-selection and the selection event bus.

pub mod auto_select;
pub mod event_bus;
pub mod schedule;
pub mod selection_event;
pub mod session;
pub mod share_token;
pub mod venue;

pub use auto_select::{Reconciliation, SelectionOutcome, VenueAutoSelector, reconcile};
pub use event_bus::EventBus;
pub use schedule::{GenerationRequest, Shift, SharedSchedule, StaffMember, VenueSchedule};
pub use selection_event::SelectionEvent;
pub use session::{ClientProfile, Credential, RequestProfile, Session, SessionId};
pub use share_token::{ShareToken, ShareTokenError};
pub use venue::{TenantId, Venue, VenueId, VenueListing};
