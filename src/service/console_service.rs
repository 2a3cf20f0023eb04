//! Console service: venue scoping for every authenticated view.
//!
//! Each venue-scoped operation follows the same pattern: fetch the tenant's
//! venues → reconcile the profile's stored selection → read the selection
//! back from the store → issue the backend request keyed on that venue.
//! No venue-scoped request is ever issued with an unreconciled id.
//!
//! Storage reads and writes run on the blocking pool so a slow disk never
//! stalls the async workers.

use std::sync::Arc;

use crate::backend::SchedulingBackend;
use crate::domain::{
    GenerationRequest, RequestProfile, Session, ShareToken, StaffMember, Venue, VenueId,
    VenueListing, VenueSchedule,
};
use crate::error::ConsoleError;
use crate::storage::{ContextRegistry, ProfileContext};

/// Venue context of one request after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenueScope {
    /// The operator has no tenant yet; nothing was fetched.
    Pending,
    /// The tenant owns no venues.
    NoVenues,
    /// A valid venue is selected.
    Selected {
        /// The selected venue.
        venue: Venue,
        /// All venues of the tenant, in backend order.
        venues: Vec<Venue>,
    },
}

impl VenueScope {
    /// Splits off the selected venue, or the data-less result to return.
    ///
    /// # Errors
    ///
    /// Returns the [`Scoped`] value to answer with when no venue is selected.
    pub fn into_venue<T>(self) -> Result<Venue, Scoped<T>> {
        match self {
            Self::Pending => Err(Scoped::Pending),
            Self::NoVenues => Err(Scoped::NoVenues),
            Self::Selected { venue, .. } => Ok(venue),
        }
    }
}

/// Venue-scoped data, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scoped<T> {
    /// Tenant identity unknown.
    Pending,
    /// Tenant owns no venues; the UI prompts to create one.
    NoVenues,
    /// Data for the selected venue.
    Ready {
        /// Venue the data belongs to.
        venue: Venue,
        /// Payload.
        data: T,
    },
}

/// A freshly minted share link.
#[derive(Debug, Clone)]
pub struct ShareLink {
    /// Token bound to one venue and one staff member.
    pub token: ShareToken,
    /// Absolute URL to hand to the staff member.
    pub url: String,
}

/// Orchestration layer for authenticated, venue-scoped operations.
#[derive(Debug, Clone)]
pub struct ConsoleService {
    backend: Arc<dyn SchedulingBackend>,
    contexts: Arc<ContextRegistry>,
    public_base_url: String,
}

impl ConsoleService {
    /// Creates a new `ConsoleService`.
    #[must_use]
    pub fn new(
        backend: Arc<dyn SchedulingBackend>,
        contexts: Arc<ContextRegistry>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            contexts,
            public_base_url: public_base_url.into(),
        }
    }

    /// Returns the per-profile context registry.
    #[must_use]
    pub const fn contexts(&self) -> &Arc<ContextRegistry> {
        &self.contexts
    }

    /// Fetches the tenant's venues. Sessions without a tenant short-circuit
    /// to [`VenueListing::Pending`] without a backend call.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if the backend call fails.
    pub async fn venue_listing(&self, session: &Session) -> Result<VenueListing, ConsoleError> {
        let Some(tenant) = session.tenant.as_ref() else {
            return Ok(VenueListing::Pending);
        };
        let venues = self.backend.list_venues(&session.credential, tenant).await?;
        Ok(VenueListing::Loaded(venues))
    }

    /// Fetches venues, reconciles the profile's selection, and returns the
    /// resulting scope.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if the venue fetch or the selection write
    /// fails.
    pub async fn resolve_scope(
        &self,
        session: &Session,
        profile: RequestProfile,
    ) -> Result<VenueScope, ConsoleError> {
        let listing = self.venue_listing(session).await?;
        let ctx = self.context(profile).await?;
        let outcome = {
            let ctx = Arc::clone(&ctx);
            let listing = listing.clone();
            blocking(move || Ok(ctx.selector().apply(ctx.store(), &listing)?)).await?
        };

        let VenueListing::Loaded(venues) = listing else {
            return Ok(VenueScope::Pending);
        };

        // Read back at call time; fall back to the reconciled value if a
        // concurrent write left something outside this listing.
        let selected = ctx
            .store()
            .get()
            .filter(|id| venues.iter().any(|v| &v.id == id))
            .or_else(|| outcome.selection().cloned());

        let venue = selected.and_then(|id| venues.iter().find(|v| v.id == id).cloned());
        Ok(match venue {
            Some(venue) => VenueScope::Selected { venue, venues },
            None => VenueScope::NoVenues,
        })
    }

    /// Operator switches the active venue.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::UnknownVenue`] unless `venue_id` belongs to the
    /// tenant's current venue list, and [`ConsoleError::InvalidRequest`]
    /// while the tenant is not set up.
    pub async fn select_venue(
        &self,
        session: &Session,
        profile: RequestProfile,
        venue_id: VenueId,
    ) -> Result<Venue, ConsoleError> {
        let listing = self.venue_listing(session).await?;
        let Some(venues) = listing.venues() else {
            return Err(ConsoleError::InvalidRequest(
                "restaurant account is not set up yet".to_string(),
            ));
        };
        let Some(venue) = venues.iter().find(|v| v.id == venue_id).cloned() else {
            return Err(ConsoleError::UnknownVenue(venue_id.to_string()));
        };

        let ctx = self.context(profile).await?;
        let selected = venue.id.clone();
        blocking(move || Ok(ctx.store().set(Some(selected))?)).await?;
        tracing::info!(%profile, venue_id = %venue.id, "venue selected");
        Ok(venue)
    }

    /// The profile's selection after reconciling it against the tenant's
    /// current venues. `None` while the tenant is pending or owns no venues.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if the venue fetch or the selection write
    /// fails.
    pub async fn current_selection(
        &self,
        session: &Session,
        profile: RequestProfile,
    ) -> Result<Option<VenueId>, ConsoleError> {
        Ok(match self.resolve_scope(session, profile).await? {
            VenueScope::Selected { venue, .. } => Some(venue.id),
            VenueScope::Pending | VenueScope::NoVenues => None,
        })
    }

    async fn context(&self, profile: RequestProfile) -> Result<Arc<ProfileContext>, ConsoleError> {
        let contexts = Arc::clone(&self.contexts);
        blocking(move || Ok(contexts.acquire(profile)?)).await
    }

    /// Staff of the selected venue.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if scoping or the backend call fails.
    pub async fn staff(
        &self,
        session: &Session,
        profile: RequestProfile,
    ) -> Result<Scoped<Vec<StaffMember>>, ConsoleError> {
        let venue = match self.resolve_scope(session, profile).await?.into_venue() {
            Ok(venue) => venue,
            Err(early) => return Ok(early),
        };
        let data = self.backend.list_staff(&session.credential, &venue.id).await?;
        Ok(Scoped::Ready { venue, data })
    }

    /// Schedule of the selected venue.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if scoping or the backend call fails.
    pub async fn schedule(
        &self,
        session: &Session,
        profile: RequestProfile,
    ) -> Result<Scoped<VenueSchedule>, ConsoleError> {
        let venue = match self.resolve_scope(session, profile).await?.into_venue() {
            Ok(venue) => venue,
            Err(early) => return Ok(early),
        };
        let data = self
            .backend
            .venue_schedule(&session.credential, &venue.id)
            .await?;
        Ok(Scoped::Ready { venue, data })
    }

    /// Runs the AI scheduler for the selected venue.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] if scoping or the backend call fails.
    pub async fn generate_schedule(
        &self,
        session: &Session,
        profile: RequestProfile,
        request: &GenerationRequest,
    ) -> Result<Scoped<VenueSchedule>, ConsoleError> {
        let venue = match self.resolve_scope(session, profile).await?.into_venue() {
            Ok(venue) => venue,
            Err(early) => return Ok(early),
        };
        let data = self
            .backend
            .generate_schedule(&session.credential, &venue.id, request)
            .await?;
        tracing::info!(venue_id = %venue.id, week_start = %request.week_start, "schedule generated");
        Ok(Scoped::Ready { venue, data })
    }

    /// Mints a share link for one staff member of the selected venue.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::InvalidRequest`] for a blank staff id, or a
    /// [`ConsoleError`] if scoping or the backend call fails.
    pub async fn create_share_link(
        &self,
        session: &Session,
        profile: RequestProfile,
        staff_id: &str,
    ) -> Result<Scoped<ShareLink>, ConsoleError> {
        if staff_id.trim().is_empty() {
            return Err(ConsoleError::InvalidRequest("staff id is required".to_string()));
        }
        let venue = match self.resolve_scope(session, profile).await?.into_venue() {
            Ok(venue) => venue,
            Err(early) => return Ok(early),
        };
        let token = self
            .backend
            .create_share_token(&session.credential, &venue.id, staff_id)
            .await?;
        let url = format!(
            "{}/s/{}",
            self.public_base_url.trim_end_matches('/'),
            token.as_str()
        );
        tracing::info!(venue_id = %venue.id, staff_id, token = %token.redacted(), "share link created");
        Ok(Scoped::Ready {
            venue,
            data: ShareLink { token, url },
        })
    }
}

/// Runs a storage operation on the blocking pool.
async fn blocking<T, F>(op: F) -> Result<T, ConsoleError>
where
    F: FnOnce() -> Result<T, ConsoleError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| ConsoleError::Internal(format!("storage task failed: {e}")))?
}
