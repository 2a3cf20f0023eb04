//! Per-profile venue contexts.
//!
//! [`ContextRegistry`] hands out one [`ProfileContext`] per client profile,
//! created lazily from durable storage. All tabs of a browser profile served
//! by this process share the same store and selector.
//!
//! The cache is bounded: it holds at most [`RegistryLimits::max_profiles`]
//! contexts, and [`ContextRegistry::evict_idle`] drops contexts unused for
//! longer than [`RegistryLimits::idle_ttl`]. An evicted profile is reloaded
//! from storage on its next request. Profiles minted for a single request
//! get a transient, memory-only context that is never cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

use super::kv::{KeyValuePort, MemoryKeyValue, ProfileStorage, StorageError};
use super::venue_context::{Subscription, VenueContextStore};
use crate::domain::{ClientProfile, EventBus, RequestProfile, SelectionEvent, VenueAutoSelector};

/// Venue context of one client profile.
#[derive(Debug)]
pub struct ProfileContext {
    profile: ClientProfile,
    store: VenueContextStore,
    selector: VenueAutoSelector,
    last_used_ms: AtomicI64,
    _events: Subscription,
}

impl ProfileContext {
    /// Profile this context belongs to.
    #[must_use]
    pub const fn profile(&self) -> ClientProfile {
        self.profile
    }

    /// The persisted selection cell.
    #[must_use]
    pub const fn store(&self) -> &VenueContextStore {
        &self.store
    }

    /// The reconciliation policy bound to this profile's store.
    #[must_use]
    pub const fn selector(&self) -> &VenueAutoSelector {
        &self.selector
    }

    fn touch(&self, now: DateTime<Utc>) {
        self.last_used_ms.store(now.timestamp_millis(), Ordering::Relaxed);
    }

    fn last_used_ms(&self) -> i64 {
        self.last_used_ms.load(Ordering::Relaxed)
    }
}

/// Bounds of the context cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryLimits {
    /// Maximum number of cached profiles.
    pub max_profiles: usize,
    /// Cached contexts unused for longer than this are evicted by
    /// [`ContextRegistry::evict_idle`].
    pub idle_ttl: Duration,
}

impl Default for RegistryLimits {
    fn default() -> Self {
        Self {
            max_profiles: 10_000,
            idle_ttl: Duration::hours(1),
        }
    }
}

/// Bounded, lazily populated map of profile contexts over a shared storage
/// backend.
#[derive(Debug)]
pub struct ContextRegistry {
    storage: Arc<dyn KeyValuePort>,
    event_bus: EventBus,
    limits: RegistryLimits,
    contexts: RwLock<HashMap<ClientProfile, Arc<ProfileContext>>>,
}

impl ContextRegistry {
    /// Creates an empty registry. Stores publish their changes on `event_bus`.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValuePort>, event_bus: EventBus, limits: RegistryLimits) -> Self {
        Self {
            storage,
            event_bus,
            limits: RegistryLimits {
                max_profiles: limits.max_profiles.max(1),
                ..limits
            },
            contexts: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the context for a request's profile.
    ///
    /// Returning profiles go through [`Self::for_profile`]. A minted profile
    /// gets a fresh context over memory-only storage that is neither cached
    /// nor persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the profile's persisted selection cannot
    /// be read.
    pub fn acquire(&self, profile: RequestProfile) -> Result<Arc<ProfileContext>, StorageError> {
        if profile.minted {
            let scratch: Arc<dyn KeyValuePort> = Arc::new(MemoryKeyValue::new());
            return self.build(profile.id, scratch).map(Arc::new);
        }
        self.for_profile(profile.id)
    }

    /// Returns the cached context for `profile`, loading it from durable
    /// storage on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the profile's persisted selection cannot
    /// be read.
    pub fn for_profile(&self, profile: ClientProfile) -> Result<Arc<ProfileContext>, StorageError> {
        let now = Utc::now();
        if let Some(ctx) = self
            .contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&profile)
        {
            ctx.touch(now);
            return Ok(Arc::clone(ctx));
        }

        let mut contexts = self.contexts.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(ctx) = contexts.get(&profile) {
            ctx.touch(now);
            return Ok(Arc::clone(ctx));
        }

        let ctx = Arc::new(self.build(profile, Arc::clone(&self.storage))?);
        while contexts.len() >= self.limits.max_profiles {
            let Some(oldest) = least_recently_used(&contexts) else {
                break;
            };
            contexts.remove(&oldest);
            tracing::debug!(profile = %oldest, "venue context evicted at capacity");
        }
        contexts.insert(profile, Arc::clone(&ctx));
        tracing::debug!(%profile, "venue context loaded");
        Ok(ctx)
    }

    /// Drops cached contexts idle for longer than the configured TTL.
    /// Contexts still held by an in-flight request are kept.
    ///
    /// Returns the number of evicted contexts.
    pub fn evict_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = (now - self.limits.idle_ttl).timestamp_millis();
        let mut contexts = self.contexts.write().unwrap_or_else(PoisonError::into_inner);
        let before = contexts.len();
        contexts.retain(|_, ctx| Arc::strong_count(ctx) > 1 || ctx.last_used_ms() >= cutoff);
        before - contexts.len()
    }

    /// Number of cached profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no profile is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn build(
        &self,
        profile: ClientProfile,
        storage: Arc<dyn KeyValuePort>,
    ) -> Result<ProfileContext, StorageError> {
        let scoped = ProfileStorage::new(storage, profile);
        let store = VenueContextStore::load(Arc::new(scoped))?;
        let bus = self.event_bus.clone();
        let events = store.subscribe(move |venue_id| {
            bus.publish(SelectionEvent::SelectionChanged {
                profile,
                venue_id: venue_id.cloned(),
                timestamp: Utc::now(),
            });
        });

        Ok(ProfileContext {
            profile,
            store,
            selector: VenueAutoSelector::new(),
            last_used_ms: AtomicI64::new(Utc::now().timestamp_millis()),
            _events: events,
        })
    }
}

/// Least recently used context that no request is holding.
fn least_recently_used(
    contexts: &HashMap<ClientProfile, Arc<ProfileContext>>,
) -> Option<ClientProfile> {
    contexts
        .iter()
        .filter(|(_, ctx)| Arc::strong_count(ctx) == 1)
        .min_by_key(|(_, ctx)| ctx.last_used_ms())
        .map(|(profile, _)| *profile)
}
