//! Venue auto-selection: keeps the persisted selection consistent with the
//! tenant's current venue list.
//!
//! [`reconcile`] is the pure policy. [`VenueAutoSelector`] applies it to a
//! [`VenueContextStore`], writing only when the stored value diverges from
//! the policy's target.

use std::sync::{Mutex, PoisonError};

use super::{Venue, VenueId, VenueListing};
use crate::storage::{StorageError, VenueContextStore};

/// Decision produced by [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The stored value is already valid (or already empty with no venues).
    Keep,
    /// Replace the stored value with this venue.
    Assign(VenueId),
    /// The tenant has no venues; drop the stored value.
    Clear,
}

impl Reconciliation {
    /// Selection that results from applying this decision to `stored`.
    #[must_use]
    pub fn target(&self, stored: Option<&VenueId>) -> Option<VenueId> {
        match self {
            Self::Keep => stored.cloned(),
            Self::Assign(id) => Some(id.clone()),
            Self::Clear => None,
        }
    }
}

/// Computes the corrected selection for `venues` given the `stored` value.
///
/// - no venues: clear a stored value, otherwise keep the empty selection;
/// - nothing stored, or a stored id missing from `venues`: pick the first
///   venue in backend order;
/// - otherwise keep.
#[must_use]
pub fn reconcile(venues: &[Venue], stored: Option<&VenueId>) -> Reconciliation {
    let Some(first) = venues.first() else {
        return match stored {
            Some(_) => Reconciliation::Clear,
            None => Reconciliation::Keep,
        };
    };
    match stored {
        Some(id) if venues.iter().any(|v| &v.id == id) => Reconciliation::Keep,
        _ => Reconciliation::Assign(first.id.clone()),
    }
}

/// What [`VenueAutoSelector::apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Tenant identity unknown; the selector did not run.
    Pending,
    /// The stored selection was already valid.
    Unchanged(Option<VenueId>),
    /// The stored selection was stale or missing and has been rewritten.
    Corrected {
        /// Value found in the store.
        previous: Option<VenueId>,
        /// Value written to the store.
        current: Option<VenueId>,
    },
}

impl SelectionOutcome {
    /// Selection in effect after the call, `None` while pending.
    #[must_use]
    pub fn selection(&self) -> Option<&VenueId> {
        match self {
            Self::Pending => None,
            Self::Unchanged(current) | Self::Corrected { current, .. } => current.as_ref(),
        }
    }
}

/// Applies [`reconcile`] to a store, once per divergence.
///
/// Read, decide and write happen under one lock so that concurrent requests
/// for the same client profile cannot both observe a stale value and write
/// twice.
#[derive(Debug, Default)]
pub struct VenueAutoSelector {
    gate: Mutex<()>,
}

impl VenueAutoSelector {
    /// Creates a selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles `store` against a freshly fetched `listing`.
    ///
    /// A pending listing is a no-op. Otherwise the store is written only if
    /// [`reconcile`] says the stored value must change; running `apply` again
    /// with the same listing therefore never writes a second time.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting the corrected selection fails;
    /// the store keeps its previous value in that case.
    pub fn apply(
        &self,
        store: &VenueContextStore,
        listing: &VenueListing,
    ) -> Result<SelectionOutcome, StorageError> {
        let VenueListing::Loaded(venues) = listing else {
            return Ok(SelectionOutcome::Pending);
        };

        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let stored = store.get();
        let decision = reconcile(venues, stored.as_ref());
        if decision == Reconciliation::Keep {
            return Ok(SelectionOutcome::Unchanged(stored));
        }

        let current = decision.target(stored.as_ref());
        store.set(current.clone())?;
        tracing::info!(
            previous = ?stored,
            current = ?current,
            venues = venues.len(),
            "stale venue selection corrected"
        );
        Ok(SelectionOutcome::Corrected {
            previous: stored,
            current,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::MemoryKeyValue;

    fn venue(id: &str) -> Venue {
        Venue {
            id: VenueId::from(id),
            name: id.to_uppercase(),
            address: String::new(),
        }
    }

    fn id(raw: &str) -> VenueId {
        VenueId::from(raw)
    }

    fn empty_store() -> VenueContextStore {
        let Ok(store) = VenueContextStore::load(Arc::new(MemoryKeyValue::new())) else {
            panic!("memory store must load");
        };
        store
    }

    #[test]
    fn null_selection_picks_first_venue() {
        let venues = [venue("v1"), venue("v2")];
        assert_eq!(reconcile(&venues, None), Reconciliation::Assign(id("v1")));
    }

    #[test]
    fn deleted_selection_moves_to_first_remaining() {
        let venues = [venue("v2")];
        let decision = reconcile(&venues, Some(&id("v1")));
        assert_eq!(decision.target(Some(&id("v1"))), Some(id("v2")));
    }

    #[test]
    fn no_venues_clears_selection() {
        assert_eq!(reconcile(&[], Some(&id("v1"))), Reconciliation::Clear);
        assert_eq!(reconcile(&[], None), Reconciliation::Keep);
    }

    #[test]
    fn valid_selection_is_kept_even_if_not_first() {
        let venues = [venue("v1"), venue("v2")];
        assert_eq!(reconcile(&venues, Some(&id("v2"))), Reconciliation::Keep);
    }

    #[test]
    fn foreign_selection_always_corrects_to_head_or_none() {
        let lists: [&[&str]; 4] = [&[], &["a"], &["b", "a"], &["x", "y", "z"]];
        for ids in lists {
            let venues: Vec<Venue> = ids.iter().map(|raw| venue(raw)).collect();
            let stale = id("foreign");
            let target = reconcile(&venues, Some(&stale)).target(Some(&stale));
            assert_eq!(target, venues.first().map(|v| v.id.clone()));
        }
    }

    #[test]
    fn pending_listing_does_not_touch_store() {
        let store = empty_store();
        let Ok(()) = store.set(Some(id("v1"))) else {
            panic!("set failed");
        };
        let selector = VenueAutoSelector::new();
        let outcome = selector.apply(&store, &VenueListing::Pending);
        assert!(matches!(outcome, Ok(SelectionOutcome::Pending)));
        assert_eq!(store.get(), Some(id("v1")));
    }

    #[test]
    fn second_apply_with_same_listing_does_not_write() {
        let store = empty_store();
        let writes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&writes);
        let _sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let selector = VenueAutoSelector::new();
        let listing = VenueListing::Loaded(vec![venue("v1"), venue("v2")]);

        let first = selector.apply(&store, &listing);
        let second = selector.apply(&store, &listing);

        assert!(matches!(first, Ok(SelectionOutcome::Corrected { .. })));
        assert_eq!(second.ok(), Some(SelectionOutcome::Unchanged(Some(id("v1")))));
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_listing_clears_stale_value_once() {
        let store = empty_store();
        let Ok(()) = store.set(Some(id("v1"))) else {
            panic!("set failed");
        };
        let selector = VenueAutoSelector::new();
        let listing = VenueListing::Loaded(Vec::new());

        let outcome = selector.apply(&store, &listing);
        assert_eq!(
            outcome.ok(),
            Some(SelectionOutcome::Corrected {
                previous: Some(id("v1")),
                current: None,
            })
        );
        assert_eq!(store.get(), None);

        let again = selector.apply(&store, &listing);
        assert_eq!(again.ok(), Some(SelectionOutcome::Unchanged(None)));
    }
}
