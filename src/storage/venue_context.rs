//! Persistent, observable "selected venue" cell.
//!
//! [`VenueContextStore`] stores whatever it is given, persists it
//! immediately, and tells its subscribers. Keeping the value
//! consistent with the tenant's venues is [`crate::domain::VenueAutoSelector`]'s
//! job.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use serde::{Deserialize, Serialize};

use super::kv::{KeyValuePort, StorageError};
use crate::domain::VenueId;

/// Storage key of the selection record.
pub const SELECTION_NAMESPACE: &str = "rota.venue-selection";

/// Persisted shape of the selection.
///
/// Unknown fields are ignored and a missing field reads as `None`, so older
/// and newer consoles can share a storage directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRecord {
    /// Currently selected venue.
    #[serde(default)]
    pub selected_venue_id: Option<VenueId>,
}

impl SelectionRecord {
    /// Decodes a stored record. Empty, malformed or unknown content yields
    /// the empty selection.
    #[must_use]
    pub fn decode(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str::<Self>(raw) {
            Ok(record) => Self {
                selected_venue_id: record
                    .selected_venue_id
                    .filter(|id| !id.as_str().is_empty()),
            },
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unreadable selection record");
                Self::default()
            }
        }
    }
}

type Listener = Arc<dyn Fn(Option<&VenueId>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Observable, persisted selection of the active venue.
pub struct VenueContextStore {
    storage: Arc<dyn KeyValuePort>,
    current: RwLock<Option<VenueId>>,
    listeners: Arc<Mutex<Listeners>>,
}

impl VenueContextStore {
    /// Opens the store over `storage`, reading the persisted selection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read. Content that
    /// cannot be decoded is not an error; it reads as no selection.
    pub fn load(storage: Arc<dyn KeyValuePort>) -> Result<Self, StorageError> {
        let record = storage
            .read(SELECTION_NAMESPACE)?
            .map(|raw| SelectionRecord::decode(&raw))
            .unwrap_or_default();
        Ok(Self {
            storage,
            current: RwLock::new(record.selected_venue_id),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        })
    }

    /// Returns the current selection.
    #[must_use]
    pub fn get(&self) -> Option<VenueId> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the selection, persists it, then notifies every subscriber
    /// before returning.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the record could not be persisted. The
    /// in-memory value is left unchanged and no subscriber is called.
    pub fn set(&self, id: Option<VenueId>) -> Result<(), StorageError> {
        let record = SelectionRecord {
            selected_venue_id: id.clone(),
        };
        let encoded = serde_json::to_string(&record)?;
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            self.storage.write(SELECTION_NAMESPACE, &encoded)?;
            *current = id.clone();
        }

        // Snapshot so listeners may call back into the store.
        let listeners: Vec<Listener> = {
            let guard = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            guard.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in &listeners {
            listener(id.as_ref());
        }
        Ok(())
    }

    /// Registers `listener`, called synchronously after every successful
    /// [`set`](Self::set). The listener stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&VenueId>) + Send + Sync + 'static,
    {
        let mut guard = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let id = guard.next_id;
        guard.next_id = guard.next_id.wrapping_add(1);
        guard.entries.push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

impl fmt::Debug for VenueContextStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VenueContextStore")
            .field("storage", &self.storage)
            .field("current", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`VenueContextStore::subscribe`]; removes the listener
/// when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// Removes the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            let mut guard = listeners.lock().unwrap_or_else(PoisonError::into_inner);
            guard.entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::MemoryKeyValue;

    #[derive(Debug)]
    struct BrokenStorage;

    impl KeyValuePort for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk full".to_string()))
        }
    }

    fn open(storage: &Arc<MemoryKeyValue>) -> VenueContextStore {
        let port: Arc<dyn KeyValuePort> = Arc::<MemoryKeyValue>::clone(storage);
        let Ok(store) = VenueContextStore::load(port) else {
            panic!("memory store must load");
        };
        store
    }

    #[test]
    fn fresh_storage_has_no_selection() {
        let store = open(&Arc::new(MemoryKeyValue::new()));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn selection_survives_reload() {
        let storage = Arc::new(MemoryKeyValue::new());
        assert!(storage.write("unrelated", "keep-me").is_ok());

        let store = open(&storage);
        assert!(store.set(Some(VenueId::from("v3"))).is_ok());
        drop(store);

        let reloaded = open(&storage);
        assert_eq!(reloaded.get(), Some(VenueId::from("v3")));
        assert_eq!(
            storage.read("unrelated").ok().flatten().as_deref(),
            Some("keep-me")
        );
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn record_uses_camel_case_key() {
        let storage = Arc::new(MemoryKeyValue::new());
        let store = open(&storage);
        assert!(store.set(Some(VenueId::from("v1"))).is_ok());
        assert_eq!(
            storage.read(SELECTION_NAMESPACE).ok().flatten().as_deref(),
            Some(r#"{"selectedVenueId":"v1"}"#)
        );
    }

    #[test]
    fn unreadable_records_mean_no_selection() {
        for raw in ["", "   ", "not json", "[]", r#"{"selectedVenueId":""}"#, "{}"] {
            assert_eq!(SelectionRecord::decode(raw), SelectionRecord::default());
        }
        let future = SelectionRecord::decode(r#"{"selectedVenueId":"v2","pinned":true}"#);
        assert_eq!(future.selected_venue_id, Some(VenueId::from("v2")));
    }

    #[test]
    fn subscribers_run_before_set_returns() {
        let store = open(&Arc::new(MemoryKeyValue::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |id| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(id.cloned());
        });

        assert!(store.set(Some(VenueId::from("v1"))).is_ok());
        assert!(store.set(None).is_ok());

        let seen = seen.lock().unwrap_or_else(PoisonError::into_inner).clone();
        assert_eq!(seen, vec![Some(VenueId::from("v1")), None]);
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let store = open(&Arc::new(MemoryKeyValue::new()));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(store.set(Some(VenueId::from("v1"))).is_ok());
        sub.unsubscribe();
        assert!(store.set(Some(VenueId::from("v2"))).is_ok());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn listener_may_read_store() {
        let store = Arc::new(open(&Arc::new(MemoryKeyValue::new())));
        let observed = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&observed);
        let weak = Arc::downgrade(&store);
        let _sub = store.subscribe(move |_| {
            if let Some(store) = weak.upgrade() {
                *sink.lock().unwrap_or_else(PoisonError::into_inner) = store.get();
            }
        });
        assert!(store.set(Some(VenueId::from("v7"))).is_ok());
        let observed = observed.lock().unwrap_or_else(PoisonError::into_inner).clone();
        assert_eq!(observed, Some(VenueId::from("v7")));
    }

    #[test]
    fn failed_write_keeps_previous_value_and_is_silent() {
        let Ok(store) = VenueContextStore::load(Arc::new(BrokenStorage)) else {
            panic!("load");
        };
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.set(Some(VenueId::from("v1"))).is_err());
        assert_eq!(store.get(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
