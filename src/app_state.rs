//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::SessionTable;
use crate::backend::SchedulingBackend;
use crate::config::ConsoleConfig;
use crate::domain::EventBus;
use crate::service::{ConsoleService, SessionService, ShareService};
use crate::storage::{ContextRegistry, KeyValuePort, RegistryLimits};

/// Cookie names and attributes shared by the middleware and auth handlers.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Session cookie name.
    pub session_name: String,
    /// Client-profile cookie name.
    pub profile_name: String,
    /// Whether cookies carry `Secure`.
    pub secure: bool,
    /// Session cookie `Max-Age`.
    pub session_max_age_secs: i64,
}

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Venue-scoped operations for the dashboard.
    pub console_service: Arc<ConsoleService>,
    /// Login, logout and the session table.
    pub session_service: Arc<SessionService>,
    /// Share-link resolution.
    pub share_service: Arc<ShareService>,
    /// Selection events for WebSocket subscribers.
    pub event_bus: EventBus,
    /// Cookie configuration.
    pub cookies: Arc<CookieSettings>,
}

impl AppState {
    /// Wires services over a backend and a storage port.
    #[must_use]
    pub fn build(
        config: &ConsoleConfig,
        backend: Arc<dyn SchedulingBackend>,
        storage: Arc<dyn KeyValuePort>,
    ) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let contexts = Arc::new(ContextRegistry::new(
            storage,
            event_bus.clone(),
            RegistryLimits {
                max_profiles: config.profile_cache_capacity,
                idle_ttl: config.profile_idle_ttl,
            },
        ));

        let console_service = Arc::new(ConsoleService::new(
            Arc::clone(&backend),
            contexts,
            config.public_base_url.clone(),
        ));
        let session_service = Arc::new(SessionService::new(
            Arc::clone(&backend),
            SessionTable::new(config.session_ttl),
        ));
        let share_service = Arc::new(ShareService::new(backend));

        Self {
            console_service,
            session_service,
            share_service,
            event_bus,
            cookies: Arc::new(CookieSettings {
                session_name: config.session_cookie.clone(),
                profile_name: config.profile_cookie.clone(),
                secure: config.cookie_secure,
                session_max_age_secs: config.session_ttl.num_seconds(),
            }),
        }
    }
}
