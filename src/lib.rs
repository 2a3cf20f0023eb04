//! # rota-console
//!
//! Host for a restaurant staff-scheduling console. It fronts a scheduling
//! backend and owns the access and tenant-scoping core:
//!
//! - a session gate that admits `/dashboard` requests only with a live
//!   operator session,
//! - a persisted, per-client venue selection that is reconciled against
//!   the tenant's venue list every time that list is loaded,
//! - anonymous `/s/{token}` links that resolve a share token to one staff
//!   member's upcoming shifts without any operator credential.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── Public routes: /login, /s/{token} (api/)
//!     ├── require_session → attach_profile (auth/)
//!     │       └── /dashboard handlers, /dashboard/ws (api/, ws/)
//!     │
//!     ├── ConsoleService · SessionService · ShareService (service/)
//!     ├── VenueAutoSelector · EventBus (domain/)
//!     │
//!     ├── ContextRegistry → VenueContextStore (storage/)
//!     │       └── KeyValuePort (file or memory)
//!     │
//!     └── SchedulingBackend (backend/, reqwest)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod backend;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;
pub mod ws;
