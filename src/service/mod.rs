//! Service layer: orchestration between handlers, the context registry and
//! the scheduling backend.

pub mod console_service;
pub mod session_service;
pub mod share_resolver;

pub use console_service::{ConsoleService, Scoped, ShareLink, VenueScope};
pub use session_service::SessionService;
pub use share_resolver::{ShareFailure, ShareService, ShareState, ShareTokenResolver};
