//! Operator authentication: session table, cookies and the dashboard gate.

pub mod cookies;
pub mod guard;
pub mod session_table;

pub use guard::{
    CookieSessionProbe, GuardState, SessionGuard, SessionProbe, attach_profile, require_session,
};
pub use session_table::{SessionError, SessionTable};
