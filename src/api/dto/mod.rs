//! Data Transfer Objects for request/response serialization.
//!
//! Dashboard views share the [`ScopedView`] envelope; share links use
//! [`ShareView`].

pub mod auth_dto;
pub mod share_dto;
pub mod venue_dto;
pub mod view_dto;

pub use auth_dto::*;
pub use share_dto::*;
pub use venue_dto::*;
pub use view_dto::*;
