//! WebSocket layer: connection handling, commands and per-profile filtering.
//!
//! The endpoint at `/dashboard/ws` sits behind the session gate and pushes
//! `selection_changed` events for the caller's client profile, so every
//! open tab of one browser follows venue switches made in another.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
