//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the authenticated request gateway, `auth` the sign-in flows built
//! on it, `transport` the pluggable HTTP backends, and `types` the shared
//! request/response shapes.

pub mod api;
pub mod auth;
pub mod transport;
pub mod types;
