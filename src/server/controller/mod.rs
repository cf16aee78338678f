//! HTTP controller endpoints for the blocks-auth web API.
//!
//! Controllers handle HTTP requests, build the per-request
//! [`AuthSessionManager`](crate::server::service::auth::AuthSessionManager) from the session and
//! cookie jar installed by the tower-sessions layer, and return JSON responses documented with
//! utoipa.

pub mod auth;
pub mod util;
