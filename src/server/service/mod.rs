//! Service layer for business logic and orchestration.
//!
//! This module contains the authentication session manager, the flash message store and the
//! remember-me cookie codec. Services coordinate between the session, the cookie jar and the
//! user repository.

pub mod auth;
pub mod cookie;
pub mod flash;
