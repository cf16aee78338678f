//! Session data models and utilities.
//!
//! This module provides the [`store::SessionStore`] capability and type-safe wrappers for the
//! session data the authentication subsystem keeps: the logged in identity and the return URL.
//! Flash messages live under their own prefix and are managed by the flash service.

pub mod auth;
pub mod store;
pub mod user;
