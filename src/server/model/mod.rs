//! Server application models and type definitions.
//!
//! This module contains the data models of the session subsystem: application state, API
//! bodies, flash messages, the logged in identity and the typed session wrappers built on the
//! [`session::store::SessionStore`] capability.

pub mod api;
pub mod app;
pub mod auth;
pub mod cookie;
pub mod flash;
pub mod identity;
pub mod session;
