//! Data access layer repositories.
//!
//! Repositories provide an abstraction layer over database operations. The session subsystem
//! only reaches the database through the [`user::UserStore`] capability.

pub mod user;
