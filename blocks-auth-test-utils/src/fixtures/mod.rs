//! Test fixture modules for database records.
//!
//! - `user` - `blocks_user` records with a known password

pub mod user;
