//! Server application core modules.
//!
//! This module contains the server side of the blocks authentication session service: HTTP
//! routing, the session manager with its flash message store and remember-me cookies, user
//! persistence and configuration.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
