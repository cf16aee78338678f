//! Utility functions for controller request handling.
//!
//! This module provides the [`CurrentRequest`](crate::server::model::auth::CurrentRequest)
//! extractor and user session retrieval for protected endpoints.

pub mod get_user;
pub mod request;
