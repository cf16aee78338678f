//! Error types for the blocks-auth server.
//!
//! This module provides the error handling system for the session subsystem with specialized
//! error types per domain (authentication, configuration, identity cookies). All errors
//! implement `IntoResponse` for Axum HTTP responses and use `thiserror` for ergonomic error
//! definitions with automatic `Display` and `Error` trait implementations.

pub mod auth;
pub mod config;
pub mod cookie;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::server::{
    error::{auth::AuthError, config::ConfigError, cookie::IdentityCookieError},
    model::api::ErrorDto,
};

/// Main error type for the blocks-auth server.
///
/// This enum aggregates all domain-specific error types and external library errors into a
/// single unified error type. It uses `thiserror`'s `#[from]` attribute to enable automatic
/// conversion from underlying error types via the `?` operator. The `IntoResponse` implementation
/// maps errors to appropriate HTTP responses for API consumers.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Authentication errors (login required)
/// - Identity cookie errors (malformed payload, signature mismatch)
/// - External library errors (database, sessions, JSON)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication error (login required).
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Identity cookie could not be encoded or failed validation.
    #[error(transparent)]
    IdentityCookieError(#[from] IdentityCookieError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Session value could not be converted to or from JSON.
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

/// Converts application errors into HTTP responses.
///
/// Domain errors carry their own response mapping; everything else is treated as an
/// internal server error (500) and logged.
///
/// # Returns
/// - 403 Forbidden - Login required and no login destination configured
/// - 500 Internal Server Error - For all other errors (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// This struct logs the error message and returns a generic "Internal server error" message
/// to the client to avoid leaking implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
impl From<blocks_auth_test_utils::TestError> for Error {
    fn from(err: blocks_auth_test_utils::TestError) -> Self {
        use blocks_auth_test_utils::TestError;

        match err {
            TestError::DbErr(err) => Self::DbErr(err),
            TestError::SessionError(err) => Self::SessionError(err),
            err => Self::ParseError(err.to_string()),
        }
    }
}
