//! Outcomes of the authentication session flows.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// What the client sent, as far as the login flow cares.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurrentRequest {
    /// Request was made through `XMLHttpRequest`.
    pub ajax: bool,
    /// Request path without the leading slash.
    pub path: String,
    /// Path and query string as requested.
    pub url: String,
}

/// How an anonymous request for a protected resource ends.
///
/// Having no login destination at all is an error instead, see
/// [`AuthError::LoginRequired`](crate::server::error::auth::AuthError::LoginRequired).
#[derive(Clone, Debug, PartialEq)]
pub enum LoginRequired {
    /// Send the visitor to the login page.
    Redirect(String),
    /// AJAX caller gets the configured body and processing stops.
    AjaxResponse(String),
}

impl IntoResponse for LoginRequired {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(url) => Redirect::temporary(&url).into_response(),
            Self::AjaxResponse(body) => (StatusCode::OK, body).into_response(),
        }
    }
}
