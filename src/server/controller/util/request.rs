use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::server::model::auth::CurrentRequest;

/// Header set by JavaScript clients on AJAX requests.
pub static X_REQUESTED_WITH: &str = "x-requested-with";

impl<S: Send + Sync> FromRequestParts<S> for CurrentRequest {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ajax = parts
            .headers
            .get(X_REQUESTED_WITH)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"));

        let url = parts
            .uri
            .path_and_query()
            .map(|path_and_query| path_and_query.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        Ok(Self {
            ajax,
            path: parts.uri.path().trim_start_matches('/').to_string(),
            url,
        })
    }
}
