use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::server::error::InternalServerError;

/// Server configuration could not be read from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set to start the auth session service")]
    MissingEnvVar(String),
    /// Value present but unusable, e.g. a short cookie secret or an unbounded cookie lifetime.
    #[error("{var} is set to an unusable value ({reason})")]
    InvalidEnvValue { var: String, reason: String },
}

impl IntoResponse for ConfigError {
    fn into_response(self) -> Response {
        InternalServerError(self).into_response()
    }
}
