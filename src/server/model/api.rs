//! Request and response bodies of the HTTP API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::server::model::flash::Message;

/// The response when an error occurs with an API request
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// Credentials submitted to the login endpoint
#[derive(Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestDto {
    /// Username or email address
    #[serde(default)]
    pub login_name: String,
    #[serde(default)]
    pub password: String,
    /// Issue a remember-me cookie with the configured lifetime
    #[serde(default)]
    pub remember_me: bool,
}

/// Successful login
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseDto {
    /// Where the client should navigate next
    pub return_url: String,
}

/// Login form rejected, errors keyed by field name
#[derive(Serialize, Deserialize, ToSchema)]
pub struct FieldErrorsDto {
    pub errors: BTreeMap<String, Vec<String>>,
}

/// The currently logged in user
#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
}

/// Flash messages drained from the session
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessagesDto {
    pub messages: Vec<Message>,
}
