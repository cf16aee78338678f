//! Authenticated principal and remember-me payload types.

use std::collections::BTreeMap;

use serde_json::Value;

/// Identity state key carrying the user's auth session token.
pub const AUTH_SESSION_TOKEN_STATE: &str = "authSessionToken";

/// Arbitrary state attached to an identity at login, persisted in the session and in the
/// remember-me cookie.
pub type IdentityStates = BTreeMap<String, Value>;

/// A principal whose credentials have been verified and is ready to be logged in.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    pub id: i32,
    pub name: String,
    pub states: IdentityStates,
}

impl Identity {
    /// Builds an identity that claims `token` as its auth session token.
    pub fn with_auth_session_token(id: i32, name: impl Into<String>, token: &str) -> Self {
        let mut states = IdentityStates::new();
        states.insert(
            AUTH_SESSION_TOKEN_STATE.to_string(),
            Value::String(token.to_string()),
        );

        Self {
            id,
            name: name.into(),
            states,
        }
    }
}

/// Returns the auth session token claimed by `states`, if any.
///
/// Only a string value counts as a claim.
pub fn auth_session_token(states: &IdentityStates) -> Option<&str> {
    states.get(AUTH_SESSION_TOKEN_STATE).and_then(Value::as_str)
}

/// Fields carried by the remember-me cookie once its signature has been verified.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityCookiePayload {
    pub id: i32,
    pub name: String,
    /// Lifetime of the cookie in seconds, reused when the cookie is renewed.
    pub duration: u64,
    pub states: IdentityStates,
}
