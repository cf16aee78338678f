//! Credential form for the login flow.

use std::{collections::BTreeMap, sync::LazyLock};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{distr::Alphanumeric, Rng};
use validator::Validate;

/// Error attached to the password field for any unknown user or wrong password.
pub const INVALID_CREDENTIALS: &str = "Invalid login name or password.";

/// Length of a freshly generated auth session token.
pub const AUTH_SESSION_TOKEN_LEN: usize = 40;

/// Result of [`AuthSessionManager::start_login`](super::AuthSessionManager::start_login).
#[derive(Debug)]
pub enum LoginOutcome {
    Success,
    /// The form carries the field errors to show the visitor.
    ValidationFailure(LoginForm),
}

#[derive(Debug, Default, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Login name cannot be blank."))]
    pub login_name: String,
    #[validate(length(min = 1, message = "Password cannot be blank."))]
    pub password: String,
    pub remember_me: bool,
    errors: BTreeMap<String, Vec<String>>,
}

impl LoginForm {
    pub fn new(login_name: &str, password: &str, remember_me: bool) -> Self {
        Self {
            login_name: login_name.to_string(),
            password: password.to_string(),
            remember_me,
            errors: BTreeMap::new(),
        }
    }

    /// Runs the field rules and records their errors on the form.
    ///
    /// # Returns
    /// - `true` - Every field is valid
    /// - `false` - At least one error was recorded
    pub fn validate_fields(&mut self) -> bool {
        if let Err(errors) = self.validate() {
            for (field, field_errors) in errors.field_errors() {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    self.add_error(&field, &message);
                }
            }
        }

        !self.has_errors()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Field errors keyed by field name.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn into_errors(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }
}

/// Checks `password` against an argon2 PHC hash.
///
/// A hash that cannot be parsed never matches.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!("Stored password hash could not be parsed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash checked in place of a real one when no user has the submitted login name.
///
/// Built with the same argon2 parameters as stored password hashes from a random password
/// that is discarded, so no input can match it.
static UNKNOWN_USER_PASSWORD_HASH: LazyLock<String> = LazyLock::new(|| {
    let password = generate_auth_session_token();
    let salt = SaltString::generate(&mut OsRng);

    match Argon2::default().hash_password(password.as_bytes(), &salt) {
        Ok(hash) => hash.to_string(),
        Err(e) => {
            tracing::error!("Failed to build the unknown user password hash: {}", e);
            String::new()
        }
    }
});

/// Placeholder hash for [`verify_password`] when the login name matched no user.
pub fn unknown_user_password_hash() -> &'static str {
    &UNKNOWN_USER_PASSWORD_HASH
}

/// Generates a random alphanumeric auth session token.
pub fn generate_auth_session_token() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(AUTH_SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}
