//! Authentication session data models.
//!
//! This module provides a type-safe wrapper for the URL a visitor was trying to reach when they
//! were asked to log in. The URL is captured when a protected resource rejects an anonymous
//! request and read back once the login succeeds so the visitor lands where they started.

use serde::{Deserialize, Serialize};

use crate::server::{error::Error, model::session::store::SessionStore};

/// Session key for storing the return URL.
///
/// The key is namespaced under "blocks:auth:" to avoid collisions with other session data.
pub const SESSION_AUTH_RETURN_URL_KEY: &str = "blocks:auth:return_url";

/// Session wrapper for the return URL.
#[derive(Default, Deserialize, Serialize, Debug, PartialEq)]
pub struct SessionReturnUrl(pub String);

impl SessionReturnUrl {
    /// Inserts the return URL into the session, replacing any previous one.
    ///
    /// The value is stored as given; sanitizing it is the caller's job.
    ///
    /// # Arguments
    /// - `session` - User's session for storing the URL
    /// - `url` - URL to return to after login
    ///
    /// # Returns
    /// - `Ok(())` - URL successfully stored in session
    /// - `Err(Error)` - Session storage failed
    pub async fn insert(session: &dyn SessionStore, url: &str) -> Result<(), Error> {
        session
            .set(
                SESSION_AUTH_RETURN_URL_KEY,
                &SessionReturnUrl(url.to_string()),
                None,
            )
            .await
    }

    /// Retrieves the return URL from the session without removing it.
    ///
    /// # Returns
    /// - `Ok(Some(String))` - Return URL present
    /// - `Ok(None)` - No return URL was captured
    /// - `Err(Error)` - Session retrieval failed
    pub async fn get(session: &dyn SessionStore) -> Result<Option<String>, Error> {
        Ok(session
            .get::<SessionReturnUrl>(SESSION_AUTH_RETURN_URL_KEY)
            .await?
            .map(|SessionReturnUrl(url)| url))
    }
}
