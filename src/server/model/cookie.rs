//! Cookie transport capability.
//!
//! The remember-me cookie is read and written through [`CookieTransport`] so the session
//! manager does not depend on how cookies reach the response. The implementation for
//! [`Cookies`] is the one installed by the tower-sessions session layer.

use time::OffsetDateTime;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

/// A cookie ready to be handed to the transport.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityCookie {
    pub name: String,
    pub value: String,
    /// `None` means a browser-session cookie.
    pub expires: Option<OffsetDateTime>,
    pub http_only: bool,
    pub secure: bool,
}

/// Reads and writes named cookies on the current request/response.
pub trait CookieTransport: Send + Sync {
    /// Value of the cookie named `name` sent with the request.
    fn get(&self, name: &str) -> Option<String>;

    /// Adds or replaces a cookie on the response.
    fn set(&self, cookie: IdentityCookie);

    /// Instructs the client to drop the cookie named `name`.
    fn remove(&self, name: &str);
}

impl CookieTransport for Cookies {
    fn get(&self, name: &str) -> Option<String> {
        Cookies::get(self, name).map(|cookie| cookie.value().to_string())
    }

    fn set(&self, cookie: IdentityCookie) {
        let mut builder = Cookie::build((cookie.name, cookie.value))
            .path("/")
            .http_only(cookie.http_only)
            .secure(cookie.secure)
            .same_site(SameSite::Lax);

        if let Some(expires) = cookie.expires {
            builder = builder.expires(expires);
        }

        self.add(builder.build());
    }

    fn remove(&self, name: &str) {
        Cookies::remove(self, Cookie::build((name.to_string(), "")).path("/").build());
    }
}
