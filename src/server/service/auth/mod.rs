//! Authentication session service layer.
//!
//! [`AuthSessionManager`] owns the login state of one client. It decides whether the session is
//! authenticated, gates every login on the user's auth session token, captures the return URL
//! when an anonymous visitor hits a protected resource and writes the signed remember-me cookie
//! that lets a visitor be logged back in once their session expired.

pub mod login;

#[cfg(test)]
mod tests;

use std::{path::Path, time::Duration};

use time::OffsetDateTime;

use crate::server::{
    config::{AuthConfig, MAX_REMEMBER_ME_DURATION},
    data::user::UserStore,
    error::{auth::AuthError, Error},
    model::{
        auth::{CurrentRequest, LoginRequired},
        cookie::{CookieTransport, IdentityCookie},
        identity::{auth_session_token, Identity, IdentityStates},
        session::{
            auth::SessionReturnUrl,
            store::SessionStore,
            user::{SessionIdentity, SessionUserId},
        },
    },
    service::{
        auth::login::{
            generate_auth_session_token, unknown_user_password_hash, verify_password, LoginForm,
            LoginOutcome, INVALID_CREDENTIALS,
        },
        cookie::IdentityCookieCodec,
        flash::FlashMessageStore,
    },
};

/// Login state of the client behind one request.
///
/// Built per request from the request's session and cookie jar. The manager never holds
/// state of its own; everything lives in the session so it survives across requests.
pub struct AuthSessionManager<'a> {
    session: &'a dyn SessionStore,
    users: &'a dyn UserStore,
    cookies: &'a dyn CookieTransport,
    codec: &'a IdentityCookieCodec,
    config: &'a AuthConfig,
}

impl<'a> AuthSessionManager<'a> {
    /// Creates a new instance of AuthSessionManager.
    ///
    /// # Arguments
    /// - `session` - Session of the current client
    /// - `users` - User record lookup and persistence
    /// - `cookies` - Cookie jar of the current request/response
    /// - `codec` - Remember-me cookie codec holding the process-wide secret
    /// - `config` - Authentication behavior
    pub fn new(
        session: &'a dyn SessionStore,
        users: &'a dyn UserStore,
        cookies: &'a dyn CookieTransport,
        codec: &'a IdentityCookieCodec,
        config: &'a AuthConfig,
    ) -> Self {
        Self {
            session,
            users,
            cookies,
            codec,
            config,
        }
    }

    /// Flash messages of the same session.
    pub fn flash(&self) -> FlashMessageStore<'a> {
        FlashMessageStore::new(self.session)
    }

    /// ID of the logged in user, `None` for guests.
    pub async fn id(&self) -> Result<Option<i32>, Error> {
        SessionUserId::get(self.session).await
    }

    pub async fn name(&self) -> Result<Option<String>, Error> {
        SessionIdentity::get_name(self.session).await
    }

    /// Identity states stored at login, empty for guests.
    pub async fn states(&self) -> Result<IdentityStates, Error> {
        SessionIdentity::get_states(self.session).await
    }

    pub async fn is_guest(&self) -> Result<bool, Error> {
        Ok(self.id().await?.is_none())
    }

    pub async fn is_logged_in(&self) -> Result<bool, Error> {
        Ok(!self.is_guest().await?)
    }

    /// User record of the logged in user.
    ///
    /// # Returns
    /// - `Ok(Some(Model))` - Session is authenticated and the user exists
    /// - `Ok(None)` - Guest session, or the user no longer exists
    /// - `Err(Error)` - Session or database access failed
    pub async fn user(&self) -> Result<Option<entity::blocks_user::Model>, Error> {
        match self.id().await? {
            Some(user_id) => Ok(self.users.get_by_id(user_id).await?),
            None => Ok(None),
        }
    }

    /// Handles an anonymous request for a protected resource.
    ///
    /// Interactive requests with a non-empty path have their URL captured as the return URL.
    /// AJAX requests get the configured AJAX body when there is one. Everything else is sent
    /// to the login destination.
    ///
    /// # Returns
    /// - `Ok(LoginRequired::AjaxResponse)` - AJAX request and an AJAX body is configured
    /// - `Ok(LoginRequired::Redirect)` - Redirect to the resolved login URL
    /// - `Err(Error::AuthError(AuthError::LoginRequired))` - No login destination configured
    pub async fn login_required(&self, request: &CurrentRequest) -> Result<LoginRequired, Error> {
        if !request.ajax {
            if !request.path.is_empty() {
                self.set_return_url(&request.url).await?;
            }
        } else if let Some(body) = &self.config.login_required_ajax_response {
            return Ok(LoginRequired::AjaxResponse(body.clone()));
        }

        match &self.config.login_url {
            Some(login_url) => Ok(LoginRequired::Redirect(
                login_url.resolve(&self.config.default_controller),
            )),
            None => Err(AuthError::LoginRequired.into()),
        }
    }

    /// Stores the URL to return to after login.
    ///
    /// A leading path segment equal to the front controller's file name is stripped together
    /// with the surrounding slashes, so `/index.php/admin/settings` is stored as
    /// `admin/settings`.
    pub async fn set_return_url(&self, value: &str) -> Result<(), Error> {
        let value = strip_script_file_name(value, &self.config.script_file);

        SessionReturnUrl::insert(self.session, &value).await
    }

    /// Returns the stored return URL, else `default`, else the configured default.
    pub async fn get_return_url(&self, default: Option<&str>) -> Result<String, Error> {
        if let Some(url) = SessionReturnUrl::get(self.session).await? {
            return Ok(url);
        }

        Ok(default
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_return_url.clone()))
    }

    /// Decides whether an identity may be logged in.
    ///
    /// The identity must claim an auth session token and the user with `user_id` must exist
    /// with exactly that token on record. Every rejection looks the same to the caller.
    ///
    /// # Returns
    /// - `Ok(true)` - Token claim matches the user's token
    /// - `Ok(false)` - No claim, unknown user or token mismatch
    /// - `Err(Error)` - User lookup failed
    pub async fn before_login(
        &self,
        user_id: i32,
        states: &IdentityStates,
        from_cookie: bool,
    ) -> Result<bool, Error> {
        let Some(claim) = auth_session_token(states) else {
            tracing::debug!(
                user_id = %user_id,
                from_cookie,
                "Login rejected: identity carries no auth session token"
            );
            return Ok(false);
        };

        match self.users.get_by_id(user_id).await? {
            Some(user) if user.auth_session_token.as_deref() == Some(claim) => Ok(true),
            Some(_) => {
                tracing::warn!(
                    user_id = %user_id,
                    from_cookie,
                    "Login rejected: auth session token does not match the one on record"
                );
                Ok(false)
            }
            None => {
                tracing::warn!(
                    user_id = %user_id,
                    from_cookie,
                    "Login rejected: user not found"
                );
                Ok(false)
            }
        }
    }

    /// Records the login time on the user when the session is authenticated.
    pub async fn after_login(&self, from_cookie: bool) -> Result<(), Error> {
        let Some(mut user) = self.user().await? else {
            return Ok(());
        };

        user.last_login_date = Some(chrono::Utc::now().naive_utc());
        self.users.save(&user).await?;

        tracing::debug!(user_id = %user.id, from_cookie, "Updated last login date");

        Ok(())
    }

    /// Logs in `identity` after [`before_login`](Self::before_login) accepts it.
    ///
    /// The session ID is regenerated before the identity is stored. A non-zero `duration`
    /// writes a remember-me cookie with that lifetime when auto-login is allowed.
    ///
    /// # Returns
    /// - `Ok(true)` - Identity logged in
    /// - `Ok(false)` - Identity rejected, session left untouched
    /// - `Err(Error)` - Session, cookie or database operation failed
    pub async fn login(&self, identity: &Identity, duration: Duration) -> Result<bool, Error> {
        if !self
            .before_login(identity.id, &identity.states, false)
            .await?
        {
            return Ok(false);
        }

        self.change_identity(identity).await?;

        if !duration.is_zero() {
            if self.config.allow_auto_login {
                self.save_to_cookie(duration).await?;
            } else {
                tracing::debug!("Remember-me requested while auto-login is disabled");
            }
        }

        self.after_login(false).await?;

        tracing::info!(user_id = %identity.id, "User logged in");

        Ok(true)
    }

    /// Logs the client out.
    ///
    /// The remember-me cookie is always removed. With `destroy_session` the whole session is
    /// cleared, otherwise only the identity entries are removed and flash messages survive.
    pub async fn logout(&self, destroy_session: bool) -> Result<(), Error> {
        let user_id = self.id().await?;

        self.cookies.remove(&self.config.identity_cookie_name);

        if destroy_session {
            self.session.clear().await?;
        } else {
            SessionIdentity::remove(self.session).await?;
        }

        if let Some(user_id) = user_id {
            tracing::info!(user_id = %user_id, "User logged out");
        }

        Ok(())
    }

    /// Writes the remember-me cookie for the logged in identity.
    ///
    /// The only place the identity cookie is written. Guests get no cookie. `duration` is
    /// capped at [`MAX_REMEMBER_ME_DURATION`], which also bounds lifetimes carried over from
    /// a renewed cookie.
    pub async fn save_to_cookie(&self, duration: Duration) -> Result<(), Error> {
        let Some(user_id) = self.id().await? else {
            return Ok(());
        };
        let name = self.name().await?.unwrap_or_default();
        let states = self.states().await?;

        let duration = duration.min(MAX_REMEMBER_ME_DURATION);
        let value = self
            .codec
            .encode(user_id, &name, duration.as_secs(), &states)?;

        let expires = time::Duration::try_from(duration)
            .ok()
            .and_then(|lifetime| OffsetDateTime::now_utc().checked_add(lifetime));

        self.cookies.set(IdentityCookie {
            name: self.config.identity_cookie_name.clone(),
            value,
            expires,
            http_only: true,
            secure: self.config.secure_cookie,
        });

        Ok(())
    }

    /// Logs in from the remember-me cookie.
    ///
    /// A missing cookie, a cookie that fails validation and an identity rejected by
    /// [`before_login`](Self::before_login) all leave the session anonymous.
    ///
    /// # Returns
    /// - `Ok(true)` - Identity from the cookie logged in
    /// - `Ok(false)` - No usable cookie
    /// - `Err(Error)` - Session, cookie or database operation failed
    pub async fn restore_from_cookie(&self) -> Result<bool, Error> {
        let Some(raw) = self.cookies.get(&self.config.identity_cookie_name) else {
            return Ok(false);
        };

        let payload = match self.codec.decode(&raw) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Ignoring identity cookie: {}", e);
                return Ok(false);
            }
        };

        if !self
            .before_login(payload.id, &payload.states, true)
            .await?
        {
            return Ok(false);
        }

        let identity = Identity {
            id: payload.id,
            name: payload.name,
            states: payload.states,
        };
        self.change_identity(&identity).await?;

        if self.config.auto_renew_cookie {
            self.save_to_cookie(Duration::from_secs(payload.duration))
                .await?;
        }

        self.after_login(true).await?;

        tracing::info!(user_id = %identity.id, "User logged in from identity cookie");

        Ok(true)
    }

    /// Tries the remember-me cookie when the session is anonymous and auto-login is allowed.
    ///
    /// # Returns
    /// - `Ok(true)` - Session is authenticated afterwards
    /// - `Ok(false)` - Session is still anonymous
    pub async fn ensure_identity(&self) -> Result<bool, Error> {
        if self.is_logged_in().await? {
            return Ok(true);
        }

        if !self.config.allow_auto_login {
            return Ok(false);
        }

        self.restore_from_cookie().await
    }

    /// Checks that an authenticated session still matches its user's auth session token.
    ///
    /// A session whose token claim no longer matches, or whose user is gone, is logged out
    /// without destroying the session.
    ///
    /// # Returns
    /// - `Ok(true)` - Session is authenticated and valid
    /// - `Ok(false)` - Session was anonymous or has just been logged out
    pub async fn revalidate(&self) -> Result<bool, Error> {
        let Some(user_id) = self.id().await? else {
            return Ok(false);
        };

        let states = self.states().await?;
        let claim = auth_session_token(&states);

        let valid = match self.users.get_by_id(user_id).await? {
            Some(user) => claim.is_some() && user.auth_session_token.as_deref() == claim,
            None => false,
        };

        if !valid {
            tracing::warn!(
                user_id = %user_id,
                "Session no longer matches the user's auth session token, logging out"
            );
            self.logout(false).await?;
        }

        Ok(valid)
    }

    /// Validates credentials and logs the user in.
    ///
    /// A successful credential check issues a new auth session token for the user, so
    /// sessions started earlier fail their next [`revalidate`](Self::revalidate).
    ///
    /// # Arguments
    /// - `login_name` - Username or email address
    /// - `password` - Plain text password
    /// - `remember_me` - Issue a remember-me cookie with the configured lifetime
    ///
    /// # Returns
    /// - `Ok(LoginOutcome::Success)` - User logged in
    /// - `Ok(LoginOutcome::ValidationFailure(form))` - Blank fields or invalid credentials
    /// - `Err(Error)` - Session or database operation failed
    pub async fn start_login(
        &self,
        login_name: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginOutcome, Error> {
        let mut form = LoginForm::new(login_name, password, remember_me);

        if !form.validate_fields() {
            return Ok(LoginOutcome::ValidationFailure(form));
        }

        // Unknown login names are checked against a placeholder hash so both failures cost
        // the same argon2 work
        let user = self.users.get_by_login_name(&form.login_name).await?;
        let password_hash = user
            .as_ref()
            .map_or(unknown_user_password_hash(), |user| user.password_hash.as_str());
        let password_matches = verify_password(&form.password, password_hash);

        let user = match user {
            Some(user) if password_matches => user,
            _ => {
                form.add_error("password", INVALID_CREDENTIALS);
                return Ok(LoginOutcome::ValidationFailure(form));
            }
        };

        let token = generate_auth_session_token();
        let mut user = user;
        user.auth_session_token = Some(token.clone());
        let user = self.users.save(&user).await?;

        let identity = Identity::with_auth_session_token(user.id, user.username, &token);
        let duration = if form.remember_me {
            self.config.remember_me_duration
        } else {
            Duration::ZERO
        };

        if !self.login(&identity, duration).await? {
            form.add_error("password", INVALID_CREDENTIALS);
            return Ok(LoginOutcome::ValidationFailure(form));
        }

        Ok(LoginOutcome::Success)
    }

    /// Switches the session to `identity` under a fresh session ID.
    async fn change_identity(&self, identity: &Identity) -> Result<(), Error> {
        self.session.regenerate_id().await?;
        SessionIdentity::insert(self.session, identity).await
    }
}

/// Strips a leading front controller file name from a return URL.
fn strip_script_file_name(value: &str, script_file: &str) -> String {
    let Some(script_name) = Path::new(script_file)
        .file_name()
        .and_then(|name| name.to_str())
    else {
        return value.to_string();
    };

    let trimmed = value.trim_matches('/');

    match trimmed.strip_prefix(script_name) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            rest.trim_matches('/').to_string()
        }
        _ => value.to_string(),
    }
}
