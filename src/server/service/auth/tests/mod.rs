
use blocks_auth_test_utils::prelude::*;

use crate::server::{
    config::AuthConfig,
    data::user::UserStore,
    error::Error,
    service::{auth::AuthSessionManager, cookie::IdentityCookieCodec},
};

/// Session, cookie jar and configuration shared by one test's managers.
struct Harness {
    test: TestContext,
    codec: IdentityCookieCodec,
    config: AuthConfig,
}

impl Harness {
    async fn new(builder: TestBuilder) -> Result<Self, Error> {
        Ok(Self {
            test: builder.build().await?,
            codec: IdentityCookieCodec::new(TEST_COOKIE_SECRET.as_bytes()),
            config: AuthConfig::default(),
        })
    }

    fn configure(mut self, f: impl FnOnce(&mut AuthConfig)) -> Self {
        f(&mut self.config);
        self
    }

    fn manager<'a>(&'a self, users: &'a dyn UserStore) -> AuthSessionManager<'a> {
        AuthSessionManager::new(
            &self.test.session,
            users,
            &self.test.cookies,
            &self.codec,
            &self.config,
        )
    }

    /// Value of the remember-me cookie currently in the jar.
    fn identity_cookie(&self) -> Option<String> {
        self.test
            .cookies
            .get(&self.config.identity_cookie_name)
            .map(|cookie| cookie.value().to_string())
    }
}
