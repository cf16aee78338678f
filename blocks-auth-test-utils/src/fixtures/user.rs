use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, IntoActiveModel};

use crate::{constant::TEST_PASSWORD, error::TestError, TestContext};

impl TestContext {
    pub fn user<'a>(&'a self) -> UserFixtures<'a> {
        UserFixtures { setup: self }
    }
}

pub struct UserFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> UserFixtures<'a> {
    /// Inserts a user whose password is [`TEST_PASSWORD`].
    pub async fn insert_user(
        &self,
        username: &str,
        email: &str,
    ) -> Result<entity::blocks_user::Model, TestError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(TEST_PASSWORD.as_bytes(), &salt)
            .map_err(|e| TestError::PasswordHash(e.to_string()))?
            .to_string();

        Ok(
            entity::prelude::BlocksUser::insert(entity::blocks_user::ActiveModel {
                username: ActiveValue::Set(username.to_string()),
                email: ActiveValue::Set(email.to_string()),
                password_hash: ActiveValue::Set(password_hash),
                auth_session_token: ActiveValue::Set(None),
                last_login_date: ActiveValue::Set(None),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Sets the session token stored on the user record.
    pub async fn set_auth_session_token(
        &self,
        user: entity::blocks_user::Model,
        token: Option<&str>,
    ) -> Result<entity::blocks_user::Model, TestError> {
        let mut active = user.into_active_model();
        active.auth_session_token = ActiveValue::Set(token.map(str::to_string));

        Ok(active.update(&self.setup.db).await?)
    }
}
