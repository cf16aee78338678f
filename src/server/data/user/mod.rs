use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter,
};

/// User records needed to authenticate a session.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by primary key.
    async fn get_by_id(&self, user_id: i32) -> Result<Option<entity::blocks_user::Model>, DbErr>;

    /// Finds a user whose username or email equals `login_name`.
    async fn get_by_login_name(
        &self,
        login_name: &str,
    ) -> Result<Option<entity::blocks_user::Model>, DbErr>;

    /// Persists the mutable fields of `user`: auth session token and last login date.
    async fn save(
        &self,
        user: &entity::blocks_user::Model,
    ) -> Result<entity::blocks_user::Model, DbErr>;
}

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait + Sync> UserStore for UserRepository<'a, C> {
    async fn get_by_id(&self, user_id: i32) -> Result<Option<entity::blocks_user::Model>, DbErr> {
        entity::prelude::BlocksUser::find_by_id(user_id)
            .one(self.db)
            .await
    }

    async fn get_by_login_name(
        &self,
        login_name: &str,
    ) -> Result<Option<entity::blocks_user::Model>, DbErr> {
        entity::prelude::BlocksUser::find()
            .filter(
                Condition::any()
                    .add(entity::blocks_user::Column::Username.eq(login_name))
                    .add(entity::blocks_user::Column::Email.eq(login_name)),
            )
            .one(self.db)
            .await
    }

    async fn save(
        &self,
        user: &entity::blocks_user::Model,
    ) -> Result<entity::blocks_user::Model, DbErr> {
        let mut user_am = user.clone().into_active_model();
        user_am.auth_session_token = ActiveValue::Set(user.auth_session_token.clone());
        user_am.last_login_date = ActiveValue::Set(user.last_login_date);

        user_am.update(self.db).await
    }
}
