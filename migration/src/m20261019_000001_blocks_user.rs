use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlocksUser::Table)
                    .if_not_exists()
                    .col(pk_auto(BlocksUser::Id))
                    .col(string_uniq(BlocksUser::Username))
                    .col(string_uniq(BlocksUser::Email))
                    .col(string(BlocksUser::PasswordHash))
                    .col(string_null(BlocksUser::AuthSessionToken))
                    .col(timestamp_null(BlocksUser::LastLoginDate))
                    .col(timestamp(BlocksUser::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlocksUser::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum BlocksUser {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    AuthSessionToken,
    LastLoginDate,
    CreatedAt,
}
