//! Indexes used to read the open projects and donations in creation order,
//! plus the donor lookup for `/donation/my`.

use sea_orm_migration::prelude::*;

use super::m20240101_000000_init::{CharityProjects, Donations};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx-charity_projects-is_closed-created_at")
                    .table(CharityProjects::Table)
                    .col(CharityProjects::IsClosed)
                    .col(CharityProjects::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-is_closed-created_at")
                    .table(Donations::Table)
                    .col(Donations::IsClosed)
                    .col(Donations::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-user_id")
                    .table(Donations::Table)
                    .col(Donations::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx-donations-user_id")
                    .table(Donations::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx-donations-is_closed-created_at")
                    .table(Donations::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx-charity_projects-is_closed-created_at")
                    .table(CharityProjects::Table)
                    .to_owned(),
            )
            .await
    }
}
