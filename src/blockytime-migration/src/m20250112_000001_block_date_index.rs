use sea_orm_migration::prelude::*;

use crate::m20250105_000002_block::Block;

const INDEX_NAME: &str = "idx_block_date";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(INDEX_NAME)
                    .table(Block::Table)
                    .col(Block::Date)
                    .col(Block::TypeUid)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEX_NAME).table(Block::Table).to_owned())
            .await
    }
}
