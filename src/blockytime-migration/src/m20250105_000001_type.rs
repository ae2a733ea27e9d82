use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlockType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlockType::Uid)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BlockType::CategoryUid)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(BlockType::Name).text().not_null().default(""))
                    .col(ColumnDef::new(BlockType::Color).big_integer().null())
                    .col(ColumnDef::new(BlockType::Hidden).boolean().null())
                    .col(ColumnDef::new(BlockType::Priority).integer().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlockType::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BlockType {
    #[iden = "Type"]
    Table,
    Uid,
    CategoryUid,
    Name,
    Color,
    Hidden,
    Priority,
}
