pub use sea_orm_migration::prelude::*;

pub mod m20250105_000001_type;
pub mod m20250105_000002_block;
mod m20250112_000001_block_date_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250105_000001_type::Migration),
            Box::new(m20250105_000002_block::Migration),
            Box::new(m20250112_000001_block_date_index::Migration),
        ]
    }
}
