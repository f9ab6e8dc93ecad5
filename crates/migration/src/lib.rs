pub use sea_orm_migration::prelude::*;

mod m20240101_000000_init;
mod m20240115_000000_open_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000000_init::Migration),
            Box::new(m20240115_000000_open_indexes::Migration),
        ]
    }
}
