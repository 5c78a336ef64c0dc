//! Schema migrations, run at start-up and by the test harness.

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateTodoTable)]
    }
}

pub struct CreateTodoTable;

impl MigrationName for CreateTodoTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_todo_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateTodoTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Todos::Table)
            .if_not_exists()
            .col(ColumnDef::new(Todos::Id).integer().not_null().primary_key())
            .col(ColumnDef::new(Todos::Title).string().not_null())
            .col(ColumnDef::new(Todos::Description).string_len(1200).null())
            .col(
                ColumnDef::new(Todos::Completed)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(Todos::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Todos::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_todos_completed")
                    .table(Todos::Table)
                    .col(Todos::Completed)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Todos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Todos {
    Table,
    Id,
    Title,
    Description,
    Completed,
    CreatedAt,
    UpdatedAt,
}
