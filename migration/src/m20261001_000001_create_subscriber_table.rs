use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriber::Table)
                    .if_not_exists()
                    .col(pk_auto(Subscriber::Id))
                    .col(big_integer_uniq(Subscriber::TelegramId))
                    .col(string(Subscriber::Mode).default("total"))
                    .col(integer(Subscriber::Threshold).default(0))
                    .col(
                        timestamp(Subscriber::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriber::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Subscriber {
    Table,
    Id,
    TelegramId,
    Mode,
    Threshold,
    CreatedAt,
}
