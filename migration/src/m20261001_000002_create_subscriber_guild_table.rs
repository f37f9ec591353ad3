use sea_orm_migration::{prelude::*, schema::*};

use super::m20261001_000001_create_subscriber_table::Subscriber;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriberGuild::Table)
                    .if_not_exists()
                    .col(pk_auto(SubscriberGuild::Id))
                    .col(integer(SubscriberGuild::SubscriberId))
                    .col(string(SubscriberGuild::GuildId))
                    .col(integer(SubscriberGuild::BaselineCount).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriber_guild_subscriber_id")
                            .from(SubscriberGuild::Table, SubscriberGuild::SubscriberId)
                            .to(Subscriber::Table, Subscriber::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .unique()
                            .name("idx_subscriber_guild_unique")
                            .col(SubscriberGuild::SubscriberId)
                            .col(SubscriberGuild::GuildId),
                    )
                    .to_owned(),
            )
            .await?;

        // Every voice event looks up subscribers by guild
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriber_guild_guild_id")
                    .table(SubscriberGuild::Table)
                    .col(SubscriberGuild::GuildId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubscriberGuild::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SubscriberGuild {
    Table,
    Id,
    SubscriberId,
    GuildId,
    BaselineCount,
}
