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
                    .table(SubscriberChannel::Table)
                    .if_not_exists()
                    .col(pk_auto(SubscriberChannel::Id))
                    .col(integer(SubscriberChannel::SubscriberId))
                    .col(string(SubscriberChannel::GuildId))
                    .col(string(SubscriberChannel::ChannelId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriber_channel_subscriber_id")
                            .from(SubscriberChannel::Table, SubscriberChannel::SubscriberId)
                            .to(Subscriber::Table, Subscriber::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .unique()
                            .name("idx_subscriber_channel_unique")
                            .col(SubscriberChannel::SubscriberId)
                            .col(SubscriberChannel::ChannelId),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubscriberChannel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SubscriberChannel {
    Table,
    Id,
    SubscriberId,
    GuildId,
    ChannelId,
}
