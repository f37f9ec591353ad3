use sea_orm::entity::prelude::*;

/// A Telegram user who configured voice occupancy alerts.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subscriber")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Telegram chat id notifications are delivered to.
    #[sea_orm(unique)]
    pub telegram_id: i64,
    /// Aggregation mode, `total` or `max_channel`.
    pub mode: String,
    pub threshold: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subscriber_guild::Entity")]
    SubscriberGuild,
    #[sea_orm(has_many = "super::subscriber_channel::Entity")]
    SubscriberChannel,
}

impl Related<super::subscriber_guild::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubscriberGuild.def()
    }
}

impl Related<super::subscriber_channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubscriberChannel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
