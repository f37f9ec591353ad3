//! Factory for monitored guild rows.

use crate::factory::helpers::next_id;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating a subscriber's monitored guild with a baseline.
pub struct SubscriberGuildFactory<'a> {
    db: &'a DatabaseConnection,
    subscriber_id: i32,
    guild_id: String,
    baseline: i32,
}

impl<'a> SubscriberGuildFactory<'a> {
    /// Creates a new SubscriberGuildFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: auto-incremented unique id
    /// - baseline: `0`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `subscriber_id` - Owning subscriber's internal id
    pub fn new(db: &'a DatabaseConnection, subscriber_id: i32) -> Self {
        Self {
            db,
            subscriber_id,
            guild_id: next_id().to_string(),
            baseline: 0,
        }
    }

    pub fn guild_id(mut self, guild_id: u64) -> Self {
        self.guild_id = guild_id.to_string();
        self
    }

    /// Sets the raw stored guild id, allowing malformed values.
    pub fn raw_guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn baseline(mut self, baseline: i32) -> Self {
        self.baseline = baseline;
        self
    }

    /// Builds and inserts the monitored guild row.
    pub async fn build(self) -> Result<entity::subscriber_guild::Model, DbErr> {
        entity::subscriber_guild::ActiveModel {
            subscriber_id: ActiveValue::Set(self.subscriber_id),
            guild_id: ActiveValue::Set(self.guild_id),
            baseline_count: ActiveValue::Set(self.baseline),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a monitored guild row for a subscriber with baseline `0`.
pub async fn create_subscriber_guild(
    db: &DatabaseConnection,
    subscriber_id: i32,
    guild_id: u64,
) -> Result<entity::subscriber_guild::Model, DbErr> {
    SubscriberGuildFactory::new(db, subscriber_id)
        .guild_id(guild_id)
        .build()
        .await
}
