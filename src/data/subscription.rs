use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::collections::HashMap;

use crate::model::subscription::{AggregationMode, Subscription};

/// Settings store for subscriber configuration and occupancy baselines.
///
/// Configuration writes (mode, threshold, guilds, channels) come from the command
/// surface; baseline writes come only from the occupancy evaluator.
pub struct SubscriptionRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SubscriptionRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the subscription of a Telegram user.
    ///
    /// # Arguments
    /// - `telegram_id` - Telegram chat id of the subscriber
    ///
    /// # Returns
    /// - `Ok(Some(Subscription))` - Fully populated subscription
    /// - `Ok(None)` - The user never subscribed
    /// - `Err(DbErr)` - Database error or unparsable stored id
    pub async fn find_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> Result<Option<Subscription>, DbErr> {
        let Some(subscriber) = entity::prelude::Subscriber::find()
            .filter(entity::subscriber::Column::TelegramId.eq(telegram_id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.assemble(vec![subscriber]).await?.pop())
    }

    /// Returns the subscription of a Telegram user, creating a default one first
    /// if none exists.
    ///
    /// New subscriptions use mode `total`, threshold `0` and monitor no guilds.
    ///
    /// # Arguments
    /// - `telegram_id` - Telegram chat id of the subscriber
    ///
    /// # Returns
    /// - `Ok(Subscription)` - Existing or newly created subscription
    /// - `Err(DbErr)` - Database error
    pub async fn get_or_create(&self, telegram_id: i64) -> Result<Subscription, DbErr> {
        if let Some(subscription) = self.find_by_telegram_id(telegram_id).await? {
            return Ok(subscription);
        }

        let subscriber = entity::subscriber::ActiveModel {
            telegram_id: ActiveValue::Set(telegram_id),
            mode: ActiveValue::Set(AggregationMode::default().as_str().to_string()),
            threshold: ActiveValue::Set(0),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Subscription::from_entities(subscriber, Vec::new(), Vec::new())
    }

    /// Lists the Telegram ids of every subscriber, oldest first.
    pub async fn list_telegram_ids(&self) -> Result<Vec<i64>, DbErr> {
        entity::prelude::Subscriber::find()
            .select_only()
            .column(entity::subscriber::Column::TelegramId)
            .order_by_asc(entity::subscriber::Column::Id)
            .into_tuple::<i64>()
            .all(self.db)
            .await
    }

    /// Finds every subscription monitoring a guild.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(Vec<Subscription>)` - Subscriptions ordered by subscriber id
    /// - `Err(DbErr)` - Database error or unparsable stored id
    pub async fn find_by_guild(&self, guild_id: u64) -> Result<Vec<Subscription>, DbErr> {
        let subscriber_ids: Vec<i32> = entity::prelude::SubscriberGuild::find()
            .select_only()
            .column(entity::subscriber_guild::Column::SubscriberId)
            .filter(entity::subscriber_guild::Column::GuildId.eq(guild_id.to_string()))
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        if subscriber_ids.is_empty() {
            return Ok(Vec::new());
        }

        let subscribers = entity::prelude::Subscriber::find()
            .filter(entity::subscriber::Column::Id.is_in(subscriber_ids))
            .order_by_asc(entity::subscriber::Column::Id)
            .all(self.db)
            .await?;

        self.assemble(subscribers).await
    }

    /// Reads the last evaluated count for a subscriber and guild, `0` if none.
    pub async fn get_baseline(&self, subscriber_id: i32, guild_id: u64) -> Result<u32, DbErr> {
        let row = self.find_guild_row(subscriber_id, guild_id).await?;

        Ok(row.map(|r| r.baseline_count.max(0) as u32).unwrap_or(0))
    }

    /// Records the last evaluated counts of one guild in a single transaction.
    ///
    /// Either every baseline in `baselines` is written or none is. Pairs whose
    /// subscriber does not monitor the guild are skipped.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `baselines` - (subscriber id, count) pairs
    ///
    /// # Returns
    /// - `Ok(())` - All baselines written
    /// - `Err(DbErr)` - Database error; the transaction was rolled back
    pub async fn set_baselines(
        &self,
        guild_id: u64,
        baselines: &[(i32, u32)],
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        for &(subscriber_id, count) in baselines {
            entity::prelude::SubscriberGuild::update_many()
                .col_expr(
                    entity::subscriber_guild::Column::BaselineCount,
                    Expr::value(count as i32),
                )
                .filter(entity::subscriber_guild::Column::SubscriberId.eq(subscriber_id))
                .filter(entity::subscriber_guild::Column::GuildId.eq(guild_id.to_string()))
                .exec(&txn)
                .await?;
        }

        txn.commit().await
    }

    /// Resets every subscriber's baseline for a guild to `0`.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of subscriber baselines reset
    /// - `Err(DbErr)` - Database error
    pub async fn reset_baselines(&self, guild_id: u64) -> Result<u64, DbErr> {
        let result = entity::prelude::SubscriberGuild::update_many()
            .col_expr(entity::subscriber_guild::Column::BaselineCount, Expr::value(0))
            .filter(entity::subscriber_guild::Column::GuildId.eq(guild_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn set_threshold(&self, subscriber_id: i32, threshold: u32) -> Result<(), DbErr> {
        entity::prelude::Subscriber::update_many()
            .col_expr(
                entity::subscriber::Column::Threshold,
                Expr::value(threshold.min(i32::MAX as u32) as i32),
            )
            .filter(entity::subscriber::Column::Id.eq(subscriber_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    pub async fn set_mode(&self, subscriber_id: i32, mode: AggregationMode) -> Result<(), DbErr> {
        entity::prelude::Subscriber::update_many()
            .col_expr(entity::subscriber::Column::Mode, Expr::value(mode.as_str()))
            .filter(entity::subscriber::Column::Id.eq(subscriber_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Starts monitoring a guild with a baseline of `0`.
    ///
    /// # Returns
    /// - `Ok(true)` - Guild added
    /// - `Ok(false)` - Guild was already monitored
    /// - `Err(DbErr)` - Database error
    pub async fn add_guild(&self, subscriber_id: i32, guild_id: u64) -> Result<bool, DbErr> {
        if self.find_guild_row(subscriber_id, guild_id).await?.is_some() {
            return Ok(false);
        }

        entity::subscriber_guild::ActiveModel {
            subscriber_id: ActiveValue::Set(subscriber_id),
            guild_id: ActiveValue::Set(guild_id.to_string()),
            baseline_count: ActiveValue::Set(0),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(true)
    }

    /// Stops monitoring a guild, dropping its baseline and channel allowlist.
    ///
    /// # Returns
    /// - `Ok(true)` - Guild removed
    /// - `Ok(false)` - Guild was not monitored
    /// - `Err(DbErr)` - Database error
    pub async fn remove_guild(&self, subscriber_id: i32, guild_id: u64) -> Result<bool, DbErr> {
        entity::prelude::SubscriberChannel::delete_many()
            .filter(entity::subscriber_channel::Column::SubscriberId.eq(subscriber_id))
            .filter(entity::subscriber_channel::Column::GuildId.eq(guild_id.to_string()))
            .exec(self.db)
            .await?;

        let result = entity::prelude::SubscriberGuild::delete_many()
            .filter(entity::subscriber_guild::Column::SubscriberId.eq(subscriber_id))
            .filter(entity::subscriber_guild::Column::GuildId.eq(guild_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Adds a channel to the subscriber's allowlist for a guild.
    ///
    /// # Returns
    /// - `Ok(true)` - Channel added
    /// - `Ok(false)` - Channel was already allowlisted
    /// - `Err(DbErr)` - Database error
    pub async fn add_channel(
        &self,
        subscriber_id: i32,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<bool, DbErr> {
        let existing = entity::prelude::SubscriberChannel::find()
            .filter(entity::subscriber_channel::Column::SubscriberId.eq(subscriber_id))
            .filter(entity::subscriber_channel::Column::ChannelId.eq(channel_id.to_string()))
            .count(self.db)
            .await?;

        if existing > 0 {
            return Ok(false);
        }

        entity::subscriber_channel::ActiveModel {
            subscriber_id: ActiveValue::Set(subscriber_id),
            guild_id: ActiveValue::Set(guild_id.to_string()),
            channel_id: ActiveValue::Set(channel_id.to_string()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(true)
    }

    /// Removes a channel from the subscriber's allowlist for a guild.
    ///
    /// # Returns
    /// - `Ok(true)` - Channel removed
    /// - `Ok(false)` - Channel was not allowlisted for that guild
    /// - `Err(DbErr)` - Database error
    pub async fn remove_channel(
        &self,
        subscriber_id: i32,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::SubscriberChannel::delete_many()
            .filter(entity::subscriber_channel::Column::SubscriberId.eq(subscriber_id))
            .filter(entity::subscriber_channel::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::subscriber_channel::Column::ChannelId.eq(channel_id.to_string()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn find_guild_row(
        &self,
        subscriber_id: i32,
        guild_id: u64,
    ) -> Result<Option<entity::subscriber_guild::Model>, DbErr> {
        entity::prelude::SubscriberGuild::find()
            .filter(entity::subscriber_guild::Column::SubscriberId.eq(subscriber_id))
            .filter(entity::subscriber_guild::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await
    }

    /// Loads guild and channel rows for the given subscribers and converts them
    /// to subscriptions, preserving the order of `subscribers`.
    async fn assemble(
        &self,
        subscribers: Vec<entity::subscriber::Model>,
    ) -> Result<Vec<Subscription>, DbErr> {
        let ids: Vec<i32> = subscribers.iter().map(|s| s.id).collect();

        let mut guilds: HashMap<i32, Vec<entity::subscriber_guild::Model>> = HashMap::new();
        for row in entity::prelude::SubscriberGuild::find()
            .filter(entity::subscriber_guild::Column::SubscriberId.is_in(ids.clone()))
            .all(self.db)
            .await?
        {
            guilds.entry(row.subscriber_id).or_default().push(row);
        }

        let mut channels: HashMap<i32, Vec<entity::subscriber_channel::Model>> = HashMap::new();
        for row in entity::prelude::SubscriberChannel::find()
            .filter(entity::subscriber_channel::Column::SubscriberId.is_in(ids))
            .all(self.db)
            .await?
        {
            channels.entry(row.subscriber_id).or_default().push(row);
        }

        subscribers
            .into_iter()
            .map(|subscriber| {
                let id = subscriber.id;
                Subscription::from_entities(
                    subscriber,
                    guilds.remove(&id).unwrap_or_default(),
                    channels.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}
