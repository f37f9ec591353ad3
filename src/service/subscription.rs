use sea_orm::DatabaseConnection;

use crate::{
    data::SubscriptionRepository,
    error::AppError,
    model::subscription::{AggregationMode, Subscription},
};

/// Result of editing a channel allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEdit {
    Changed,
    Unchanged,
    /// The channel's guild is not monitored by the subscriber.
    GuildNotMonitored,
}

/// Configuration mutations issued by subscriber commands.
///
/// Every operation works on the caller's subscription, creating a default one
/// first if needed. Only subscription fields are written here; baselines are
/// left to the occupancy evaluator.
pub struct SubscriptionService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the subscriber's subscription, creating the default one if absent.
    pub async fn get_or_create(&self, telegram_id: i64) -> Result<Subscription, AppError> {
        Ok(SubscriptionRepository::new(self.db)
            .get_or_create(telegram_id)
            .await?)
    }

    /// Starts monitoring a guild.
    ///
    /// # Returns
    /// - `Ok(true)` - Guild added with a fresh baseline
    /// - `Ok(false)` - Guild was already monitored
    /// - `Err(AppError)` - Database error
    pub async fn add_guild(&self, telegram_id: i64, guild_id: u64) -> Result<bool, AppError> {
        let repo = SubscriptionRepository::new(self.db);
        let subscription = repo.get_or_create(telegram_id).await?;

        Ok(repo.add_guild(subscription.id, guild_id).await?)
    }

    /// Stops monitoring a guild and forgets its allowlist.
    pub async fn remove_guild(&self, telegram_id: i64, guild_id: u64) -> Result<bool, AppError> {
        let repo = SubscriptionRepository::new(self.db);
        let subscription = repo.get_or_create(telegram_id).await?;

        Ok(repo.remove_guild(subscription.id, guild_id).await?)
    }

    pub async fn set_threshold(&self, telegram_id: i64, threshold: u32) -> Result<(), AppError> {
        let repo = SubscriptionRepository::new(self.db);
        let subscription = repo.get_or_create(telegram_id).await?;

        Ok(repo.set_threshold(subscription.id, threshold).await?)
    }

    pub async fn set_mode(&self, telegram_id: i64, mode: AggregationMode) -> Result<(), AppError> {
        let repo = SubscriptionRepository::new(self.db);
        let subscription = repo.get_or_create(telegram_id).await?;

        Ok(repo.set_mode(subscription.id, mode).await?)
    }

    /// Adds a voice channel to the allowlist of a monitored guild.
    pub async fn add_channel(
        &self,
        telegram_id: i64,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<ChannelEdit, AppError> {
        let repo = SubscriptionRepository::new(self.db);
        let subscription = repo.get_or_create(telegram_id).await?;

        if !subscription.monitors(guild_id) {
            return Ok(ChannelEdit::GuildNotMonitored);
        }

        Ok(
            match repo.add_channel(subscription.id, guild_id, channel_id).await? {
                true => ChannelEdit::Changed,
                false => ChannelEdit::Unchanged,
            },
        )
    }

    /// Removes a voice channel from a guild's allowlist.
    pub async fn remove_channel(
        &self,
        telegram_id: i64,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<ChannelEdit, AppError> {
        let repo = SubscriptionRepository::new(self.db);
        let subscription = repo.get_or_create(telegram_id).await?;

        if !subscription.monitors(guild_id) {
            return Ok(ChannelEdit::GuildNotMonitored);
        }

        Ok(
            match repo
                .remove_channel(subscription.id, guild_id, channel_id)
                .await?
            {
                true => ChannelEdit::Changed,
                false => ChannelEdit::Unchanged,
            },
        )
    }
}
