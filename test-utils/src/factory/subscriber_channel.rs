//! Factory for allowlisted channel rows.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Creates an allowlisted voice channel for a subscriber and guild.
///
/// # Arguments
/// - `db` - Database connection
/// - `subscriber_id` - Owning subscriber's internal id
/// - `guild_id` - Discord guild the channel belongs to
/// - `channel_id` - Discord voice channel id
///
/// # Returns
/// - `Ok(entity::subscriber_channel::Model)` - Created row
/// - `Err(DbErr)` - Database error during insert
pub async fn create_subscriber_channel(
    db: &DatabaseConnection,
    subscriber_id: i32,
    guild_id: u64,
    channel_id: u64,
) -> Result<entity::subscriber_channel::Model, DbErr> {
    entity::subscriber_channel::ActiveModel {
        subscriber_id: ActiveValue::Set(subscriber_id),
        guild_id: ActiveValue::Set(guild_id.to_string()),
        channel_id: ActiveValue::Set(channel_id.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

