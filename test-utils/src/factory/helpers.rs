//! Shared helper utilities for factory methods.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

use crate::factory::{subscriber::SubscriberFactory, subscriber_guild::SubscriberGuildFactory};

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a subscriber monitoring a single guild.
///
/// # Arguments
/// - `db` - Database connection
/// - `guild_id` - Discord guild ID to monitor
/// - `mode` - Stored aggregation mode (`"total"` or `"max_channel"`)
/// - `threshold` - Notification threshold
///
/// # Returns
/// - `Ok(entity::subscriber::Model)` - Created subscriber
/// - `Err(DbErr)` - Database error during insert
pub async fn create_subscriber_for_guild(
    db: &DatabaseConnection,
    guild_id: u64,
    mode: &str,
    threshold: i32,
) -> Result<entity::subscriber::Model, DbErr> {
    let subscriber = SubscriberFactory::new(db)
        .mode(mode)
        .threshold(threshold)
        .build()
        .await?;

    SubscriberGuildFactory::new(db, subscriber.id)
        .guild_id(guild_id)
        .build()
        .await?;

    Ok(subscriber)
}

/// Installs a SQLite trigger that aborts any baseline update of one subscriber.
///
/// Used to make a multi-row baseline write fail partway through.
///
/// # Arguments
/// - `db` - Database connection
/// - `subscriber_id` - Subscriber whose `subscriber_guild` updates are rejected
///
/// # Returns
/// - `Ok(())` - Trigger created
/// - `Err(DbErr)` - Database error while creating the trigger
pub async fn reject_baseline_writes_for(
    db: &DatabaseConnection,
    subscriber_id: i32,
) -> Result<(), DbErr> {
    db.execute_unprepared(&format!(
        "CREATE TRIGGER reject_baseline_{id} \
         BEFORE UPDATE OF baseline_count ON subscriber_guild \
         WHEN NEW.subscriber_id = {id} \
         BEGIN SELECT RAISE(ABORT, 'baseline write rejected'); END;",
        id = subscriber_id
    ))
    .await?;

    Ok(())
}

/// Removes the trigger installed by [`reject_baseline_writes_for`].
pub async fn accept_baseline_writes_for(
    db: &DatabaseConnection,
    subscriber_id: i32,
) -> Result<(), DbErr> {
    db.execute_unprepared(&format!(
        "DROP TRIGGER IF EXISTS reject_baseline_{}",
        subscriber_id
    ))
    .await?;

    Ok(())
}
