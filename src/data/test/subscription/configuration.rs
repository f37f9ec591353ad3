use super::*;

/// Tests updating threshold and mode.
///
/// Expected: Ok with both fields persisted
#[tokio::test]
async fn updates_threshold_and_mode() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SubscriptionRepository::new(db);
    let subscription = repo.get_or_create(77).await?;

    repo.set_threshold(subscription.id, 5).await?;
    repo.set_mode(subscription.id, AggregationMode::MaxChannel)
        .await?;

    let updated = repo.find_by_telegram_id(77).await?.unwrap();
    assert_eq!(updated.threshold, 5);
    assert_eq!(updated.mode, AggregationMode::MaxChannel);

    Ok(())
}

/// Tests adding a guild twice.
///
/// Expected: Ok(true) then Ok(false) with a single monitored row
#[tokio::test]
async fn add_guild_is_idempotent() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SubscriptionRepository::new(db);
    let subscription = repo.get_or_create(77).await?;

    assert!(repo.add_guild(subscription.id, 100).await?);
    assert!(!repo.add_guild(subscription.id, 100).await?);

    let rows = entity::prelude::SubscriberGuild::find()
        .filter(entity::subscriber_guild::Column::SubscriberId.eq(subscription.id))
        .all(db)
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].baseline_count, 0);

    Ok(())
}

/// Tests removing a guild drops its allowlist too.
///
/// Expected: Ok(true) with no remaining guild or channel rows for the guild
#[tokio::test]
async fn remove_guild_drops_allowlist() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscriber = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;
    factory::create_subscriber_channel(db, subscriber.id, 100, 5001).await?;
    factory::create_subscriber_channel(db, subscriber.id, 200, 6001).await?;

    let repo = SubscriptionRepository::new(db);

    assert!(repo.remove_guild(subscriber.id, 100).await?);
    assert!(!repo.remove_guild(subscriber.id, 100).await?);

    let updated = repo.find_by_telegram_id(subscriber.telegram_id).await?.unwrap();
    assert!(!updated.monitors(100));
    assert!(updated.allowlist(100).is_none());
    assert!(updated.allowlist(200).is_some());

    Ok(())
}

/// Tests adding and removing allowlisted channels.
///
/// Expected: duplicates rejected, removal scoped to the given guild
#[tokio::test]
async fn edits_channel_allowlist() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscriber = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;

    let repo = SubscriptionRepository::new(db);

    assert!(repo.add_channel(subscriber.id, 100, 5001).await?);
    assert!(!repo.add_channel(subscriber.id, 100, 5001).await?);
    assert!(!repo.remove_channel(subscriber.id, 200, 5001).await?);

    let with_channel = repo.find_by_telegram_id(subscriber.telegram_id).await?.unwrap();
    assert_eq!(with_channel.allowlist(100).map(|c| c.len()), Some(1));

    assert!(repo.remove_channel(subscriber.id, 100, 5001).await?);

    let without_channel = repo.find_by_telegram_id(subscriber.telegram_id).await?.unwrap();
    assert!(without_channel.allowlist(100).is_none());

    Ok(())
}
