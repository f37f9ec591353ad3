use super::*;

/// Tests reading a baseline that was never written.
///
/// Expected: Ok(0) both for a monitored guild with default baseline and for
/// a guild the subscriber does not monitor
#[tokio::test]
async fn missing_baseline_reads_as_zero() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscriber = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;

    let repo = SubscriptionRepository::new(db);

    assert_eq!(repo.get_baseline(subscriber.id, 100).await?, 0);
    assert_eq!(repo.get_baseline(subscriber.id, 555).await?, 0);

    Ok(())
}

/// Tests writing and reading back a baseline.
///
/// Verifies the write only touches the targeted (subscriber, guild) pair.
///
/// Expected: Ok with updated baseline and untouched neighbours
#[tokio::test]
async fn set_baselines_updates_only_the_pair() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;
    let second = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;
    factory::create_subscriber_guild(db, first.id, 200).await?;

    let repo = SubscriptionRepository::new(db);
    repo.set_baselines(100, &[(first.id, 4)]).await?;

    assert_eq!(repo.get_baseline(first.id, 100).await?, 4);
    assert_eq!(repo.get_baseline(first.id, 200).await?, 0);
    assert_eq!(repo.get_baseline(second.id, 100).await?, 0);

    Ok(())
}

/// Tests writing the baselines of every subscriber of a guild at once.
///
/// Expected: Ok with each subscriber holding its own count
#[tokio::test]
async fn set_baselines_writes_every_pair() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;
    let second = factory::helpers::create_subscriber_for_guild(db, 100, "max_channel", 3).await?;

    let repo = SubscriptionRepository::new(db);
    repo.set_baselines(100, &[(first.id, 7), (second.id, 4)]).await?;

    assert_eq!(repo.get_baseline(first.id, 100).await?, 7);
    assert_eq!(repo.get_baseline(second.id, 100).await?, 4);

    Ok(())
}

/// Tests that a failing write rolls back the whole batch.
///
/// A trigger rejects the second subscriber's update after the first one has
/// already been applied inside the transaction.
///
/// Expected: Err, and the first subscriber's baseline is still 0
#[tokio::test]
async fn set_baselines_is_all_or_nothing() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;
    let second = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;
    factory::helpers::reject_baseline_writes_for(db, second.id).await?;

    let repo = SubscriptionRepository::new(db);
    let result = repo
        .set_baselines(100, &[(first.id, 5), (second.id, 5)])
        .await;

    assert!(result.is_err());
    assert_eq!(repo.get_baseline(first.id, 100).await?, 0);
    assert_eq!(repo.get_baseline(second.id, 100).await?, 0);

    Ok(())
}

/// Tests resetting the baselines of a guild.
///
/// Expected: Ok with every baseline of the guild back to 0 and other guilds
/// unchanged
#[tokio::test]
async fn reset_baselines_zeroes_the_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscriber = factory::subscriber::create_subscriber(db).await?;
    factory::subscriber_guild::SubscriberGuildFactory::new(db, subscriber.id)
        .guild_id(100)
        .baseline(6)
        .build()
        .await?;
    factory::subscriber_guild::SubscriberGuildFactory::new(db, subscriber.id)
        .guild_id(200)
        .baseline(2)
        .build()
        .await?;

    let repo = SubscriptionRepository::new(db);
    let reset = repo.reset_baselines(100).await?;

    assert_eq!(reset, 1);
    assert_eq!(repo.get_baseline(subscriber.id, 100).await?, 0);
    assert_eq!(repo.get_baseline(subscriber.id, 200).await?, 2);

    Ok(())
}
