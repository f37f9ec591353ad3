use super::*;

/// Tests finding the subscribers of a guild.
///
/// Verifies that only subscribers monitoring the guild are returned, ordered
/// by subscriber id, with baselines and allowlists populated.
///
/// Expected: Ok with the two monitoring subscribers
#[tokio::test]
async fn finds_only_monitoring_subscribers() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;
    let second = factory::helpers::create_subscriber_for_guild(db, 100, "max_channel", 2).await?;
    factory::helpers::create_subscriber_for_guild(db, 200, "total", 1).await?;
    factory::create_subscriber_channel(db, second.id, 100, 5001).await?;

    let repo = SubscriptionRepository::new(db);
    let subscriptions = repo.find_by_guild(100).await?;

    assert_eq!(subscriptions.len(), 2);
    assert_eq!(subscriptions[0].id, first.id);
    assert_eq!(subscriptions[1].id, second.id);
    assert_eq!(subscriptions[1].mode, AggregationMode::MaxChannel);
    assert!(subscriptions[1]
        .allowlist(100)
        .is_some_and(|channels| channels.contains(&5001)));
    assert!(subscriptions[0].allowlist(100).is_none());

    Ok(())
}

/// Tests that a subscriber's other guilds are loaded too.
///
/// Expected: Ok with both monitored guilds present on the subscription
#[tokio::test]
async fn loads_all_monitored_guilds() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscriber = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;
    factory::subscriber_guild::SubscriberGuildFactory::new(db, subscriber.id)
        .guild_id(300)
        .baseline(7)
        .build()
        .await?;

    let repo = SubscriptionRepository::new(db);
    let subscriptions = repo.find_by_guild(100).await?;

    assert_eq!(subscriptions.len(), 1);
    assert!(subscriptions[0].monitors(300));
    assert_eq!(subscriptions[0].baseline(300), 7);

    Ok(())
}

/// Tests a guild nobody monitors.
///
/// Expected: Ok with empty list
#[tokio::test]
async fn returns_empty_for_unmonitored_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;

    let repo = SubscriptionRepository::new(db);

    assert!(repo.find_by_guild(999).await?.is_empty());

    Ok(())
}

/// Tests that a corrupt stored guild id surfaces as an error.
///
/// Expected: Err(DbErr::Custom)
#[tokio::test]
async fn fails_on_unparsable_guild_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscriber = factory::helpers::create_subscriber_for_guild(db, 100, "total", 3).await?;
    factory::subscriber_guild::SubscriberGuildFactory::new(db, subscriber.id)
        .raw_guild_id("not-a-guild")
        .build()
        .await?;

    let repo = SubscriptionRepository::new(db);

    assert!(matches!(repo.find_by_guild(100).await, Err(DbErr::Custom(_))));

    Ok(())
}
