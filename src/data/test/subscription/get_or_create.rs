use super::*;
use sea_orm::PaginatorTrait;

/// Tests creating a subscription for an unknown Telegram user.
///
/// Verifies that the repository inserts a subscriber with mode `total`,
/// threshold 0 and no monitored guilds.
///
/// Expected: Ok with fully defaulted subscription
#[tokio::test]
async fn creates_default_subscription() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SubscriptionRepository::new(db);
    let subscription = repo.get_or_create(189590002).await?;

    assert_eq!(subscription.telegram_id, 189590002);
    assert_eq!(subscription.mode, AggregationMode::Total);
    assert_eq!(subscription.threshold, 0);
    assert!(subscription.baselines.is_empty());
    assert!(subscription.channels.is_empty());

    let stored = entity::prelude::Subscriber::find()
        .filter(entity::subscriber::Column::TelegramId.eq(189590002_i64))
        .one(db)
        .await?;
    assert!(stored.is_some());

    Ok(())
}

/// Tests that get_or_create returns the existing subscription unchanged.
///
/// Verifies that a second call neither duplicates the subscriber nor resets
/// its configuration.
///
/// Expected: Ok with the existing configuration and a single row
#[tokio::test]
async fn returns_existing_subscription() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscriber = factory::subscriber::SubscriberFactory::new(db)
        .telegram_id(55)
        .mode("max_channel")
        .threshold(4)
        .build()
        .await?;
    factory::create_subscriber_guild(db, subscriber.id, 900).await?;

    let repo = SubscriptionRepository::new(db);
    let subscription = repo.get_or_create(55).await?;

    assert_eq!(subscription.id, subscriber.id);
    assert_eq!(subscription.mode, AggregationMode::MaxChannel);
    assert_eq!(subscription.threshold, 4);
    assert!(subscription.monitors(900));

    let count = entity::prelude::Subscriber::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests looking up a Telegram user who never subscribed.
///
/// Expected: Ok(None)
#[tokio::test]
async fn find_returns_none_for_unknown_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SubscriptionRepository::new(db);

    assert!(repo.find_by_telegram_id(12345).await?.is_none());

    Ok(())
}

/// Tests listing subscriber ids.
///
/// Expected: Ok with ids in creation order
#[tokio::test]
async fn lists_telegram_ids_in_creation_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::subscriber::SubscriberFactory::new(db)
        .telegram_id(30)
        .build()
        .await?;
    factory::subscriber::SubscriberFactory::new(db)
        .telegram_id(10)
        .build()
        .await?;

    let repo = SubscriptionRepository::new(db);

    assert_eq!(repo.list_telegram_ids().await?, vec![30, 10]);

    Ok(())
}
