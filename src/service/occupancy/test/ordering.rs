use super::*;

/// Tests two events for the same guild evaluated at the same time.
///
/// The cooldown is zero so only the stored baseline can stop the second
/// evaluation from firing again. Deliveries are slowed down so they overlap
/// with the second evaluation.
///
/// Expected: exactly one Fire, and one evaluation reads the baseline the
/// other one wrote
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_events_for_a_guild_are_serialized() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_subscription_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let subscriber = factory::helpers::create_subscriber_for_guild(db, GUILD_ID, "total", 3).await?;

    let sink = Arc::new(RecordingSink::slow_for(
        [subscriber.telegram_id],
        std::time::Duration::from_millis(50),
    ));
    let evaluator = evaluator(db, sink.clone(), Duration::zero());
    let source = StaticSource::new(Some(crowd(&[4])));
    let now = Utc::now();

    let (first, second) = tokio::join!(
        evaluator.evaluate_guild(&source, GUILD_ID, now),
        evaluator.evaluate_guild(&source, GUILD_ID, now),
    );

    let outcomes: Vec<_> = [first?, second?]
        .into_iter()
        .flat_map(|report| match report {
            EvaluationReport::Evaluated(outcomes) => outcomes,
            EvaluationReport::GuildUnavailable => panic!("guild should be resolvable"),
        })
        .collect();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| o.decision == Decision::Fire)
            .count(),
        1
    );

    let mut previous: Vec<u32> = outcomes.iter().map(|o| o.previous).collect();
    previous.sort_unstable();
    assert_eq!(previous, vec![0, 4]);

    assert_eq!(delivered(&evaluator, &sink).await.len(), 1);
    assert_eq!(
        SubscriptionRepository::new(db)
            .get_baseline(subscriber.id, GUILD_ID)
            .await?,
        4
    );

    Ok(())
}
