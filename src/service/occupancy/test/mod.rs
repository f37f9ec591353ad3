use crate::data::SubscriptionRepository;
use crate::error::{telegram::TelegramError, AppError};
use crate::model::occupancy::{
    OccupancyNotification, OccupancySnapshot, VoiceChannelState, VoiceParticipant,
};
use crate::notifier::NotificationSink;
use crate::service::occupancy::{
    snapshot::build_snapshot, Decision, EvaluationReport, OccupancyEvaluator, SnapshotSource,
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use serenity::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use test_utils::{builder::TestBuilder, factory};

mod ordering;

const GUILD_ID: u64 = 100;

/// Event source returning whatever snapshot the test last installed.
///
/// `None` simulates a guild the bot can no longer resolve.
struct StaticSource {
    snapshot: Mutex<Option<OccupancySnapshot>>,
}

impl StaticSource {
    fn new(snapshot: Option<OccupancySnapshot>) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    fn set(&self, snapshot: Option<OccupancySnapshot>) {
        *self.snapshot.lock().unwrap() = snapshot;
    }
}

impl SnapshotSource for StaticSource {
    fn snapshot(&self, guild_id: u64) -> Option<OccupancySnapshot> {
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .filter(|snapshot| snapshot.guild_id == guild_id)
    }
}

/// Sink recording every notification, optionally failing or stalling for
/// some recipients.
#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<OccupancyNotification>>,
    failing: HashSet<i64>,
    slow: HashSet<i64>,
    delay: std::time::Duration,
}

impl RecordingSink {
    fn failing_for(telegram_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            failing: telegram_ids.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Deliveries to `telegram_ids` sleep for `delay` before being recorded.
    fn slow_for(
        telegram_ids: impl IntoIterator<Item = i64>,
        delay: std::time::Duration,
    ) -> Self {
        Self {
            slow: telegram_ids.into_iter().collect(),
            delay,
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<OccupancyNotification> {
        self.sent.lock().unwrap().clone()
    }

    /// Yields until a notification for `telegram_id` has been recorded.
    async fn received_by(&self, telegram_id: i64) {
        while !self.sent().iter().any(|n| n.telegram_id == telegram_id) {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, notification: &OccupancyNotification) -> Result<(), AppError> {
        if self.slow.contains(&notification.telegram_id) {
            tokio::time::sleep(self.delay).await;
        }

        if self.failing.contains(&notification.telegram_id) {
            return Err(TelegramError::Api {
                method: "sendMessage".to_string(),
                description: "Forbidden: bot was blocked by the user".to_string(),
            }
            .into());
        }

        self.sent.lock().unwrap().push(notification.clone());

        Ok(())
    }
}

/// Builds a snapshot of `GUILD_ID` with one channel per entry of `counts`.
///
/// Channel `n` (1-based) is named `voice-n`, sits at position `n` and holds
/// `counts[n - 1]` humans named `user-<id>` plus one bot.
fn crowd(counts: &[u32]) -> OccupancySnapshot {
    let channels = counts
        .iter()
        .enumerate()
        .map(|(index, &count)| {
            let channel_id = index as u64 + 1;
            let mut participants: Vec<VoiceParticipant> = (0..count as u64)
                .map(|n| {
                    let user_id = channel_id * 1000 + n;
                    VoiceParticipant {
                        user_id,
                        name: format!("user-{}", user_id),
                        bot: false,
                    }
                })
                .collect();
            participants.push(VoiceParticipant {
                user_id: channel_id * 1000 + 999,
                name: "music".to_string(),
                bot: true,
            });

            VoiceChannelState {
                channel_id,
                name: format!("voice-{}", channel_id),
                position: channel_id as u16,
                participants,
            }
        })
        .collect();

    build_snapshot(GUILD_ID, "Guild", channels)
}

fn evaluator(
    db: &DatabaseConnection,
    sink: Arc<RecordingSink>,
    cooldown: Duration,
) -> OccupancyEvaluator {
    OccupancyEvaluator::new(db.clone(), sink, cooldown)
}

/// Waits for every dispatched delivery, then returns what the sink received.
async fn delivered(
    evaluator: &OccupancyEvaluator,
    sink: &RecordingSink,
) -> Vec<OccupancyNotification> {
    evaluator.wait_for_deliveries().await;
    sink.sent()
}

/// Evaluates `GUILD_ID` and returns the single subscriber's decision.
async fn evaluate_one(
    evaluator: &OccupancyEvaluator,
    source: &StaticSource,
    now: DateTime<Utc>,
) -> Result<Decision, AppError> {
    match evaluator.evaluate_guild(source, GUILD_ID, now).await? {
        EvaluationReport::Evaluated(outcomes) => {
            assert_eq!(outcomes.len(), 1);
            Ok(outcomes[0].decision)
        }
        EvaluationReport::GuildUnavailable => panic!("guild should be resolvable"),
    }
}
