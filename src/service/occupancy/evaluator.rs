//! Threshold crossing evaluation.
//!
//! For every subscriber of a guild the evaluator compares the stored baseline
//! with the freshly aggregated count and fires a notification only on a rising
//! edge (`previous < threshold <= count`) outside the pair's cooldown window.
//! The new count is always written back as the baseline, fired or not.
//!
//! Evaluations of the same guild are serialized so baseline writes for a pair
//! happen in event order. Different guilds evaluate concurrently. The baselines
//! of one event are committed together; notifications are handed to background
//! tasks only after the commit, so a slow delivery never holds the guild lock.

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinSet;

use crate::{
    data::SubscriptionRepository,
    error::AppError,
    model::{
        occupancy::{OccupancyNotification, OccupancySnapshot},
        subscription::Subscription,
    },
    notifier::NotificationSink,
    service::occupancy::{
        aggregate,
        cooldown::{CooldownKey, CooldownTable},
        snapshot::SnapshotSource,
    },
};

/// Outcome of the crossing rule for one (subscriber, guild) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Rising edge outside the cooldown window; a notification is sent.
    Fire,
    /// Rising edge inside the cooldown window; nothing is sent.
    Suppressed,
    /// No rising edge.
    Hold,
}

/// Applies the crossing rule.
///
/// Fires iff `previous < threshold && count >= threshold` and the pair is not
/// cooling down. A threshold of `0` can never be crossed.
pub fn decide(previous: u32, count: u32, threshold: u32, cooling_down: bool) -> Decision {
    if previous >= threshold || count < threshold {
        Decision::Hold
    } else if cooling_down {
        Decision::Suppressed
    } else {
        Decision::Fire
    }
}

/// Per-subscriber result of one guild evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberOutcome {
    pub subscriber_id: i32,
    /// Baseline before the evaluation.
    pub previous: u32,
    /// Aggregated count, now stored as the baseline.
    pub count: u32,
    pub decision: Decision,
}

/// Expiry of a cooldown started at `now`, saturating at the latest
/// representable instant.
fn cooldown_expiry(now: DateTime<Utc>, cooldown: Duration) -> DateTime<Utc> {
    now.checked_add_signed(cooldown).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Result of evaluating one guild event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationReport {
    /// The guild could not be resolved; nothing was read or written.
    GuildUnavailable,
    /// Outcome of every subscriber of the guild.
    Evaluated(Vec<SubscriberOutcome>),
}

/// Per-guild mutexes serializing evaluations of the same guild.
#[derive(Default)]
struct GuildLocks {
    locks: Mutex<HashMap<u64, Arc<Mutex<()>>>>,
}

impl GuildLocks {
    async fn lock(&self, guild_id: u64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .await
            .entry(guild_id)
            .or_default()
            .clone();

        lock.lock_owned().await
    }
}

/// The threshold evaluator. Owns the cooldown table; constructed once at
/// startup and shared behind an `Arc`.
pub struct OccupancyEvaluator {
    db: DatabaseConnection,
    sink: Arc<dyn NotificationSink>,
    cooldowns: CooldownTable,
    cooldown: Duration,
    guild_locks: GuildLocks,
    deliveries: Mutex<JoinSet<()>>,
}

impl OccupancyEvaluator {
    /// Creates an evaluator with an empty cooldown table.
    ///
    /// # Arguments
    /// - `db` - Settings store connection
    /// - `sink` - Destination of fired notifications
    /// - `cooldown` - Suppression window started by every fired notification
    pub fn new(
        db: DatabaseConnection,
        sink: Arc<dyn NotificationSink>,
        cooldown: Duration,
    ) -> Self {
        Self {
            db,
            sink,
            cooldowns: CooldownTable::new(),
            cooldown,
            guild_locks: GuildLocks::default(),
            deliveries: Mutex::new(JoinSet::new()),
        }
    }

    /// Entry point for "voice membership changed" signals.
    ///
    /// Evaluates the guild at the current time and logs the result. Never
    /// fails: errors are recovered here so the event source keeps running.
    pub async fn on_membership_changed(&self, source: &dyn SnapshotSource, guild_id: u64) {
        match self.evaluate_guild(source, guild_id, Utc::now()).await {
            Ok(EvaluationReport::GuildUnavailable) => {
                tracing::warn!("Guild {} could not be resolved, skipping evaluation", guild_id);
            }
            Ok(EvaluationReport::Evaluated(outcomes)) => {
                let fired = outcomes
                    .iter()
                    .filter(|o| o.decision == Decision::Fire)
                    .count();
                tracing::debug!(
                    "Evaluated guild {}: {} subscribers, {} notified",
                    guild_id,
                    outcomes.len(),
                    fired
                );
            }
            Err(e) => {
                tracing::error!("Failed to evaluate guild {}: {}", guild_id, e);
            }
        }
    }

    /// Evaluates every subscriber of a guild against a fresh snapshot.
    ///
    /// The snapshot is taken after the guild lock is acquired so it reflects
    /// the latest membership. All baselines are written in one transaction; if
    /// it fails the event is abandoned with no baseline, cooldown or
    /// notification applied. Fired notifications are delivered in the
    /// background and never delay the evaluation.
    ///
    /// # Arguments
    /// - `source` - Event source queried for the guild's current membership
    /// - `guild_id` - Discord guild ID
    /// - `now` - Evaluation time used for the cooldown gate
    ///
    /// # Returns
    /// - `Ok(EvaluationReport::GuildUnavailable)` - Guild unresolvable, nothing changed
    /// - `Ok(EvaluationReport::Evaluated(_))` - Per-subscriber outcomes
    /// - `Err(AppError)` - Subscribers could not be loaded or baselines not written
    pub async fn evaluate_guild(
        &self,
        source: &dyn SnapshotSource,
        guild_id: u64,
        now: DateTime<Utc>,
    ) -> Result<EvaluationReport, AppError> {
        let _guard = self.guild_locks.lock(guild_id).await;

        let Some(snapshot) = source.snapshot(guild_id) else {
            return Ok(EvaluationReport::GuildUnavailable);
        };

        tracing::debug!(
            "Snapshot of guild {}: {} humans across {} voice channels",
            guild_id,
            snapshot.total,
            snapshot.channels.len()
        );

        let repo = SubscriptionRepository::new(&self.db);
        let subscriptions = repo.find_by_guild(guild_id).await?;

        let mut outcomes = Vec::with_capacity(subscriptions.len());
        let mut fired = Vec::new();
        for subscription in &subscriptions {
            let (outcome, notification) = self
                .evaluate_subscriber(&snapshot, subscription, now)
                .await;
            if let Some(notification) = notification {
                fired.push((CooldownKey::new(subscription.id, guild_id), notification));
            }
            outcomes.push(outcome);
        }

        let baselines: Vec<(i32, u32)> = outcomes
            .iter()
            .map(|outcome| (outcome.subscriber_id, outcome.count))
            .collect();
        repo.set_baselines(guild_id, &baselines).await?;

        let expiry = cooldown_expiry(now, self.cooldown);
        for (key, notification) in fired {
            self.cooldowns.set(key, expiry).await;
            self.dispatch(notification).await;
        }

        Ok(EvaluationReport::Evaluated(outcomes))
    }

    /// Applies the crossing rule for one subscriber without writing anything.
    ///
    /// Returns the notification to send when the decision is `Fire`.
    async fn evaluate_subscriber(
        &self,
        snapshot: &OccupancySnapshot,
        subscription: &Subscription,
        now: DateTime<Utc>,
    ) -> (SubscriberOutcome, Option<OccupancyNotification>) {
        let guild_id = snapshot.guild_id;
        let aggregate = aggregate::reduce(snapshot, subscription);
        let previous = subscription.baseline(guild_id);

        let cooling_down = self
            .cooldowns
            .is_active(CooldownKey::new(subscription.id, guild_id), now)
            .await;
        let decision = decide(
            previous,
            aggregate.count,
            subscription.threshold,
            cooling_down,
        );

        tracing::debug!(
            "Subscriber {} guild {}: {} -> {} (threshold {}): {:?}",
            subscription.id,
            guild_id,
            previous,
            aggregate.count,
            subscription.threshold,
            decision
        );

        let outcome = SubscriberOutcome {
            subscriber_id: subscription.id,
            previous,
            count: aggregate.count,
            decision,
        };

        let notification = (decision == Decision::Fire).then(|| OccupancyNotification {
            telegram_id: subscription.telegram_id,
            guild_id,
            label: aggregate.label,
            count: aggregate.count,
            participants: aggregate.participants,
        });

        (outcome, notification)
    }

    /// Hands a notification to a background delivery task.
    ///
    /// Delivery failures are logged and otherwise ignored.
    async fn dispatch(&self, notification: OccupancyNotification) {
        let sink = self.sink.clone();
        let mut deliveries = self.deliveries.lock().await;

        while deliveries.try_join_next().is_some() {}

        deliveries.spawn(async move {
            if let Err(e) = sink.notify(&notification).await {
                tracing::warn!(
                    "Failed to deliver notification to {}: {}",
                    notification.telegram_id,
                    e
                );
            }
        });
    }

    /// Resets every subscriber's baseline for a guild to `0`.
    ///
    /// Called when a guild becomes available so a gathering already in progress
    /// is reported by the next membership event.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of baselines reset
    /// - `Err(AppError)` - Database error
    pub async fn rearm_guild(&self, guild_id: u64) -> Result<u64, AppError> {
        let _guard = self.guild_locks.lock(guild_id).await;

        Ok(SubscriptionRepository::new(&self.db)
            .reset_baselines(guild_id)
            .await?)
    }

    /// Drops cooldown entries that lapsed at or before `now`.
    pub async fn purge_expired_cooldowns(&self, now: DateTime<Utc>) -> usize {
        self.cooldowns.purge_expired(now).await
    }

    /// Waits until every delivery dispatched so far has finished.
    #[cfg(test)]
    pub async fn wait_for_deliveries(&self) {
        let deliveries = std::mem::take(&mut *self.deliveries.lock().await);
        deliveries.join_all().await;
    }

    /// Whether the (subscriber, guild) pair is inside its cooldown window.
    #[cfg(test)]
    pub async fn is_cooling_down(
        &self,
        subscriber_id: i32,
        guild_id: u64,
        now: DateTime<Utc>,
    ) -> bool {
        self.cooldowns
            .is_active(CooldownKey::new(subscriber_id, guild_id), now)
            .await
    }
}
