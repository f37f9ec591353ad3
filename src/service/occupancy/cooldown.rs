//! In-memory cooldown table for fired notifications.
//!
//! Each (subscriber, guild) pair that fired a notification gets an expiry
//! timestamp. The table is owned by the evaluator, lives only in memory and is
//! lost on restart. Expired entries read as absent; `purge_expired` only
//! reclaims memory.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Identifies the (subscriber, guild) pair a cooldown applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CooldownKey {
    /// Internal subscriber id.
    pub subscriber_id: i32,
    pub guild_id: u64,
}

impl CooldownKey {
    pub fn new(subscriber_id: i32, guild_id: u64) -> Self {
        Self {
            subscriber_id,
            guild_id,
        }
    }
}

/// Expiry timestamps keyed by (subscriber, guild).
#[derive(Clone, Default)]
pub struct CooldownTable {
    entries: Arc<RwLock<HashMap<CooldownKey, DateTime<Utc>>>>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the expiry of the pair's cooldown if it is still running at `now`.
    ///
    /// # Arguments
    /// - `key` - The (subscriber, guild) pair
    /// - `now` - Evaluation time
    ///
    /// # Returns
    /// - `Some(expiry)` - Cooldown active until `expiry`
    /// - `None` - No cooldown, or it has lapsed (`now >= expiry`)
    pub async fn get(&self, key: CooldownKey, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.entries
            .read()
            .await
            .get(&key)
            .copied()
            .filter(|expiry| now < *expiry)
    }

    /// Starts or refreshes the pair's cooldown.
    pub async fn set(&self, key: CooldownKey, expiry: DateTime<Utc>) {
        self.entries.write().await.insert(key, expiry);
    }

    /// Whether the pair is inside its cooldown window at `now`.
    pub async fn is_active(&self, key: CooldownKey, now: DateTime<Utc>) -> bool {
        self.get(key, now).await.is_some()
    }

    /// Removes every entry whose expiry is at or before `now`.
    ///
    /// # Returns
    /// - `usize` - Number of entries removed
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expiry| now < *expiry);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
