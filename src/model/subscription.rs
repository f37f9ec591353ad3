use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// How a subscriber's view of a guild is reduced to a single count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationMode {
    /// Sum of humans across every considered voice channel.
    #[default]
    Total,
    /// Humans in the single busiest considered voice channel.
    MaxChannel,
}

impl AggregationMode {
    /// Stored representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::MaxChannel => "max_channel",
        }
    }

    /// Parses a mode name, returning `None` for anything unrecognized.
    ///
    /// Used by the command surface, which must reject unknown modes.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "total" => Some(Self::Total),
            "max_channel" => Some(Self::MaxChannel),
            _ => None,
        }
    }

    /// Reads a stored mode, falling back to `Total` for unrecognized values.
    pub fn from_stored(value: &str) -> Self {
        Self::parse(value).unwrap_or_default()
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subscriber's complete alert configuration with per-guild baselines.
///
/// Always fully populated: records loaded from storage have any malformed field
/// defaulted at the repository boundary, so callers never re-apply defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    /// Internal subscriber id.
    pub id: i32,
    /// Telegram chat id notifications are delivered to.
    pub telegram_id: i64,
    pub mode: AggregationMode,
    pub threshold: u32,
    /// Monitored guild ids mapped to the last evaluated aggregate count.
    pub baselines: BTreeMap<u64, u32>,
    /// Per-guild channel allowlists. Guilds without an entry consider every
    /// voice channel.
    pub channels: BTreeMap<u64, BTreeSet<u64>>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Whether the subscriber monitors the given guild.
    pub fn monitors(&self, guild_id: u64) -> bool {
        self.baselines.contains_key(&guild_id)
    }

    /// Last evaluated count for the guild, `0` when none has been recorded.
    pub fn baseline(&self, guild_id: u64) -> u32 {
        self.baselines.get(&guild_id).copied().unwrap_or(0)
    }

    /// Channel allowlist for a guild, `None` when every channel is considered.
    pub fn allowlist(&self, guild_id: u64) -> Option<&BTreeSet<u64>> {
        self.channels.get(&guild_id).filter(|set| !set.is_empty())
    }

    /// Converts stored rows to a subscription at the repository boundary.
    ///
    /// Guild and channel ids are parsed from their string columns; a negative
    /// threshold or baseline is clamped to `0` and an unknown mode reads as
    /// `Total`.
    ///
    /// # Arguments
    /// - `subscriber` - The subscriber row
    /// - `guilds` - Monitored guild rows belonging to the subscriber
    /// - `channels` - Allowlisted channel rows belonging to the subscriber
    ///
    /// # Returns
    /// - `Ok(Subscription)` - Converted subscription
    /// - `Err(DbErr::Custom)` - A stored guild or channel id is not a valid u64
    pub fn from_entities(
        subscriber: entity::subscriber::Model,
        guilds: Vec<entity::subscriber_guild::Model>,
        channels: Vec<entity::subscriber_channel::Model>,
    ) -> Result<Self, DbErr> {
        let mut baselines = BTreeMap::new();
        for guild in guilds {
            let guild_id = parse_snowflake(&guild.guild_id, "guild_id")?;
            baselines.insert(guild_id, guild.baseline_count.max(0) as u32);
        }

        let mut allowlists: BTreeMap<u64, BTreeSet<u64>> = BTreeMap::new();
        for channel in channels {
            let guild_id = parse_snowflake(&channel.guild_id, "guild_id")?;
            let channel_id = parse_snowflake(&channel.channel_id, "channel_id")?;
            allowlists.entry(guild_id).or_default().insert(channel_id);
        }

        Ok(Self {
            id: subscriber.id,
            telegram_id: subscriber.telegram_id,
            mode: AggregationMode::from_stored(&subscriber.mode),
            threshold: subscriber.threshold.max(0) as u32,
            baselines,
            channels: allowlists,
            created_at: subscriber.created_at,
        })
    }
}

fn parse_snowflake(value: &str, column: &str) -> Result<u64, DbErr> {
    value
        .parse::<u64>()
        .map_err(|e| DbErr::Custom(format!("Failed to parse {}: {}", column, e)))
}
