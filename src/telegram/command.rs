//! Subscriber commands received over Telegram.
//!
//! Parsing is pure and never fails: malformed arguments become
//! [`Command::Invalid`] carrying the usage line to reply with. Execution writes
//! subscription fields through [`SubscriptionService`] and returns the reply text.

use sea_orm::DatabaseConnection;

use crate::{
    error::AppError,
    model::subscription::{AggregationMode, Subscription},
    service::subscription::{ChannelEdit, SubscriptionService},
    util::parse::parse_u64_from_str,
};

const ADD_SERVER_USAGE: &str = "Usage: /addserver <server_id>";
const REMOVE_SERVER_USAGE: &str = "Usage: /removeserver <server_id>";
const SET_THRESHOLD_USAGE: &str = "Usage: /setthreshold <number of people, 0 or more>";
const SET_MODE_USAGE: &str = "Usage: /setmode <total|max_channel>";
const ADD_CHANNEL_USAGE: &str = "Usage: /addchannel <server_id> <channel_id>";
const REMOVE_CHANNEL_USAGE: &str = "Usage: /removechannel <server_id> <channel_id>";

pub const HELP_TEXT: &str = "I watch Discord voice channels and message you when people gather.

/addserver <server_id> - watch a server
/removeserver <server_id> - stop watching a server
/setthreshold <n> - notify when at least n people are in voice
/setmode <total|max_channel> - count the whole server or only its busiest channel
/addchannel <server_id> <channel_id> - only count listed channels of a server
/removechannel <server_id> <channel_id> - remove a channel from that list
/status - show your settings
/help - show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Status,
    AddServer(u64),
    RemoveServer(u64),
    SetThreshold(u32),
    SetMode(AggregationMode),
    AddChannel { guild_id: u64, channel_id: u64 },
    RemoveChannel { guild_id: u64, channel_id: u64 },
    /// Known command with bad arguments; holds the usage line.
    Invalid(&'static str),
    Unknown(String),
}

impl Command {
    /// Parses a message text.
    ///
    /// Returns `None` for plain text that is not a command. A `@botname`
    /// suffix on the command is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim().strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let name = parts.next()?;
        let name = name.split('@').next().unwrap_or(name).to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "status" => Self::Status,
            "addserver" | "setserver" => match args.as_slice() {
                [guild] => {
                    snowflake(guild).map_or(Self::Invalid(ADD_SERVER_USAGE), Self::AddServer)
                }
                _ => Self::Invalid(ADD_SERVER_USAGE),
            },
            "removeserver" => match args.as_slice() {
                [guild] => {
                    snowflake(guild).map_or(Self::Invalid(REMOVE_SERVER_USAGE), Self::RemoveServer)
                }
                _ => Self::Invalid(REMOVE_SERVER_USAGE),
            },
            "setthreshold" => match args.as_slice() {
                [value] => value
                    .parse::<u32>()
                    .map_or(Self::Invalid(SET_THRESHOLD_USAGE), Self::SetThreshold),
                _ => Self::Invalid(SET_THRESHOLD_USAGE),
            },
            "setmode" => match args.as_slice() {
                [mode] => AggregationMode::parse(mode)
                    .map_or(Self::Invalid(SET_MODE_USAGE), Self::SetMode),
                _ => Self::Invalid(SET_MODE_USAGE),
            },
            "addchannel" => match channel_args(&args) {
                Some((guild_id, channel_id)) => Self::AddChannel {
                    guild_id,
                    channel_id,
                },
                None => Self::Invalid(ADD_CHANNEL_USAGE),
            },
            "removechannel" => match channel_args(&args) {
                Some((guild_id, channel_id)) => Self::RemoveChannel {
                    guild_id,
                    channel_id,
                },
                None => Self::Invalid(REMOVE_CHANNEL_USAGE),
            },
            _ => Self::Unknown(name),
        };

        Some(command)
    }

    /// Runs the command for a subscriber and returns the reply text.
    ///
    /// # Arguments
    /// - `db` - Settings store connection
    /// - `telegram_id` - Chat id of the issuing subscriber
    ///
    /// # Returns
    /// - `Ok(String)` - Reply to send back
    /// - `Err(AppError)` - Database error
    pub async fn execute(
        &self,
        db: &DatabaseConnection,
        telegram_id: i64,
    ) -> Result<String, AppError> {
        let service = SubscriptionService::new(db);

        let reply = match self {
            Self::Start => {
                service.get_or_create(telegram_id).await?;
                HELP_TEXT.to_string()
            }
            Self::Help => HELP_TEXT.to_string(),
            Self::Status => render_status(&service.get_or_create(telegram_id).await?),
            Self::AddServer(guild_id) => match service.add_guild(telegram_id, *guild_id).await? {
                true => format!("Now watching server {}.", guild_id),
                false => format!("Server {} is already watched.", guild_id),
            },
            Self::RemoveServer(guild_id) => {
                match service.remove_guild(telegram_id, *guild_id).await? {
                    true => format!("Stopped watching server {}.", guild_id),
                    false => format!("Server {} was not watched.", guild_id),
                }
            }
            Self::SetThreshold(threshold) => {
                service.set_threshold(telegram_id, *threshold).await?;
                if *threshold == 0 {
                    "Threshold set to 0, notifications are off.".to_string()
                } else {
                    format!("Threshold set to {}.", threshold)
                }
            }
            Self::SetMode(mode) => {
                service.set_mode(telegram_id, *mode).await?;
                format!("Mode set to {}.", mode)
            }
            Self::AddChannel {
                guild_id,
                channel_id,
            } => match service.add_channel(telegram_id, *guild_id, *channel_id).await? {
                ChannelEdit::Changed => {
                    format!("Channel {} of server {} is now tracked.", channel_id, guild_id)
                }
                ChannelEdit::Unchanged => format!("Channel {} is already tracked.", channel_id),
                ChannelEdit::GuildNotMonitored => not_monitored(*guild_id),
            },
            Self::RemoveChannel {
                guild_id,
                channel_id,
            } => match service
                .remove_channel(telegram_id, *guild_id, *channel_id)
                .await?
            {
                ChannelEdit::Changed => format!("Channel {} is no longer tracked.", channel_id),
                ChannelEdit::Unchanged => format!("Channel {} was not tracked.", channel_id),
                ChannelEdit::GuildNotMonitored => not_monitored(*guild_id),
            },
            Self::Invalid(usage) => usage.to_string(),
            Self::Unknown(name) => format!("Unknown command /{}. Send /help for the list.", name),
        };

        Ok(reply)
    }
}

/// Parses a Discord id argument, rejecting `0`.
fn snowflake(value: &str) -> Option<u64> {
    parse_u64_from_str(value).ok().filter(|id| *id != 0)
}

fn channel_args(args: &[&str]) -> Option<(u64, u64)> {
    match args {
        [guild, channel] => Some((snowflake(guild)?, snowflake(channel)?)),
        _ => None,
    }
}

fn not_monitored(guild_id: u64) -> String {
    format!(
        "Server {} is not watched. Add it first with /addserver {}.",
        guild_id, guild_id
    )
}

fn render_status(subscription: &Subscription) -> String {
    let mut lines = vec![
        format!("Mode: {}", subscription.mode),
        format!("Threshold: {}", subscription.threshold),
    ];

    if subscription.baselines.is_empty() {
        lines.push("Servers: none".to_string());
    } else {
        lines.push("Servers:".to_string());
        for (guild_id, baseline) in &subscription.baselines {
            let channels = match subscription.allowlist(*guild_id) {
                Some(channels) => channels
                    .iter()
                    .map(u64::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                None => "all voice channels".to_string(),
            };
            lines.push(format!(
                "- {} (last count {}): {}",
                guild_id, baseline, channels
            ));
        }
    }

    lines.join("\n")
}
