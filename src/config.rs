use chrono::Duration;

use crate::error::{config::ConfigError, AppError};

const TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_COOLDOWN_SECONDS: i64 = 300;
/// 30 days.
const MAX_COOLDOWN_SECONDS: i64 = 2_592_000;

pub struct Config {
    pub database_url: String,

    pub discord_bot_token: String,

    pub telegram_bot_token: String,
    pub telegram_api_url: String,

    /// Window during which repeat notifications for one subscriber and guild
    /// are suppressed.
    pub notify_cooldown: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            discord_bot_token: required("DISCORD_BOT_TOKEN")?,
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_api_url: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| TELEGRAM_API_URL.to_string()),
            notify_cooldown: Duration::seconds(parse_cooldown_seconds(
                std::env::var("NOTIFY_COOLDOWN_SECONDS").ok(),
            )?),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_cooldown_seconds(value: Option<String>) -> Result<i64, ConfigError> {
    let Some(value) = value else {
        return Ok(DEFAULT_COOLDOWN_SECONDS);
    };

    match value.trim().parse::<i64>() {
        Ok(seconds) if (0..=MAX_COOLDOWN_SECONDS).contains(&seconds) => Ok(seconds),
        _ => Err(ConfigError::InvalidEnvVar {
            name: "NOTIFY_COOLDOWN_SECONDS".to_string(),
            value,
        }),
    }
}
