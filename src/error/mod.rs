//! Error types for the bot.
//!
//! `AppError` is the top-level error returned by services and startup code. It wraps
//! the domain-specific errors below plus the errors of the crates the bot talks to.
//! Event entry points (Discord handlers, the Telegram command loop, scheduled jobs)
//! log these errors and keep running rather than propagating them.

pub mod config;
pub mod internal;
pub mod telegram;

use thiserror::Error;

use crate::error::{config::ConfigError, internal::InternalError, telegram::TelegramError};

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Unexpected internal state, such as an unparsable stored id.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Telegram Bot API reported a failure.
    #[error(transparent)]
    TelegramErr(#[from] TelegramError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
