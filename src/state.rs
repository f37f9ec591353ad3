//! Shared collaborators built once at startup.
//!
//! The state is passed explicitly to each long-running task (Discord bot,
//! Telegram command loop, cooldown sweep); there is no global instance.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::{
    config::Config,
    error::AppError,
    notifier::TelegramNotifier,
    service::occupancy::OccupancyEvaluator,
    startup,
    telegram::TelegramClient,
};

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone: `DatabaseConnection` is a pool handle,
/// `TelegramClient` wraps a `reqwest::Client` and the evaluator sits behind
/// an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Settings store connection pool.
    pub db: DatabaseConnection,

    /// Telegram Bot API client for command replies.
    pub telegram: TelegramClient,

    /// The single occupancy evaluator. Owns the in-memory cooldown table, so
    /// every event source must share this instance.
    pub evaluator: Arc<OccupancyEvaluator>,
}

impl AppState {
    /// Builds the state from configuration and a migrated database.
    ///
    /// # Arguments
    /// - `config` - Application configuration
    /// - `db` - Connected and migrated database
    ///
    /// # Returns
    /// - `Ok(AppState)` - Initialized application state
    /// - `Err(AppError)` - The HTTP client could not be built
    pub fn new(config: &Config, db: DatabaseConnection) -> Result<Self, AppError> {
        let telegram = TelegramClient::new(
            startup::setup_reqwest_client()?,
            config.telegram_api_url.clone(),
            config.telegram_bot_token.clone(),
        );

        let notifier = Arc::new(TelegramNotifier::new(telegram.clone()));
        let evaluator = Arc::new(OccupancyEvaluator::new(
            db.clone(),
            notifier,
            config.notify_cooldown,
        ));

        Ok(Self {
            db,
            telegram,
            evaluator,
        })
    }
}
