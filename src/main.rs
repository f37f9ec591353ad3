mod bot;
mod config;
mod data;
mod error;
mod model;
mod notifier;
mod scheduler;
mod service;
mod startup;
mod state;
mod telegram;
mod util;

use tracing_subscriber::EnvFilter;

use crate::{
    bot::start::{init_bot, start_bot},
    config::Config,
    data::SubscriptionRepository,
    error::AppError,
    scheduler::cooldown_sweep,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let subscribers = SubscriptionRepository::new(&db).list_telegram_ids().await?;
    let state = AppState::new(&config, db)?;

    tracing::info!(
        "Starting voicewatch with {} subscribers (cooldown {}s)",
        subscribers.len(),
        config.notify_cooldown.num_seconds()
    );

    // Start cooldown sweep scheduler
    cooldown_sweep::start_scheduler(state.evaluator.clone()).await?;

    // Start Telegram command loop in a separate task
    let telegram = state.telegram.clone();
    let telegram_db = state.db.clone();
    tokio::spawn(async move {
        if let Err(e) = telegram::poller::run(telegram, telegram_db).await {
            tracing::error!("Telegram command loop error: {}", e);
        }
    });

    // Run the Discord bot until it shuts down
    let client = init_bot(&config, state.evaluator.clone()).await?;
    start_bot(client).await
}
