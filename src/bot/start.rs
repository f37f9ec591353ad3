use serenity::all::{Client, GatewayIntents};
use std::sync::Arc;

use crate::{
    bot::handler::Handler, config::Config, error::AppError,
    service::occupancy::OccupancyEvaluator,
};

/// Builds the Discord client without connecting.
///
/// # Arguments
/// - `config` - Application configuration holding the bot token
/// - `evaluator` - Occupancy evaluator shared with the rest of the bot
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started
/// - `Err(AppError)` - Client construction failed
pub async fn init_bot(
    config: &Config,
    evaluator: Arc<OccupancyEvaluator>,
) -> Result<Client, AppError> {
    // GUILD_MEMBERS is a privileged intent - must be enabled in Discord Developer Portal
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_MEMBERS;

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(Handler::new(evaluator))
        .await?;

    Ok(client)
}

/// Connects to the gateway and processes events until shutdown.
///
/// Should be run inside its own task since it only returns when the connection
/// is closed for good.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
