//! Long-poll loop serving subscriber commands.

use sea_orm::DatabaseConnection;
use std::time::Duration;

use crate::{
    error::AppError,
    telegram::{
        client::{TelegramClient, TgMessage},
        command::Command,
    },
};

/// Reply sent when a command fails on our side.
const FAILURE_REPLY: &str = "Something went wrong, please try again later.";

/// Backoff after a failed `getUpdates`, doubled up to `MAX_BACKOFF`.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Runs the Telegram command loop until the process exits.
///
/// Clears any webhook first, dropping updates queued while the bot was offline,
/// then long-polls `getUpdates` and answers every command message. Polling
/// errors are logged and retried with exponential backoff.
///
/// # Arguments
/// - `client` - Telegram Bot API client
/// - `db` - Settings store connection used by commands
///
/// # Returns
/// - `Err(AppError)` - The webhook could not be removed at startup
pub async fn run(client: TelegramClient, db: DatabaseConnection) -> Result<(), AppError> {
    client.delete_webhook(true).await?;

    tracing::info!("Telegram command loop started");

    let mut offset = 0;
    let mut backoff = INITIAL_BACKOFF;

    loop {
        let updates = match client.get_updates(offset).await {
            Ok(updates) => {
                backoff = INITIAL_BACKOFF;
                updates
            }
            Err(e) => {
                tracing::warn!("Failed to poll Telegram updates: {}", e);
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            if let Some(message) = update.message {
                handle_message(&client, &db, message).await;
            }
        }
    }
}

async fn handle_message(client: &TelegramClient, db: &DatabaseConnection, message: TgMessage) {
    let chat_id = message.chat.id;
    let Some(command) = message.text.as_deref().and_then(Command::parse) else {
        return;
    };

    tracing::debug!("Command from {}: {:?}", chat_id, command);

    let reply = match command.execute(db, chat_id).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Failed to execute {:?} for {}: {}", command, chat_id, e);
            FAILURE_REPLY.to_string()
        }
    };

    if let Err(e) = client.send_message(chat_id, &reply).await {
        tracing::warn!("Failed to reply to {}: {}", chat_id, e);
    }
}
