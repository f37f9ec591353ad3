use serenity::async_trait;

use crate::{
    error::AppError, model::occupancy::OccupancyNotification, notifier::NotificationSink,
    telegram::TelegramClient,
};

/// Sends occupancy notifications as Telegram chat messages.
pub struct TelegramNotifier {
    client: TelegramClient,
}

impl TelegramNotifier {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn notify(&self, notification: &OccupancyNotification) -> Result<(), AppError> {
        self.client
            .send_message(notification.telegram_id, &notification.render())
            .await?;

        tracing::info!(
            "Notified {} of {} people in {} (guild {})",
            notification.telegram_id,
            notification.count,
            notification.label,
            notification.guild_id
        );

        Ok(())
    }
}
