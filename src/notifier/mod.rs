//! Notification delivery.
//!
//! The occupancy evaluator hands every fired crossing to a [`NotificationSink`].
//! Delivery is fire-and-forget from the evaluator's point of view: a returned
//! error is logged by the caller and never retried.

pub mod telegram;

use serenity::async_trait;

use crate::{error::AppError, model::occupancy::OccupancyNotification};

pub use telegram::TelegramNotifier;

/// Delivers a rendered occupancy notification to a subscriber.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sends the notification to the subscriber it is addressed to.
    ///
    /// # Arguments
    /// - `notification` - Fired crossing with its recipient, label, count and names
    ///
    /// # Returns
    /// - `Ok(())` - The transport accepted the message
    /// - `Err(AppError)` - Delivery failed
    async fn notify(&self, notification: &OccupancyNotification) -> Result<(), AppError>;
}
