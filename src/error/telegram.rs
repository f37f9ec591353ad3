use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    /// The Bot API answered with `ok: false`.
    ///
    /// Typical causes are a revoked token, a chat that blocked the bot, or a
    /// malformed request.
    #[error("Telegram API error in {method}: {description}")]
    Api {
        /// Bot API method that failed
        method: String,
        /// Description returned by the API
        description: String,
    },
}
