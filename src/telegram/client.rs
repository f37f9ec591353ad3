//! Minimal Telegram Bot API client over reqwest.
//!
//! Only the three methods the bot needs are wrapped: `getUpdates` for the
//! command long-poll, `sendMessage` for replies and notifications, and
//! `deleteWebhook` so long-polling is allowed at startup.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;

use crate::error::{telegram::TelegramError, AppError};

/// Seconds the Bot API holds a `getUpdates` request open when idle.
pub const LONG_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct TgResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgMessage {
    pub chat: TgChat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgChat {
    pub id: i64,
}

/// Telegram Bot API client. Cheap to clone.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_url: String,
    bot_token: String,
}

impl TelegramClient {
    /// Creates a client for the given Bot API base URL and token.
    ///
    /// # Arguments
    /// - `http` - Shared HTTP client; its timeout must exceed the long-poll timeout
    /// - `api_url` - Bot API base URL without trailing slash
    /// - `bot_token` - Bot token issued by BotFather
    pub fn new(
        http: reqwest::Client,
        api_url: impl Into<String>,
        bot_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.bot_token, method)
    }

    /// Long-polls for updates newer than `offset`.
    ///
    /// # Returns
    /// - `Ok(Vec<TgUpdate>)` - Pending updates, possibly empty after the poll timeout
    /// - `Err(AppError)` - Transport failure or API error
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<TgUpdate>, AppError> {
        let response = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", LONG_POLL_TIMEOUT_SECS.to_string()),
                ("allowed_updates", "[\"message\"]".to_string()),
            ])
            .send()
            .await?;

        let body: TgResponse<Vec<TgUpdate>> = response.json().await?;

        Ok(Self::unwrap_result("getUpdates", body)?.unwrap_or_default())
    }

    /// Sends a plain text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
            }))
            .send()
            .await?;

        Self::unwrap_result::<serde_json::Value>("sendMessage", response.json().await?)?;

        Ok(())
    }

    /// Removes any configured webhook so `getUpdates` may be used.
    ///
    /// # Arguments
    /// - `drop_pending_updates` - Discard updates queued while the bot was offline
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<(), AppError> {
        let response = self
            .http
            .post(self.method_url("deleteWebhook"))
            .json(&json!({ "drop_pending_updates": drop_pending_updates }))
            .send()
            .await?;

        Self::unwrap_result::<bool>("deleteWebhook", response.json().await?)?;

        Ok(())
    }

    fn unwrap_result<T: DeserializeOwned>(
        method: &str,
        body: TgResponse<T>,
    ) -> Result<Option<T>, TelegramError> {
        if !body.ok {
            return Err(TelegramError::Api {
                method: method.to_string(),
                description: body.description.unwrap_or_default(),
            });
        }

        Ok(body.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_url_strips_trailing_slash() {
        let client =
            TelegramClient::new(reqwest::Client::new(), "http://localhost:8081/", "123:abc");

        assert_eq!(
            client.method_url("sendMessage"),
            "http://localhost:8081/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn failed_response_maps_to_api_error() {
        let body: TgResponse<serde_json::Value> = serde_json::from_str(
            r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#,
        )
        .unwrap();

        let err = TelegramClient::unwrap_result("sendMessage", body).unwrap_err();

        assert!(matches!(
            err,
            TelegramError::Api { ref method, ref description }
                if method == "sendMessage" && description.contains("blocked")
        ));
    }

    #[test]
    fn parses_text_message_update() {
        let body: TgResponse<Vec<TgUpdate>> = serde_json::from_str(
            r#"{"ok":true,"result":[{"update_id":7,"message":{"message_id":1,"date":0,
                "chat":{"id":42,"type":"private"},"text":"/status"}}]}"#,
        )
        .unwrap();

        let updates = TelegramClient::unwrap_result("getUpdates", body)
            .unwrap()
            .unwrap();

        assert_eq!(updates[0].update_id, 7);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("/status"));
    }
}
