//! Telegram side of the bot: the Bot API client, subscriber commands and the
//! long-poll loop that serves them.

pub mod client;
pub mod command;
pub mod poller;

pub use client::TelegramClient;
