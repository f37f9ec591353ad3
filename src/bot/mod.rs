//! Discord side of the bot: the voice membership event source.
//!
//! The bot only listens. Voice state updates trigger an occupancy evaluation of
//! the affected guild, with serenity's cache serving as the membership store the
//! snapshot is built from.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild availability and the channel list of every guild
//! - `GUILD_VOICE_STATES` - Voice joins, leaves and moves
//! - `GUILD_MEMBERS` - Member records used for display names and the bot flag
//!
//! Note: `GUILD_MEMBERS` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod handler;
pub mod start;
