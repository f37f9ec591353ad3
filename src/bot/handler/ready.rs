//! Ready event handlers for bot initialization.
//!
//! `ready` fires after the gateway handshake; `cache_ready` fires later, once
//! every guild of the session has been received and cached. Voice events are
//! only evaluated after the latter.

use serenity::all::{Context, GuildId, Ready};

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `_ctx` - Discord context
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(_ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord ({} guilds)",
        ready.user.name,
        ready.guilds.len()
    );
}

/// Handles the cache_ready event once all guilds are cached.
pub async fn handle_cache_ready(_ctx: Context, guilds: Vec<GuildId>) {
    tracing::info!("Cache ready with {} guilds, watching voice channels", guilds.len());
}
