//! Guild availability handler.
//!
//! `guild_create` fires on startup for every guild the bot is in, when it joins
//! a new guild and when a guild recovers from an outage. Voice events may have
//! been missed in all of these cases, so the stored baselines of the guild are
//! no longer trustworthy and are reset.

use serenity::all::{Context, Guild};

use crate::service::occupancy::OccupancyEvaluator;

/// Handles the guild_create event by re-arming the guild.
///
/// Resets every subscriber's baseline for the guild to `0` so a gathering
/// already in progress is reported by the next voice event.
///
/// # Arguments
/// - `evaluator` - Occupancy evaluator owning baseline writes
/// - `_ctx` - Discord context
/// - `guild` - Guild data from Discord
/// - `_is_new` - Whether this is a new guild join
pub async fn handle_guild_create(
    evaluator: &OccupancyEvaluator,
    _ctx: Context,
    guild: Guild,
    _is_new: Option<bool>,
) {
    let guild_id = guild.id.get();

    tracing::debug!(
        "Guild create event: {} ({}) - {} voice states",
        guild.name,
        guild_id,
        guild.voice_states.len()
    );

    match evaluator.rearm_guild(guild_id).await {
        Ok(0) => {}
        Ok(count) => {
            tracing::info!("Re-armed {} subscribers of guild {}", count, guild.name);
        }
        Err(e) => {
            tracing::error!("Failed to re-arm guild {}: {}", guild_id, e);
        }
    }
}
