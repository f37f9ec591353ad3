//! Voice state handler, the membership-changed signal of the event source.

use serenity::all::{Context, VoiceState};
use serenity::cache::Cache;

use crate::service::occupancy::OccupancyEvaluator;

/// Handles a voice state update by evaluating the affected guild.
///
/// Updates that leave the user in the same channel (mute, deafen, stream) do
/// not change occupancy and are skipped. The snapshot is read from serenity's
/// cache, which already reflects this update when the handler runs.
///
/// # Arguments
/// - `evaluator` - Occupancy evaluator
/// - `ctx` - Discord context providing the cache
/// - `old` - Previous voice state, if it was cached
/// - `new` - Voice state after the update
pub async fn handle_voice_state_update(
    evaluator: &OccupancyEvaluator,
    ctx: Context,
    old: Option<VoiceState>,
    new: VoiceState,
) {
    let Some(guild_id) = new.guild_id else {
        return;
    };

    if old.as_ref().map(|state| state.channel_id) == Some(new.channel_id) {
        return;
    }

    tracing::debug!(
        "Voice membership changed in guild {}: user {} {:?} -> {:?}",
        guild_id,
        new.user_id,
        old.as_ref().and_then(|state| state.channel_id),
        new.channel_id
    );

    let cache: &Cache = &ctx.cache;
    evaluator.on_membership_changed(cache, guild_id.get()).await;
}
