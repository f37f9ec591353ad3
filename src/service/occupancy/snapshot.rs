//! Occupancy snapshot building.
//!
//! Turns the raw voice membership of a guild into an [`OccupancySnapshot`]:
//! automated participants are dropped, channels are put into a deterministic
//! enumeration order and per-channel human counts are summed into the guild total.

use serenity::all::{ChannelType, Guild, GuildId, VoiceState};
use serenity::cache::Cache;
use std::collections::HashMap;

use crate::model::occupancy::{
    ChannelOccupancy, Occupant, OccupancySnapshot, VoiceChannelState, VoiceParticipant,
};

/// Source of current voice membership for a guild.
pub trait SnapshotSource: Send + Sync {
    /// Builds a snapshot of the guild's voice occupancy.
    ///
    /// Returns `None` when the guild cannot be resolved, for example when the
    /// bot left it between the event and the lookup.
    fn snapshot(&self, guild_id: u64) -> Option<OccupancySnapshot>;
}

impl SnapshotSource for Cache {
    fn snapshot(&self, guild_id: u64) -> Option<OccupancySnapshot> {
        let guild = self.guild(GuildId::new(guild_id))?;

        Some(snapshot_from_guild(&guild))
    }
}

/// Builds a snapshot from raw channel membership.
///
/// Channels are ordered by ascending position, ties broken by channel id, so
/// that "first enumerated" is stable across calls. Participant order within a
/// channel is preserved.
///
/// # Arguments
/// - `guild_id` - Discord guild ID
/// - `guild_name` - Guild display name used in labels
/// - `channels` - Voice channels with every connected participant, bots included
///
/// # Returns
/// - `OccupancySnapshot` - Human-only occupancy of every given channel
pub fn build_snapshot(
    guild_id: u64,
    guild_name: impl Into<String>,
    mut channels: Vec<VoiceChannelState>,
) -> OccupancySnapshot {
    channels.sort_by_key(|channel| (channel.position, channel.channel_id));

    let channels: Vec<ChannelOccupancy> = channels
        .into_iter()
        .map(|channel| ChannelOccupancy {
            channel_id: channel.channel_id,
            name: channel.name,
            occupants: channel
                .participants
                .into_iter()
                .filter(|participant| !participant.bot)
                .map(|participant| Occupant {
                    user_id: participant.user_id,
                    name: participant.name,
                })
                .collect(),
        })
        .collect();

    OccupancySnapshot {
        guild_id,
        guild_name: guild_name.into(),
        total: channels.iter().map(ChannelOccupancy::count).sum(),
        channels,
    }
}

/// Builds a snapshot from a cached serenity guild.
///
/// Voice and stage channels are considered. Participants are sorted by display
/// name within their channel since the cache stores voice states unordered.
pub fn snapshot_from_guild(guild: &Guild) -> OccupancySnapshot {
    let mut channels: HashMap<u64, VoiceChannelState> = guild
        .channels
        .values()
        .filter(|channel| matches!(channel.kind, ChannelType::Voice | ChannelType::Stage))
        .map(|channel| {
            (
                channel.id.get(),
                VoiceChannelState {
                    channel_id: channel.id.get(),
                    name: channel.name.clone(),
                    position: channel.position,
                    participants: Vec::new(),
                },
            )
        })
        .collect();

    for state in guild.voice_states.values() {
        let Some(channel_id) = state.channel_id else {
            continue;
        };
        if let Some(channel) = channels.get_mut(&channel_id.get()) {
            channel.participants.push(participant(guild, state));
        }
    }

    let channels = channels
        .into_values()
        .map(|mut channel| {
            channel
                .participants
                .sort_by(|a, b| a.name.cmp(&b.name).then(a.user_id.cmp(&b.user_id)));
            channel
        })
        .collect();

    build_snapshot(guild.id.get(), guild.name.clone(), channels)
}

/// Resolves the member behind a voice state. Users missing from the member
/// cache are counted as humans named by their id.
fn participant(guild: &Guild, state: &VoiceState) -> VoiceParticipant {
    let member = state
        .member
        .as_ref()
        .or_else(|| guild.members.get(&state.user_id));

    match member {
        Some(member) => VoiceParticipant {
            user_id: state.user_id.get(),
            name: member.display_name().to_string(),
            bot: member.user.bot,
        },
        None => VoiceParticipant {
            user_id: state.user_id.get(),
            name: state.user_id.to_string(),
            bot: false,
        },
    }
}
