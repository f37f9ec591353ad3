//! Reduction of a snapshot to a subscriber's single figure.

use crate::model::{
    occupancy::{Aggregate, ChannelOccupancy, OccupancySnapshot},
    subscription::{AggregationMode, Subscription},
};

/// Label used in `max_channel` mode when no considered channel has humans.
pub const NO_OCCUPIED_CHANNEL: &str = "no occupied channel";

/// Reduces a snapshot to `(count, participants, label)` for one subscriber.
///
/// Only channels on the subscriber's allowlist for the snapshot's guild are
/// considered; without an allowlist every voice channel is.
///
/// - `Total`: sum of humans across the considered channels, participants are the
///   distinct occupants of those channels.
/// - `MaxChannel`: the considered channel with the strictly greatest human count,
///   the first enumerated one winning ties.
pub fn reduce(snapshot: &OccupancySnapshot, subscription: &Subscription) -> Aggregate {
    let allowlist = subscription.allowlist(snapshot.guild_id);
    let channels: Vec<&ChannelOccupancy> = snapshot
        .channels
        .iter()
        .filter(|channel| allowlist.map_or(true, |allowed| allowed.contains(&channel.channel_id)))
        .collect();

    match subscription.mode {
        AggregationMode::Total => total(snapshot, &channels, allowlist.is_some()),
        AggregationMode::MaxChannel => busiest(&channels),
    }
}

fn total(snapshot: &OccupancySnapshot, channels: &[&ChannelOccupancy], scoped: bool) -> Aggregate {
    let count = if scoped {
        channels.iter().map(|channel| channel.count()).sum()
    } else {
        snapshot.total
    };

    let participants = OccupancySnapshot::distinct_occupants(channels.iter().copied())
        .into_iter()
        .map(|occupant| occupant.name.clone())
        .collect();

    let scope = if scoped { "tracked channels" } else { "all channels" };

    Aggregate {
        count,
        participants,
        label: format!("{} of {}", scope, guild_label(snapshot)),
    }
}

fn busiest(channels: &[&ChannelOccupancy]) -> Aggregate {
    let mut best: Option<&ChannelOccupancy> = None;
    for channel in channels {
        if channel.count() > best.map_or(0, |b| b.count()) {
            best = Some(channel);
        }
    }

    match best {
        Some(channel) => Aggregate {
            count: channel.count(),
            participants: channel.names(),
            label: channel.name.clone(),
        },
        None => Aggregate {
            count: 0,
            participants: Vec::new(),
            label: NO_OCCUPIED_CHANNEL.to_string(),
        },
    }
}

fn guild_label(snapshot: &OccupancySnapshot) -> String {
    if snapshot.guild_name.is_empty() {
        format!("server {}", snapshot.guild_id)
    } else {
        snapshot.guild_name.clone()
    }
}
