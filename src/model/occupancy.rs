use std::collections::HashSet;

/// A participant connected to a voice channel, as seen by the event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceParticipant {
    pub user_id: u64,
    /// Display name used in notification text.
    pub name: String,
    /// Whether the participant is an automated account.
    pub bot: bool,
}

/// Raw membership of one voice channel before bots are filtered out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChannelState {
    pub channel_id: u64,
    pub name: String,
    /// Discord sort position, used for deterministic enumeration order.
    pub position: u16,
    pub participants: Vec<VoiceParticipant>,
}

/// A human occupying a voice channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    pub user_id: u64,
    pub name: String,
}

/// Human occupancy of a single voice channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOccupancy {
    pub channel_id: u64,
    pub name: String,
    /// Humans in the channel, in the order the event source listed them.
    pub occupants: Vec<Occupant>,
}

impl ChannelOccupancy {
    /// Number of humans in the channel.
    pub fn count(&self) -> u32 {
        self.occupants.len() as u32
    }

    /// Display names of the humans in the channel.
    pub fn names(&self) -> Vec<String> {
        self.occupants.iter().map(|o| o.name.clone()).collect()
    }
}

/// Point-in-time view of a guild's voice occupancy. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySnapshot {
    pub guild_id: u64,
    pub guild_name: String,
    /// Sum of per-channel human counts.
    pub total: u32,
    /// Voice channels in enumeration order (ascending position, then id).
    pub channels: Vec<ChannelOccupancy>,
}

impl OccupancySnapshot {
    /// Distinct humans across the given channels, in enumeration order.
    ///
    /// Deduplicated by user id so two people sharing a display name are both
    /// listed.
    pub fn distinct_occupants<'a>(
        channels: impl IntoIterator<Item = &'a ChannelOccupancy>,
    ) -> Vec<&'a Occupant> {
        let mut seen = HashSet::new();
        channels
            .into_iter()
            .flat_map(|channel| channel.occupants.iter())
            .filter(|occupant| seen.insert(occupant.user_id))
            .collect()
    }
}

/// A snapshot reduced to a single figure for one subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub count: u32,
    pub participants: Vec<String>,
    /// Human readable description of where the count was taken.
    pub label: String,
}

/// A fired threshold crossing, ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyNotification {
    /// Telegram chat id of the subscriber.
    pub telegram_id: i64,
    pub guild_id: u64,
    pub label: String,
    pub count: u32,
    pub participants: Vec<String>,
}

impl OccupancyNotification {
    /// Renders the notification as message text.
    pub fn render(&self) -> String {
        let names = if self.participants.is_empty() {
            "nobody".to_string()
        } else {
            self.participants.join(", ")
        };

        format!("{} people gathered in {}: {}", self.count, self.label, names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupant(user_id: u64, name: &str) -> Occupant {
        Occupant {
            user_id,
            name: name.to_string(),
        }
    }

    #[test]
    fn distinct_occupants_keeps_same_named_users() {
        let channels = vec![
            ChannelOccupancy {
                channel_id: 1,
                name: "Lobby".to_string(),
                occupants: vec![occupant(10, "alex"), occupant(11, "sam")],
            },
            ChannelOccupancy {
                channel_id: 2,
                name: "Raid".to_string(),
                occupants: vec![occupant(12, "alex"), occupant(10, "alex")],
            },
        ];

        let ids: Vec<u64> = OccupancySnapshot::distinct_occupants(&channels)
            .iter()
            .map(|o| o.user_id)
            .collect();

        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn render_lists_participants() {
        let notification = OccupancyNotification {
            telegram_id: 1,
            guild_id: 2,
            label: "Raid".to_string(),
            count: 2,
            participants: vec!["alex".to_string(), "sam".to_string()],
        };

        assert_eq!(notification.render(), "2 people gathered in Raid: alex, sam");
    }

    #[test]
    fn render_handles_no_participants() {
        let notification = OccupancyNotification {
            telegram_id: 1,
            guild_id: 2,
            label: "Raid".to_string(),
            count: 0,
            participants: Vec::new(),
        };

        assert_eq!(notification.render(), "0 people gathered in Raid: nobody");
    }
}
