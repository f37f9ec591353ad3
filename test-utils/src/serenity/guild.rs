//! Test factory for creating Serenity Guild objects.
//!
//! Guilds are created by deserializing JSON shaped like a `GUILD_CREATE`
//! payload. Channels, members and voice states are added through
//! [`GuildBuilder`].

use serde_json::{json, Value};
use serenity::all::{ChannelType, Guild};

/// Builder for a Serenity `Guild` with voice activity.
///
/// Every member and voice state is attached to the builder's guild. Voice
/// states carry no embedded member, so the member is resolved from the
/// guild's member list.
pub struct GuildBuilder {
    guild_id: u64,
    name: String,
    channels: Vec<Value>,
    members: Vec<Value>,
    voice_states: Vec<Value>,
}

impl GuildBuilder {
    /// Creates a builder for a guild with no channels or members.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID (snowflake)
    /// - `name` - Guild name
    pub fn new(guild_id: u64, name: &str) -> Self {
        Self {
            guild_id,
            name: name.to_string(),
            channels: Vec::new(),
            members: Vec::new(),
            voice_states: Vec::new(),
        }
    }

    /// Adds a channel of any kind.
    ///
    /// # Arguments
    /// - `channel_id` - Discord channel ID
    /// - `name` - Channel name
    /// - `kind` - Channel type, e.g. `Voice`, `Stage` or `Text`
    /// - `position` - Sorting position in the channel list
    pub fn channel(
        mut self,
        channel_id: u64,
        name: &str,
        kind: ChannelType,
        position: u16,
    ) -> Self {
        self.channels.push(json!({
            "id": channel_id.to_string(),
            "guild_id": self.guild_id.to_string(),
            "type": u8::from(kind),
            "name": name,
            "position": position,
            "permission_overwrites": [],
            "nsfw": false,
            "flags": 0,
        }));
        self
    }

    /// Adds a cached member.
    ///
    /// # Arguments
    /// - `user_id` - Discord user ID
    /// - `name` - Username, used as the display name since no nickname is set
    /// - `bot` - Whether the user is a bot account
    pub fn member(mut self, user_id: u64, name: &str, bot: bool) -> Self {
        self.members.push(json!({
            "user": {
                "id": user_id.to_string(),
                "username": name,
                "global_name": null,
                "avatar": null,
                "bot": bot,
            },
            "guild_id": self.guild_id.to_string(),
            "nick": null,
            "roles": [],
            "joined_at": "2020-01-01T00:00:00.000000+00:00",
            "deaf": false,
            "mute": false,
            "pending": false,
            "flags": 0,
        }));
        self
    }

    /// Adds a voice state for a user.
    ///
    /// # Arguments
    /// - `user_id` - Discord user ID, cached as a member or not
    /// - `channel_id` - Connected channel, `None` for a disconnected state
    pub fn voice_state(mut self, user_id: u64, channel_id: Option<u64>) -> Self {
        self.voice_states.push(json!({
            "guild_id": self.guild_id.to_string(),
            "channel_id": channel_id.map(|id| id.to_string()),
            "user_id": user_id.to_string(),
            "session_id": format!("session-{}", user_id),
            "deaf": false,
            "mute": false,
            "self_deaf": false,
            "self_mute": false,
            "self_video": false,
            "suppress": false,
            "request_to_speak_timestamp": null,
        }));
        self
    }

    /// Builds the guild.
    ///
    /// # Panics
    /// - If the JSON cannot be deserialized into a Guild (indicates invalid test data)
    pub fn build(self) -> Guild {
        serde_json::from_value(json!({
            "id": self.guild_id.to_string(),
            "name": self.name,
            "icon": null,
            "icon_hash": null,
            "owner_id": "100000000000000000",
            "afk_timeout": 300,
            "verification_level": 0,
            "default_message_notifications": 0,
            "explicit_content_filter": 0,
            "roles": [],
            "emojis": [],
            "stickers": [],
            "features": [],
            "mfa_level": 0,
            "system_channel_flags": 0,
            "premium_tier": 0,
            "premium_subscription_count": 0,
            "premium_progress_bar_enabled": false,
            "preferred_locale": "en-US",
            "nsfw_level": 0,
            "joined_at": "2020-01-01T00:00:00.000000+00:00",
            "large": false,
            "member_count": self.members.len(),
            "voice_states": self.voice_states,
            "channels": self.channels,
            "threads": [],
            "presences": [],
            "max_presences": 25000,
            "max_members": 100000,
            "unavailable": false,
            "members": self.members,
            "stage_instances": [],
            "guild_scheduled_events": [],
        }))
        .expect("Failed to create test guild - invalid JSON structure")
    }
}

/// Creates a test Serenity Guild with no channels, members or voice states.
///
/// # Arguments
/// - `guild_id` - Discord guild ID (snowflake)
/// - `name` - Guild name
///
/// # Returns
/// - `Guild` - A valid Serenity Guild struct for testing
pub fn create_test_guild(guild_id: u64, name: &str) -> Guild {
    GuildBuilder::new(guild_id, name).build()
}
