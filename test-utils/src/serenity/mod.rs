//! Test factories for creating Serenity API objects.
//!
//! These factories build valid Serenity structs by deserializing JSON, the same
//! way the gateway payloads are read, so code reading a cached `Guild` can be
//! tested without a Discord connection.
//!
//! # Usage
//!
//! ```rust,ignore
//! use serenity::all::ChannelType;
//! use test_utils::serenity::GuildBuilder;
//!
//! let guild = GuildBuilder::new(100, "Guild")
//!     .channel(10, "Lobby", ChannelType::Voice, 0)
//!     .member(1, "alex", false)
//!     .voice_state(1, Some(10))
//!     .build();
//! ```
//!
//! # Available Factories
//!
//! - `guild::GuildBuilder` - Guild with channels, members and voice states
//! - `guild::create_test_guild` - Guild with no channels or members

pub mod guild;

pub use guild::{create_test_guild, GuildBuilder};
