use serenity::all::{Context, EventHandler, Guild, GuildId, Ready, VoiceState};
use serenity::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::service::occupancy::OccupancyEvaluator;

pub mod guild;
pub mod ready;
pub mod voice;

/// Discord bot event handler
pub struct Handler {
    pub evaluator: Arc<OccupancyEvaluator>,
    /// Set once serenity has received every guild; voice events are ignored
    /// until then since snapshots would be built from a partial cache.
    cache_ready: AtomicBool,
}

impl Handler {
    pub fn new(evaluator: Arc<OccupancyEvaluator>) -> Self {
        Self {
            evaluator,
            cache_ready: AtomicBool::new(false),
        }
    }

    fn is_cache_ready(&self) -> bool {
        self.cache_ready.load(Ordering::Acquire)
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready).await;
    }

    /// Called once every guild of the session has been cached
    async fn cache_ready(&self, ctx: Context, guilds: Vec<GuildId>) {
        ready::handle_cache_ready(ctx, guilds).await;
        self.cache_ready.store(true, Ordering::Release);
    }

    /// Called when a guild becomes available or the bot joins a new guild
    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        guild::handle_guild_create(&self.evaluator, ctx, guild, is_new).await;
    }

    /// Called when a user joins, leaves, moves between or changes state in a voice channel
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        if !self.is_cache_ready() {
            tracing::debug!("Ignoring voice state update received before cache was ready");
            return;
        }

        voice::handle_voice_state_update(&self.evaluator, ctx, old, new).await;
    }
}
