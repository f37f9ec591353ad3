//! SeaORM entities for the voicewatch settings store.

pub mod prelude;

pub mod subscriber;
pub mod subscriber_channel;
pub mod subscriber_guild;
