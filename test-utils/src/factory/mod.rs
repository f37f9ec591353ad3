//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with a `Factory` struct for
//! customization and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let subscriber = factory::create_subscriber(&db).await?;
//! factory::subscriber_guild::SubscriberGuildFactory::new(&db, subscriber.id)
//!     .guild_id(100)
//!     .baseline(2)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `subscriber` - Create subscriber entities
//! - `subscriber_guild` - Create monitored guild rows (with baseline)
//! - `subscriber_channel` - Create allowlisted channel rows
//! - `helpers` - Unique id generation and multi-entity convenience methods

pub mod helpers;
pub mod subscriber;
pub mod subscriber_channel;
pub mod subscriber_guild;

pub use subscriber::create_subscriber;
pub use subscriber_channel::create_subscriber_channel;
pub use subscriber_guild::create_subscriber_guild;
