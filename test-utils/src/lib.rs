//! Voicewatch Test Utils
//!
//! Provides shared testing utilities for the voicewatch bot. This crate offers a
//! builder for creating test contexts backed by in-memory SQLite databases and
//! factories for seeding subscription data.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Builders inserting subscribers, monitored guilds and allowlisted channels
//! - **serenity**: Serenity `Guild` fixtures with voice channels, members and voice states
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn test_subscription() -> Result<(), sea_orm::DbErr> {
//!     let test = TestBuilder::new()
//!         .with_subscription_tables()
//!         .build()
//!         .await
//!         .unwrap();
//!     let db = test.db.as_ref().unwrap();
//!
//!     let subscriber = factory::subscriber::SubscriberFactory::new(db)
//!         .threshold(3)
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
