//! Subscriber factory for creating test subscriber entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test subscribers with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let subscriber = SubscriberFactory::new(&db)
///     .telegram_id(189590002)
///     .mode("max_channel")
///     .threshold(3)
///     .build()
///     .await?;
/// ```
pub struct SubscriberFactory<'a> {
    db: &'a DatabaseConnection,
    telegram_id: i64,
    mode: String,
    threshold: i32,
}

impl<'a> SubscriberFactory<'a> {
    /// Creates a new SubscriberFactory with default values.
    ///
    /// Defaults:
    /// - telegram_id: auto-incremented unique id
    /// - mode: `"total"`
    /// - threshold: `0`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            telegram_id: next_id() as i64,
            mode: "total".to_string(),
            threshold: 0,
        }
    }

    pub fn telegram_id(mut self, telegram_id: i64) -> Self {
        self.telegram_id = telegram_id;
        self
    }

    /// Sets the stored mode string. Any string is accepted so tests can
    /// exercise malformed stored values.
    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Builds and inserts the subscriber entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::subscriber::Model)` - Created subscriber entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::subscriber::Model, DbErr> {
        entity::subscriber::ActiveModel {
            telegram_id: ActiveValue::Set(self.telegram_id),
            mode: ActiveValue::Set(self.mode),
            threshold: ActiveValue::Set(self.threshold),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a subscriber with default values.
///
/// Shorthand for `SubscriberFactory::new(db).build().await`.
pub async fn create_subscriber(
    db: &DatabaseConnection,
) -> Result<entity::subscriber::Model, DbErr> {
    SubscriberFactory::new(db).build().await
}
