use std::time::Duration;

use crate::{config::Config, error::AppError, telegram::client::LONG_POLL_TIMEOUT_SECS};

/// Connects to the Sqlite database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the HTTP client used for the Telegram Bot API.
///
/// The request timeout leaves headroom over the `getUpdates` long-poll so idle
/// polls complete normally instead of timing out. Redirects are disabled.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(LONG_POLL_TIMEOUT_SECS + 30))
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    Ok(client)
}
