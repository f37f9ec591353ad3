use chrono::Utc;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::occupancy::OccupancyEvaluator};

/// Every 10 minutes, on the minute.
const SWEEP_SCHEDULE: &str = "0 */10 * * * *";

/// Starts the cooldown sweep scheduler
///
/// Lapsed cooldown entries already read as absent, so the sweep only reclaims
/// memory. It never fires notifications.
///
/// # Arguments
/// - `evaluator`: Occupancy evaluator owning the cooldown table
pub async fn start_scheduler(evaluator: Arc<OccupancyEvaluator>) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(SWEEP_SCHEDULE, move |_uuid, _lock| {
        let evaluator = evaluator.clone();

        Box::pin(async move {
            let removed = evaluator.purge_expired_cooldowns(Utc::now()).await;
            if removed > 0 {
                tracing::debug!("Removed {} lapsed cooldown entries", removed);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Cooldown sweep scheduler started");

    Ok(())
}
