//! Daily usage reset
//!
//! One long-lived task: sleep until the next midnight in the configured
//! offset, zero every counter, repeat. A failed reset is logged and the
//! loop keeps going; the task dies with the process.

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use log::{debug, error, info};
use std::time::Duration;
use tokio::time::sleep;

use crate::database::Database;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

pub struct UsageResetScheduler {
    database: Database,
    utc_offset: FixedOffset,
}

impl UsageResetScheduler {
    pub fn new(database: Database, utc_offset: FixedOffset) -> Self {
        UsageResetScheduler {
            database,
            utc_offset,
        }
    }

    /// Run forever. Spawn this on its own task.
    pub async fn run(self) {
        info!("Daily usage reset scheduler started");
        loop {
            let now = Utc::now().with_timezone(&self.utc_offset);
            let wait = duration_until_next_midnight(now);
            debug!("Next usage reset in {}s", wait.as_secs());
            sleep(wait).await;

            match self.database.reset_all_usage().await {
                Ok(()) => info!("Daily usage counters reset"),
                Err(err) => error!("Failed to reset usage counters: {err:#}"),
            }
        }
    }
}

/// Time remaining until the next local midnight.
///
/// Exactly at midnight the answer is a full day, so a reset that lands on
/// the boundary does not immediately fire twice.
fn duration_until_next_midnight(now: DateTime<FixedOffset>) -> Duration {
    let elapsed_today = u64::from(now.num_seconds_from_midnight());
    Duration::from_secs(SECONDS_PER_DAY - elapsed_today.min(SECONDS_PER_DAY - 1))
}
