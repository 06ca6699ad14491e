//! Daily job scheduling
//!
//! A scheduled job runs once immediately, then every day at a fixed local
//! hour, until the shutdown signal flips to `true`.

use super::Job;
use chrono::{DateTime, Days, Local, TimeZone};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// First `hour:00` strictly after `now`, in `now`'s time zone
///
/// Skips days where that wall-clock time does not exist (DST gaps). Returns
/// `None` only for an hour outside `0..24`.
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let today = now.date_naive();

    (0..=2).find_map(|offset| {
        let date = today.checked_add_days(Days::new(offset))?;
        let candidate = tz.from_local_datetime(&date.and_hms_opt(hour, 0, 0)?).earliest()?;
        (candidate > *now).then_some(candidate)
    })
}

/// Run `job` now, then daily at `hour`, until `shutdown` becomes `true`
pub fn spawn_daily(
    job: Arc<dyn Job>,
    hour: u32,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let name = job.name();

        tokio::select! {
            biased;
            () = stopped(&mut shutdown) => {
                info!(job = name, "scheduler stopped");
                return;
            }
            () = run_logged(job.as_ref()) => {}
        }

        loop {
            let now = Local::now();
            let Some(next) = next_run_after(&now, hour) else {
                error!(job = name, hour, "invalid schedule hour, scheduler exiting");
                return;
            };
            let wait = next.signed_duration_since(now).to_std().unwrap_or_default();
            info!(
                job = name,
                next = %next.to_rfc3339(),
                wait_secs = wait.as_secs(),
                "next run scheduled"
            );

            tokio::select! {
                biased;
                () = stopped(&mut shutdown) => {
                    info!(job = name, "scheduler stopped");
                    return;
                }
                () = tokio::time::sleep(wait) => run_logged(job.as_ref()).await,
            }
        }
    })
}

async fn run_logged(job: &dyn Job) {
    match job.run().await {
        Ok(report) if report.is_clean() => info!(job = job.name(), %report, "scheduled run finished"),
        Ok(report) => warn!(job = job.name(), %report, "scheduled run finished with failures"),
        Err(e) => error!(job = job.name(), error = %e, "scheduled run failed"),
    }
}

/// Resolves once shutdown is requested or the sender is gone
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    // Err means the sender was dropped; treat it as a shutdown
    let _ = shutdown.wait_for(|stop| *stop).await;
}
