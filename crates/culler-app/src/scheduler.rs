//! Fixed-interval scheduler with cooperative cancellation.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Unit of work fired once per period.
#[async_trait]
pub trait PeriodicTask: Send {
    /// Run one pass to completion.
    async fn run_once(&mut self);
}

/// Drive `task` every `period` until `shutdown` is cancelled and return the
/// number of completed runs.
///
/// The first run fires one period after the call. Cancellation is only
/// observed between runs: a run in progress always completes. Ticks missed
/// while a run overruns the period are delayed, not replayed.
pub async fn run_periodic<T>(task: &mut T, period: Duration, shutdown: &CancellationToken) -> u64
where
    T: PeriodicTask + ?Sized,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut runs = 0_u64;
    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }
        task.run_once().await;
        runs += 1;
    }

    info!(runs, "scheduler stopped");
    runs
}
