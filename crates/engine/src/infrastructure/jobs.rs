//! Periodic lifecycle jobs.
//!
//! The idle-stop and dead-engine sweeps run as two independent loops with
//! their own periods. They are not coordinated with each other.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::app::App;

/// Spawn the idle-stop sweep.
pub fn spawn_idle_sweep(app: Arc<App>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            match app.use_cases.lifecycle.stop_inactive.execute().await {
                Ok(report) => {
                    tracing::debug!(
                        scanned = report.scanned,
                        stopped = report.acted.len(),
                        failures = report.failures.len(),
                        "Idle sweep complete"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Idle sweep failed");
                }
            }
        }
    })
}

/// Spawn the dead-engine sweep.
pub fn spawn_dead_engine_sweep(app: Arc<App>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            match app.use_cases.lifecycle.restart_dead.execute().await {
                Ok(report) => {
                    tracing::debug!(
                        scanned = report.scanned,
                        kicked = report.acted.len(),
                        failures = report.failures.len(),
                        "Dead-engine sweep complete"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Dead-engine sweep failed");
                }
            }
        }
    })
}
