//! Engine liveness monitor - the idle-stop and dead-engine sweeps.
//!
//! Both sweeps scan every world status row and act only on running worlds.
//! A fault on one world is logged and recorded in the [`SweepReport`]; it
//! never aborts the sweep for the remaining worlds. Status changes are
//! compare-and-set, so a sweep that overlaps a heartbeat or a developer stop
//! only acts on a world still in the state it scanned.

use std::sync::Arc;
use worldkeeper_domain::{WorldId, WorldStatus, WorldStatusKind};

use super::{LifecycleError, WorldStatusStore};
use crate::config::LifecycleConfig;
use crate::infrastructure::ports::{EngineControlPort, EngineRepo};

/// Result of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// World status rows examined.
    pub scanned: usize,
    /// Worlds the sweep stopped or kicked.
    pub acted: Vec<WorldId>,
    pub failures: Vec<(WorldId, String)>,
}

impl SweepReport {
    fn record_failure(&mut self, world_id: WorldId, error: &LifecycleError) {
        self.failures.push((world_id, error.to_string()));
    }
}

// =============================================================================
// Idle sweep
// =============================================================================

/// Stops running worlds nobody has viewed within the idle timeout.
pub struct StopInactiveWorlds {
    store: Arc<WorldStatusStore>,
    engine_control: Arc<dyn EngineControlPort>,
    config: LifecycleConfig,
}

impl StopInactiveWorlds {
    pub fn new(
        store: Arc<WorldStatusStore>,
        engine_control: Arc<dyn EngineControlPort>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            store,
            engine_control,
            config,
        }
    }

    pub async fn execute(&self) -> Result<SweepReport, LifecycleError> {
        let now = self.store.now();
        let statuses = self.store.list_all().await?;
        let mut report = SweepReport {
            scanned: statuses.len(),
            ..SweepReport::default()
        };

        for status in statuses {
            if !status.is_running() || !status.is_idle(now, self.config.idle_timeout) {
                continue;
            }

            match self.stop(&status).await {
                Ok(true) => report.acted.push(status.world_id),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        world_id = %status.world_id,
                        error = %e,
                        "Failed to stop idle world"
                    );
                    report.record_failure(status.world_id, &e);
                }
            }
        }

        if !report.acted.is_empty() {
            tracing::info!(stopped = report.acted.len(), "Idle sweep stopped worlds");
        }
        Ok(report)
    }

    /// Returns `false` when the world left `Running` after the scan.
    async fn stop(&self, status: &WorldStatus) -> Result<bool, LifecycleError> {
        let world_id = status.world_id;
        let claimed = self
            .store
            .transition(world_id, WorldStatusKind::Running, WorldStatusKind::Inactive)
            .await?;
        if !claimed {
            return Ok(false);
        }

        tracing::info!(
            world_id = %world_id,
            last_viewed = ?status.last_viewed,
            "Stopping inactive world"
        );
        if let Err(e) = self.engine_control.stop_engine(world_id).await {
            self.store
                .revert(world_id, WorldStatusKind::Running, WorldStatusKind::Inactive)
                .await;
            return Err(e.into());
        }
        Ok(true)
    }
}

// =============================================================================
// Dead-engine sweep
// =============================================================================

/// Kicks running worlds whose engine has missed at least two ticks or is not
/// running at all.
pub struct RestartDeadWorlds {
    store: Arc<WorldStatusStore>,
    engine_repo: Arc<dyn EngineRepo>,
    engine_control: Arc<dyn EngineControlPort>,
    config: LifecycleConfig,
}

impl RestartDeadWorlds {
    pub fn new(
        store: Arc<WorldStatusStore>,
        engine_repo: Arc<dyn EngineRepo>,
        engine_control: Arc<dyn EngineControlPort>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            store,
            engine_repo,
            engine_control,
            config,
        }
    }

    pub async fn execute(&self) -> Result<SweepReport, LifecycleError> {
        let now = self.store.now();
        let statuses = self.store.list_all().await?;
        let mut report = SweepReport {
            scanned: statuses.len(),
            ..SweepReport::default()
        };

        for status in statuses.iter().filter(|s| s.is_running()) {
            match self.check(status, now).await {
                Ok(true) => report.acted.push(status.world_id),
                Ok(false) => {}
                Err(e) => {
                    let world_id = status.world_id;
                    if e.is_integrity_violation() {
                        tracing::error!(world_id = %world_id, error = %e, "Dead-engine check failed");
                    } else {
                        tracing::warn!(world_id = %world_id, error = %e, "Dead-engine check failed");
                    }
                    report.record_failure(status.world_id, &e);
                }
            }
        }

        Ok(report)
    }

    /// Returns `true` when the engine was kicked.
    async fn check(
        &self,
        status: &WorldStatus,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<bool, LifecycleError> {
        let engine = self
            .engine_repo
            .get(status.engine_id)
            .await?
            .ok_or(LifecycleError::InvalidEngineReference(status.engine_id))?;

        if !engine.running {
            tracing::warn!(
                world_id = %status.world_id,
                engine_id = %engine.id,
                "Running world has a stopped engine, kicking"
            );
        } else if engine.is_stalled(now, self.config.action_duration) {
            tracing::warn!(
                world_id = %status.world_id,
                engine_id = %engine.id,
                current_time = ?engine.current_time,
                "Engine stalled, kicking"
            );
        } else {
            return Ok(false);
        }

        self.engine_control.kick_engine(status.world_id).await?;
        Ok(true)
    }
}
