//! Heartbeat use case - a viewer signals it is watching a world.

use serde::Serialize;
use std::sync::Arc;
use worldkeeper_domain::{WorldId, WorldStatusKind};

use super::{LifecycleError, WorldStatusStore};
use crate::infrastructure::ports::EngineControlPort;

/// What a heartbeat did to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HeartbeatOutcome {
    /// The view was recorded (or skipped as recent); the world keeps its status.
    Recorded,
    /// The world was inactive and has been set running with its engine started.
    Restarted,
    /// A developer stopped the world; heartbeats never resume it.
    DeveloperStopped,
}

/// Records a viewer heartbeat and resurrects idle worlds.
///
/// The `Inactive -> Running` move is a compare-and-set, so of several
/// concurrent heartbeats on the same inactive world only one starts the
/// engine, and a developer stop that lands first is never overwritten.
pub struct HeartbeatWorld {
    store: Arc<WorldStatusStore>,
    engine_control: Arc<dyn EngineControlPort>,
}

impl HeartbeatWorld {
    pub fn new(store: Arc<WorldStatusStore>, engine_control: Arc<dyn EngineControlPort>) -> Self {
        Self {
            store,
            engine_control,
        }
    }

    pub async fn execute(&self, world_id: WorldId) -> Result<HeartbeatOutcome, LifecycleError> {
        let now = self.store.now();
        let status = self.store.heartbeat(world_id, now).await?;

        match status.status {
            WorldStatusKind::StoppedByDeveloper => {
                tracing::debug!(world_id = %world_id, "World stopped by developer, not restarting");
                Ok(HeartbeatOutcome::DeveloperStopped)
            }
            WorldStatusKind::Inactive => self.restart(world_id).await,
            WorldStatusKind::Running => Ok(HeartbeatOutcome::Recorded),
        }
    }

    async fn restart(&self, world_id: WorldId) -> Result<HeartbeatOutcome, LifecycleError> {
        let claimed = self
            .store
            .transition(world_id, WorldStatusKind::Inactive, WorldStatusKind::Running)
            .await?;
        if !claimed {
            let current = self.store.get(world_id).await?;
            return Ok(match current.status {
                WorldStatusKind::StoppedByDeveloper => HeartbeatOutcome::DeveloperStopped,
                _ => HeartbeatOutcome::Recorded,
            });
        }

        tracing::info!(world_id = %world_id, "Restarting inactive world");
        if let Err(e) = self.engine_control.start_engine(world_id).await {
            tracing::warn!(world_id = %world_id, error = %e, "Engine start failed");
            self.store
                .revert(world_id, WorldStatusKind::Inactive, WorldStatusKind::Running)
                .await;
            return Err(e.into());
        }

        Ok(HeartbeatOutcome::Restarted)
    }
}
