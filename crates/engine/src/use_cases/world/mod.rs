//! World read use cases.

use serde::Serialize;
use std::sync::Arc;
use worldkeeper_domain::{Engine, World, WorldId, WorldStatus, DEFAULT_NAME};

use crate::infrastructure::ports::{EngineRepo, WorldRepo, WorldStatusRepo};
use crate::use_cases::lifecycle::LifecycleError;

/// Container for world use cases.
pub struct WorldUseCases {
    pub state: Arc<WorldState>,
}

impl WorldUseCases {
    pub fn new(state: Arc<WorldState>) -> Self {
        Self { state }
    }
}

/// Identity of the calling user. Authentication is stubbed, so every caller
/// is the default human.
pub fn current_user() -> &'static str {
    DEFAULT_NAME
}

/// A world together with its control record and engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub world: World,
    pub status: WorldStatus,
    pub engine: Engine,
}

pub struct WorldState {
    world_repo: Arc<dyn WorldRepo>,
    status_repo: Arc<dyn WorldStatusRepo>,
    engine_repo: Arc<dyn EngineRepo>,
}

impl WorldState {
    pub fn new(
        world_repo: Arc<dyn WorldRepo>,
        status_repo: Arc<dyn WorldStatusRepo>,
        engine_repo: Arc<dyn EngineRepo>,
    ) -> Self {
        Self {
            world_repo,
            status_repo,
            engine_repo,
        }
    }

    pub async fn execute(&self, world_id: WorldId) -> Result<WorldSnapshot, LifecycleError> {
        let world = self
            .world_repo
            .get(world_id)
            .await?
            .ok_or(LifecycleError::UnknownWorld(world_id))?;
        let status = self
            .status_repo
            .get_by_world(world_id)
            .await?
            .ok_or(LifecycleError::UnknownWorld(world_id))?;
        let engine = self
            .engine_repo
            .get(status.engine_id)
            .await?
            .ok_or(LifecycleError::InvalidEngineReference(status.engine_id))?;

        Ok(WorldSnapshot {
            world,
            status,
            engine,
        })
    }
}
