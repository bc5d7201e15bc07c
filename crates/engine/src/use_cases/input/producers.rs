//! Named input producers: join, leave, move and generic engine inputs.

use serde_json::Value;
use std::sync::Arc;
use worldkeeper_domain::{
    CharacterSkin, EngineId, InputId, PlayerId, TilePoint, WorldId, WorldInput, CHARACTER_SKINS,
    DEFAULT_NAME, HUMAN_DESCRIPTION_SUFFIX,
};

use super::InputQueue;
use crate::infrastructure::ports::{RandomPort, WorldRepo};
use crate::use_cases::lifecycle::LifecycleError;

/// Queue a join for the stubbed human identity with a random character skin.
pub struct JoinWorld {
    world_repo: Arc<dyn WorldRepo>,
    queue: Arc<InputQueue>,
    random: Arc<dyn RandomPort>,
}

impl JoinWorld {
    pub fn new(
        world_repo: Arc<dyn WorldRepo>,
        queue: Arc<InputQueue>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            world_repo,
            queue,
            random,
        }
    }

    pub async fn execute(&self, world_id: WorldId) -> Result<InputId, LifecycleError> {
        if self.world_repo.get(world_id).await?.is_none() {
            return Err(LifecycleError::UnknownWorld(world_id));
        }

        let max_index = CHARACTER_SKINS.len() as i32 - 1;
        let index = self.random.gen_range(0, max_index);
        let skin = CharacterSkin::pick(usize::try_from(index).unwrap_or_default());

        let input = WorldInput::Join {
            name: DEFAULT_NAME.to_string(),
            character: skin.name.to_string(),
            description: format!("{DEFAULT_NAME} {HUMAN_DESCRIPTION_SUFFIX}"),
            token_identifier: DEFAULT_NAME.to_string(),
        };

        tracing::info!(world_id = %world_id, character = skin.name, "Player joining world");
        self.queue.insert_world_input(world_id, input).await
    }
}

/// Queue a leave for the stubbed human identity if it is on the roster.
pub struct LeaveWorld {
    world_repo: Arc<dyn WorldRepo>,
    queue: Arc<InputQueue>,
}

impl LeaveWorld {
    pub fn new(world_repo: Arc<dyn WorldRepo>, queue: Arc<InputQueue>) -> Self {
        Self { world_repo, queue }
    }

    /// Returns `None` when the caller is not currently a participant.
    pub async fn execute(&self, world_id: WorldId) -> Result<Option<InputId>, LifecycleError> {
        let world = self
            .world_repo
            .get(world_id)
            .await?
            .ok_or(LifecycleError::UnknownWorld(world_id))?;

        let Some(player) = world.find_human(DEFAULT_NAME) else {
            tracing::debug!(world_id = %world_id, "Leave requested by non-participant, ignoring");
            return Ok(None);
        };

        let input = WorldInput::Leave {
            player_id: player.id,
        };
        let id = self.queue.insert_world_input(world_id, input).await?;

        tracing::info!(world_id = %world_id, player_id = %player.id, "Player leaving world");
        Ok(Some(id))
    }
}

/// Forward a movement request to an engine.
pub struct MoveTo {
    queue: Arc<InputQueue>,
}

impl MoveTo {
    pub fn new(queue: Arc<InputQueue>) -> Self {
        Self { queue }
    }

    pub async fn execute(
        &self,
        engine_id: EngineId,
        player_id: PlayerId,
        destination: Option<TilePoint>,
    ) -> Result<InputId, LifecycleError> {
        let input = WorldInput::MoveTo {
            player_id,
            destination,
        };
        self.queue.engine_insert_world_input(engine_id, input).await
    }
}

/// Append an arbitrary named input to an engine's queue.
pub struct SendWorldInput {
    queue: Arc<InputQueue>,
}

impl SendWorldInput {
    pub fn new(queue: Arc<InputQueue>) -> Self {
        Self { queue }
    }

    pub async fn execute(
        &self,
        engine_id: EngineId,
        name: &str,
        args: Value,
    ) -> Result<InputId, LifecycleError> {
        self.queue.engine_insert_input(engine_id, name, args).await
    }
}
