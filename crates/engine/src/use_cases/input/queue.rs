//! The two entry points into the input queue: by world and by engine.

use serde_json::Value;
use std::sync::Arc;
use worldkeeper_domain::{EngineId, InputId, InputRecord, WorldId, WorldInput};

use crate::infrastructure::ports::{ClockPort, EngineRepo, InputRepo, RepoError, WorldStatusRepo};
use crate::use_cases::lifecycle::LifecycleError;

pub struct InputQueue {
    input_repo: Arc<dyn InputRepo>,
    status_repo: Arc<dyn WorldStatusRepo>,
    engine_repo: Arc<dyn EngineRepo>,
    clock: Arc<dyn ClockPort>,
}

impl InputQueue {
    pub fn new(
        input_repo: Arc<dyn InputRepo>,
        status_repo: Arc<dyn WorldStatusRepo>,
        engine_repo: Arc<dyn EngineRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            input_repo,
            status_repo,
            engine_repo,
            clock,
        }
    }

    /// Append an input for the engine that runs `world_id`.
    pub async fn insert_input(
        &self,
        world_id: WorldId,
        name: &str,
        args: Value,
    ) -> Result<InputId, LifecycleError> {
        let status = self
            .status_repo
            .get_by_world(world_id)
            .await?
            .ok_or(LifecycleError::UnknownWorld(world_id))?;

        self.append(status.engine_id, name, args).await
    }

    /// Append an input directly to an engine's queue.
    pub async fn engine_insert_input(
        &self,
        engine_id: EngineId,
        name: &str,
        args: Value,
    ) -> Result<InputId, LifecycleError> {
        if self.engine_repo.get(engine_id).await?.is_none() {
            return Err(LifecycleError::InvalidEngineReference(engine_id));
        }

        self.append(engine_id, name, args).await
    }

    pub async fn insert_world_input(
        &self,
        world_id: WorldId,
        input: WorldInput,
    ) -> Result<InputId, LifecycleError> {
        let (name, args) = input.into_parts().map_err(RepoError::serialization)?;
        self.insert_input(world_id, &name, args).await
    }

    pub async fn engine_insert_world_input(
        &self,
        engine_id: EngineId,
        input: WorldInput,
    ) -> Result<InputId, LifecycleError> {
        let (name, args) = input.into_parts().map_err(RepoError::serialization)?;
        self.engine_insert_input(engine_id, &name, args).await
    }

    /// Unconsumed inputs for an engine, oldest first.
    pub async fn list_pending(
        &self,
        engine_id: EngineId,
    ) -> Result<Vec<InputRecord>, LifecycleError> {
        Ok(self.input_repo.list_pending(engine_id).await?)
    }

    async fn append(
        &self,
        engine_id: EngineId,
        name: &str,
        args: Value,
    ) -> Result<InputId, LifecycleError> {
        let record = self
            .input_repo
            .append(engine_id, name, &args, self.clock.now())
            .await?;

        tracing::debug!(
            engine_id = %engine_id,
            input_id = %record.id,
            number = record.number,
            name,
            "Queued input"
        );
        Ok(record.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockEngineRepo, MockInputRepo, MockWorldStatusRepo};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::*;
    use serde_json::json;
    use worldkeeper_domain::{Engine, WorldStatus};

    fn record(engine_id: EngineId, name: &str, args: &Value) -> InputRecord {
        InputRecord {
            id: InputId::new(),
            engine_id,
            number: 1,
            name: name.to_string(),
            args: args.clone(),
            received_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            returned: None,
        }
    }

    fn queue(
        inputs: MockInputRepo,
        statuses: MockWorldStatusRepo,
        engines: MockEngineRepo,
    ) -> InputQueue {
        InputQueue::new(
            Arc::new(inputs),
            Arc::new(statuses),
            Arc::new(engines),
            Arc::new(FixedClock(Utc.timestamp_opt(1_700_000_000, 0).unwrap())),
        )
    }

    #[tokio::test]
    async fn insert_input_resolves_the_world_engine() {
        let status = WorldStatus::new(WorldId::new(), EngineId::new());
        let world_id = status.world_id;
        let engine_id = status.engine_id;

        let mut statuses = MockWorldStatusRepo::new();
        statuses
            .expect_get_by_world()
            .with(eq(world_id))
            .returning(move |_| Ok(Some(status.clone())));
        let mut inputs = MockInputRepo::new();
        inputs
            .expect_append()
            .withf(move |engine, name, args, _| {
                *engine == engine_id && name == "leave" && args["playerId"] == "p1"
            })
            .times(1)
            .returning(|engine, name, args, _| Ok(record(engine, name, args)));

        let result = queue(inputs, statuses, MockEngineRepo::new())
            .insert_input(world_id, "leave", json!({ "playerId": "p1" }))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn insert_input_for_unknown_world_appends_nothing() {
        let mut statuses = MockWorldStatusRepo::new();
        statuses.expect_get_by_world().returning(|_| Ok(None));
        let mut inputs = MockInputRepo::new();
        inputs.expect_append().never();

        let result = queue(inputs, statuses, MockEngineRepo::new())
            .insert_input(WorldId::new(), "join", json!({}))
            .await;

        assert!(matches!(result, Err(LifecycleError::UnknownWorld(_))));
    }

    #[tokio::test]
    async fn engine_insert_input_requires_a_known_engine() {
        let engine_id = EngineId::new();
        let mut engines = MockEngineRepo::new();
        engines
            .expect_get()
            .with(eq(engine_id))
            .returning(|_| Ok(None));
        let mut inputs = MockInputRepo::new();
        inputs.expect_append().never();

        let result = queue(inputs, MockWorldStatusRepo::new(), engines)
            .engine_insert_input(engine_id, "moveTo", json!({}))
            .await;

        assert!(
            matches!(result, Err(LifecycleError::InvalidEngineReference(id)) if id == engine_id)
        );
    }

    #[tokio::test]
    async fn engine_insert_input_appends_verbatim() {
        let engine_id = EngineId::new();
        let mut engines = MockEngineRepo::new();
        engines
            .expect_get()
            .returning(move |id| Ok(Some(Engine::new(id))));
        let mut inputs = MockInputRepo::new();
        inputs
            .expect_append()
            .withf(move |engine, name, args, _| {
                *engine == engine_id && name == "custom" && *args == json!({ "k": [1, 2] })
            })
            .times(1)
            .returning(|engine, name, args, _| Ok(record(engine, name, args)));

        let result = queue(inputs, MockWorldStatusRepo::new(), engines)
            .engine_insert_input(engine_id, "custom", json!({ "k": [1, 2] }))
            .await;

        assert!(result.is_ok());
    }
}
