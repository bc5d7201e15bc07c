//! World status store - the single entry point for world status reads and patches.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use worldkeeper_domain::{seed_from_millis, WorldId, WorldStatus, WorldStatusKind};

use super::LifecycleError;
use crate::config::LifecycleConfig;
use crate::infrastructure::ports::{ClockPort, WorldStatusRepo};

/// Reads world status rows and applies field-level patches to them.
///
/// Write-once fields (`server_start_ms`, `seed`) are filled lazily on first
/// read. Races on those writes are tolerated: the losing writer's update is
/// dropped and every caller converges on the durable value after a re-read.
pub struct WorldStatusStore {
    repo: Arc<dyn WorldStatusRepo>,
    clock: Arc<dyn ClockPort>,
    config: LifecycleConfig,
}

impl WorldStatusStore {
    pub fn new(
        repo: Arc<dyn WorldStatusRepo>,
        clock: Arc<dyn ClockPort>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            repo,
            clock,
            config,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub async fn get_default(&self) -> Result<WorldStatus, LifecycleError> {
        self.repo
            .get_default()
            .await?
            .ok_or(LifecycleError::NoDefaultWorld)
    }

    pub async fn get(&self, world_id: WorldId) -> Result<WorldStatus, LifecycleError> {
        self.repo
            .get_by_world(world_id)
            .await?
            .ok_or(LifecycleError::UnknownWorld(world_id))
    }

    pub async fn list_all(&self) -> Result<Vec<WorldStatus>, LifecycleError> {
        Ok(self.repo.list_all().await?)
    }

    /// Fill `server_start_ms` with the current time if it is unset.
    pub async fn ensure_server_start(
        &self,
        status: WorldStatus,
    ) -> Result<WorldStatus, LifecycleError> {
        if status.server_start_ms.is_some() {
            return Ok(status);
        }

        let now_ms = self.clock.now().timestamp_millis();
        match self
            .repo
            .set_server_start_if_absent(status.world_id, now_ms)
            .await
        {
            Ok(true) => {
                tracing::debug!(world_id = %status.world_id, server_start_ms = now_ms, "Recorded server start");
            }
            Ok(false) => {
                tracing::debug!(world_id = %status.world_id, "Server start already recorded by another caller");
            }
            Err(e) => {
                tracing::warn!(world_id = %status.world_id, error = %e, "Failed to record server start");
            }
        }

        self.reread(status).await
    }

    /// Fill `seed` from the current time if it is unset.
    pub async fn ensure_seed(&self, status: WorldStatus) -> Result<WorldStatus, LifecycleError> {
        if status.seed.is_some() {
            return Ok(status);
        }

        let seed = seed_from_millis(self.clock.now().timestamp_millis());
        match self.repo.set_seed_if_absent(status.world_id, seed).await {
            Ok(true) => {
                tracing::debug!(world_id = %status.world_id, seed, "Recorded ambient seed");
            }
            Ok(false) => {
                tracing::debug!(world_id = %status.world_id, "Seed already recorded by another caller");
            }
            Err(e) => {
                tracing::warn!(world_id = %status.world_id, error = %e, "Failed to record seed");
            }
        }

        self.reread(status).await
    }

    /// Converge on the durable row after a write-once attempt.
    async fn reread(&self, status: WorldStatus) -> Result<WorldStatus, LifecycleError> {
        match self.repo.get_by_world(status.world_id).await {
            Ok(Some(fresh)) => Ok(fresh),
            Ok(None) => Err(LifecycleError::UnknownWorld(status.world_id)),
            Err(e) => {
                tracing::warn!(world_id = %status.world_id, error = %e, "Re-read after write-once failed");
                Ok(status)
            }
        }
    }

    /// Record a view of the world at `now`.
    ///
    /// Returns the status as loaded before the view was recorded. The write is
    /// skipped when the stored view is newer than half the heartbeat interval.
    pub async fn heartbeat(
        &self,
        world_id: WorldId,
        now: DateTime<Utc>,
    ) -> Result<WorldStatus, LifecycleError> {
        let status = self.get(world_id).await?;

        if status.needs_view_write(now, self.config.heartbeat_interval) {
            self.repo.record_view(world_id, now).await?;
        } else {
            tracing::debug!(world_id = %world_id, "Recent view already recorded, skipping write");
        }

        Ok(status)
    }

    /// Move a world from `from` to `to` if it is still in `from`.
    ///
    /// Returns `false` when another caller changed the status first.
    pub async fn transition(
        &self,
        world_id: WorldId,
        from: WorldStatusKind,
        to: WorldStatusKind,
    ) -> Result<bool, LifecycleError> {
        let changed = self.repo.transition_status(world_id, from, to).await?;
        if !changed {
            tracing::debug!(
                world_id = %world_id,
                from = %from,
                to = %to,
                "World status changed concurrently, transition skipped"
            );
        }
        Ok(changed)
    }

    /// Undo a transition after the engine command that followed it failed.
    ///
    /// Failures are logged only; the dead-engine sweep recovers a running
    /// world whose engine is stopped.
    pub async fn revert(&self, world_id: WorldId, from: WorldStatusKind, to: WorldStatusKind) {
        match self.repo.transition_status(world_id, to, from).await {
            Ok(true) => {
                tracing::info!(world_id = %world_id, status = %from, "Reverted world status");
            }
            Ok(false) => {
                tracing::debug!(world_id = %world_id, "World status moved on, nothing to revert");
            }
            Err(e) => {
                tracing::warn!(world_id = %world_id, error = %e, "Failed to revert world status");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockWorldStatusRepo, RepoError};
    use chrono::{Duration, TimeZone};
    use mockall::predicate::*;
    use worldkeeper_domain::EngineId;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap()
    }

    fn store(repo: MockWorldStatusRepo) -> WorldStatusStore {
        WorldStatusStore::new(
            Arc::new(repo),
            Arc::new(FixedClock(now())),
            LifecycleConfig::default(),
        )
    }

    #[tokio::test]
    async fn get_default_without_flagged_world_fails() {
        let mut repo = MockWorldStatusRepo::new();
        repo.expect_get_default().times(1).returning(|| Ok(None));

        let result = store(repo).get_default().await;

        assert!(matches!(result, Err(LifecycleError::NoDefaultWorld)));
    }

    #[tokio::test]
    async fn ensure_server_start_is_noop_when_already_set() {
        let repo = MockWorldStatusRepo::new();
        let status = WorldStatus {
            server_start_ms: Some(42),
            ..WorldStatus::new(WorldId::new(), EngineId::new())
        };

        let result = store(repo).ensure_server_start(status.clone()).await.unwrap();

        assert_eq!(result, status);
    }

    #[tokio::test]
    async fn ensure_server_start_converges_on_the_racing_winner() {
        let mut repo = MockWorldStatusRepo::new();
        let status = WorldStatus::new(WorldId::new(), EngineId::new());
        let world_id = status.world_id;
        let winner = WorldStatus {
            server_start_ms: Some(1_000),
            ..status.clone()
        };

        repo.expect_set_server_start_if_absent()
            .with(eq(world_id), eq(now().timestamp_millis()))
            .times(1)
            .returning(|_, _| Ok(false));
        let stored = winner.clone();
        repo.expect_get_by_world()
            .with(eq(world_id))
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let result = store(repo).ensure_server_start(status).await.unwrap();

        assert_eq!(result.server_start_ms, Some(1_000));
    }

    #[tokio::test]
    async fn ensure_seed_swallows_write_failures() {
        let mut repo = MockWorldStatusRepo::new();
        let status = WorldStatus::new(WorldId::new(), EngineId::new());
        let expected_seed = seed_from_millis(now().timestamp_millis());

        repo.expect_set_seed_if_absent()
            .with(always(), eq(expected_seed))
            .times(1)
            .returning(|_, _| Err(RepoError::database("world_status.set_seed", "locked")));
        let durable = WorldStatus {
            seed: Some(9),
            ..status.clone()
        };
        repo.expect_get_by_world()
            .times(1)
            .returning(move |_| Ok(Some(durable.clone())));

        let result = store(repo).ensure_seed(status).await.unwrap();

        assert_eq!(result.seed, Some(9));
    }

    #[tokio::test]
    async fn heartbeat_skips_write_for_recent_view() {
        let mut repo = MockWorldStatusRepo::new();
        let status = WorldStatus::new(WorldId::new(), EngineId::new())
            .with_last_viewed(now() - Duration::seconds(10));
        let world_id = status.world_id;

        repo.expect_get_by_world()
            .returning(move |_| Ok(Some(status.clone())));
        repo.expect_record_view().never();

        store(repo).heartbeat(world_id, now()).await.unwrap();
    }

    #[tokio::test]
    async fn heartbeat_writes_stale_view() {
        let mut repo = MockWorldStatusRepo::new();
        let status = WorldStatus::new(WorldId::new(), EngineId::new())
            .with_last_viewed(now() - Duration::seconds(31));
        let world_id = status.world_id;

        repo.expect_get_by_world()
            .returning(move |_| Ok(Some(status.clone())));
        repo.expect_record_view()
            .with(eq(world_id), eq(now()))
            .times(1)
            .returning(|_, _| Ok(()));

        store(repo).heartbeat(world_id, now()).await.unwrap();
    }

    #[tokio::test]
    async fn heartbeat_on_unknown_world_fails() {
        let mut repo = MockWorldStatusRepo::new();
        repo.expect_get_by_world().returning(|_| Ok(None));

        let world_id = WorldId::new();
        let result = store(repo).heartbeat(world_id, now()).await;

        assert!(matches!(result, Err(LifecycleError::UnknownWorld(id)) if id == world_id));
    }
}
