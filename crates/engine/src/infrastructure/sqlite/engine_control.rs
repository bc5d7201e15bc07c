//! Engine control through the shared `engines` table.
//!
//! The external tick engine watches `running` and `generation_number` on its
//! row. Starting flips `running` on and opens a new generation, stopping flips
//! it off. Kicking opens a new generation so the current tick loop abandons
//! its work and a fresh one takes over; a stopped engine is started again as
//! long as its world is still marked running.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use worldkeeper_domain::{EngineId, WorldId};

use super::helpers::parse_id;
use crate::infrastructure::ports::{EngineControlError, EngineControlPort, RepoError};

pub struct SqliteEngineControl {
    pool: SqlitePool,
}

impl SqliteEngineControl {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn engine_for(&self, world_id: WorldId) -> Result<(EngineId, bool), EngineControlError> {
        let row = sqlx::query(
            r#"
            SELECT e.id AS engine_id, e.running AS running
            FROM world_status s
            JOIN engines e ON e.id = s.engine_id
            WHERE s.world_id = ?
            "#,
        )
        .bind(world_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("engine_control.lookup", e))?;

        let Some(row) = row else {
            return Err(EngineControlError::UnknownWorld(world_id.to_string()));
        };

        let engine_id: String = row
            .try_get("engine_id")
            .map_err(|e| RepoError::database("engine_control.decode", e))?;
        let running: bool = row
            .try_get("running")
            .map_err(|e| RepoError::database("engine_control.decode", e))?;

        Ok((parse_id(&engine_id)?, running))
    }
}

#[async_trait]
impl EngineControlPort for SqliteEngineControl {
    async fn start_engine(&self, world_id: WorldId) -> Result<(), EngineControlError> {
        let (engine_id, running) = self.engine_for(world_id).await?;
        if running {
            tracing::debug!(world_id = %world_id, engine_id = %engine_id, "Engine already running");
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE engines
            SET running = 1, generation_number = generation_number + 1
            WHERE id = ? AND running = 0
            "#,
        )
        .bind(engine_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("engine_control.start", e))?;

        tracing::info!(world_id = %world_id, engine_id = %engine_id, "Engine started");
        Ok(())
    }

    async fn stop_engine(&self, world_id: WorldId) -> Result<(), EngineControlError> {
        let (engine_id, running) = self.engine_for(world_id).await?;
        if !running {
            tracing::debug!(world_id = %world_id, engine_id = %engine_id, "Engine already stopped");
            return Ok(());
        }

        sqlx::query("UPDATE engines SET running = 0 WHERE id = ? AND running = 1")
            .bind(engine_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("engine_control.stop", e))?;

        tracing::info!(world_id = %world_id, engine_id = %engine_id, "Engine stopped");
        Ok(())
    }

    async fn kick_engine(&self, world_id: WorldId) -> Result<(), EngineControlError> {
        let (engine_id, running) = self.engine_for(world_id).await?;
        if running {
            sqlx::query(
                r#"
                UPDATE engines
                SET generation_number = generation_number + 1
                WHERE id = ? AND running = 1
                "#,
            )
            .bind(engine_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("engine_control.kick", e))?;

            tracing::info!(world_id = %world_id, engine_id = %engine_id, "Engine kicked");
            return Ok(());
        }

        // Only restart while the world still wants the engine; an idle stop or
        // developer stop that lands first wins.
        let restarted = sqlx::query(
            r#"
            UPDATE engines
            SET running = 1, generation_number = generation_number + 1
            WHERE id = ? AND running = 0
              AND EXISTS (
                SELECT 1 FROM world_status
                WHERE engine_id = engines.id AND status = 'running'
              )
            "#,
        )
        .bind(engine_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("engine_control.kick", e))?
        .rows_affected()
            > 0;

        if restarted {
            tracing::info!(world_id = %world_id, engine_id = %engine_id, "Stopped engine restarted by kick");
        } else {
            tracing::debug!(world_id = %world_id, engine_id = %engine_id, "Kick skipped, world no longer running");
        }
        Ok(())
    }
}
