//! SQLite-backed world status storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use worldkeeper_domain::{WorldId, WorldStatus, WorldStatusKind};

use super::helpers::{parse_id, parse_optional_millis};
use crate::infrastructure::ports::{RepoError, WorldStatusRepo};

const SELECT_COLUMNS: &str = "SELECT id, world_id, engine_id, is_default, status, \
     last_viewed_ms, server_start_ms, seed FROM world_status";

/// SQLite implementation of the world status control plane.
pub struct SqliteWorldStatusRepo {
    pool: SqlitePool,
}

impl SqliteWorldStatusRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_status(row: &SqliteRow) -> Result<WorldStatus, RepoError> {
        let get = |e: sqlx::Error| RepoError::database("world_status.decode", e);

        let status: String = row.try_get("status").map_err(get)?;
        let seed: Option<i64> = row.try_get("seed").map_err(get)?;
        let seed = seed
            .map(|s| {
                u32::try_from(s)
                    .map_err(|_| RepoError::serialization(format!("Invalid seed: {s}")))
            })
            .transpose()?;

        Ok(WorldStatus {
            id: parse_id(&row.try_get::<String, _>("id").map_err(get)?)?,
            world_id: parse_id(&row.try_get::<String, _>("world_id").map_err(get)?)?,
            engine_id: parse_id(&row.try_get::<String, _>("engine_id").map_err(get)?)?,
            is_default: row.try_get("is_default").map_err(get)?,
            status: status.parse().map_err(RepoError::serialization)?,
            last_viewed: parse_optional_millis(row.try_get("last_viewed_ms").map_err(get)?)?,
            server_start_ms: row.try_get("server_start_ms").map_err(get)?,
            seed,
        })
    }

    fn ensure_updated(
        rows_affected: u64,
        world_id: WorldId,
    ) -> Result<(), RepoError> {
        if rows_affected == 0 {
            return Err(RepoError::not_found("WorldStatus", world_id));
        }
        Ok(())
    }
}

#[async_trait]
impl WorldStatusRepo for SqliteWorldStatusRepo {
    async fn get_default(&self) -> Result<Option<WorldStatus>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE is_default = 1 LIMIT 1"))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_status.get_default", e))?;

        row.as_ref().map(Self::row_to_status).transpose()
    }

    async fn get_by_world(&self, world_id: WorldId) -> Result<Option<WorldStatus>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE world_id = ?"))
            .bind(world_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_status.get_by_world", e))?;

        row.as_ref().map(Self::row_to_status).transpose()
    }

    async fn list_all(&self) -> Result<Vec<WorldStatus>, RepoError> {
        let rows = sqlx::query(SELECT_COLUMNS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("world_status.list_all", e))?;

        rows.iter().map(Self::row_to_status).collect()
    }

    async fn insert(&self, status: &WorldStatus) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO world_status
                (id, world_id, engine_id, is_default, status, last_viewed_ms, server_start_ms, seed)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(status.id.to_string())
        .bind(status.world_id.to_string())
        .bind(status.engine_id.to_string())
        .bind(status.is_default)
        .bind(status.status.as_str())
        .bind(status.last_viewed.map(|t| t.timestamp_millis()))
        .bind(status.server_start_ms)
        .bind(status.seed.map(i64::from))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("world_status.insert", e))?;

        Ok(())
    }

    async fn set_server_start_if_absent(
        &self,
        world_id: WorldId,
        server_start_ms: i64,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE world_status
            SET server_start_ms = ?
            WHERE world_id = ? AND server_start_ms IS NULL
            "#,
        )
        .bind(server_start_ms)
        .bind(world_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("world_status.set_server_start", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_seed_if_absent(&self, world_id: WorldId, seed: u32) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE world_status
            SET seed = ?
            WHERE world_id = ? AND seed IS NULL
            "#,
        )
        .bind(i64::from(seed))
        .bind(world_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("world_status.set_seed", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_view(
        &self,
        world_id: WorldId,
        viewed_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let viewed_ms = viewed_at.timestamp_millis();
        let result = sqlx::query(
            r#"
            UPDATE world_status
            SET last_viewed_ms = MAX(COALESCE(last_viewed_ms, ?), ?)
            WHERE world_id = ?
            "#,
        )
        .bind(viewed_ms)
        .bind(viewed_ms)
        .bind(world_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("world_status.record_view", e))?;

        Self::ensure_updated(result.rows_affected(), world_id)
    }

    async fn transition_status(
        &self,
        world_id: WorldId,
        from: WorldStatusKind,
        to: WorldStatusKind,
    ) -> Result<bool, RepoError> {
        let result =
            sqlx::query("UPDATE world_status SET status = ? WHERE world_id = ? AND status = ?")
                .bind(to.as_str())
                .bind(world_id.to_string())
                .bind(from.as_str())
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::database("world_status.transition_status", e))?;

        Ok(result.rows_affected() > 0)
    }
}
