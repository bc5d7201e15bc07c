//! SQLite-backed engine records.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use worldkeeper_domain::{Engine, EngineId};

use super::helpers::{parse_id, parse_optional_millis};
use crate::infrastructure::ports::{EngineRepo, RepoError};

pub struct SqliteEngineRepo {
    pool: SqlitePool,
}

impl SqliteEngineRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EngineRepo for SqliteEngineRepo {
    async fn get(&self, id: EngineId) -> Result<Option<Engine>, RepoError> {
        let row = sqlx::query(
            "SELECT id, current_time_ms, running, generation_number FROM engines WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("engine.get", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = |e: sqlx::Error| RepoError::database("engine.decode", e);
        Ok(Some(Engine {
            id: parse_id(&row.try_get::<String, _>("id").map_err(decode)?)?,
            current_time: parse_optional_millis(row.try_get("current_time_ms").map_err(decode)?)?,
            running: row.try_get("running").map_err(decode)?,
            generation_number: row.try_get("generation_number").map_err(decode)?,
        }))
    }

    async fn save(&self, engine: &Engine) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO engines (id, current_time_ms, running, generation_number)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                current_time_ms = excluded.current_time_ms,
                running = excluded.running,
                generation_number = excluded.generation_number
            "#,
        )
        .bind(engine.id.to_string())
        .bind(engine.current_time.map(|t| t.timestamp_millis()))
        .bind(engine.running)
        .bind(engine.generation_number)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("engine.save", e))?;

        Ok(())
    }
}
