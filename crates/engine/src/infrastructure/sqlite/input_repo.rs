//! SQLite input queue.
//!
//! Append-only from this crate's side. The autoincrement `number` column is
//! the sole ordering key, so inputs appended within the same millisecond keep
//! their insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use worldkeeper_domain::{EngineId, InputId, InputRecord};

use super::helpers::{parse_id, parse_millis};
use crate::infrastructure::ports::{InputRepo, RepoError};

const SELECT_COLUMNS: &str = "SELECT number, id, engine_id, name, args_json, \
     received_at_ms, returned_json FROM inputs";

pub struct SqliteInputRepo {
    pool: SqlitePool,
}

impl SqliteInputRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &SqliteRow) -> Result<InputRecord, RepoError> {
        let decode = |e: sqlx::Error| RepoError::database("input.decode", e);

        let args_json: String = row.try_get("args_json").map_err(decode)?;
        let returned_json: Option<String> = row.try_get("returned_json").map_err(decode)?;

        Ok(InputRecord {
            id: parse_id(&row.try_get::<String, _>("id").map_err(decode)?)?,
            engine_id: parse_id(&row.try_get::<String, _>("engine_id").map_err(decode)?)?,
            number: row.try_get("number").map_err(decode)?,
            name: row.try_get("name").map_err(decode)?,
            args: serde_json::from_str(&args_json).map_err(RepoError::serialization)?,
            received_at: parse_millis(row.try_get("received_at_ms").map_err(decode)?)?,
            returned: returned_json
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .map_err(RepoError::serialization)?,
        })
    }
}

#[async_trait]
impl InputRepo for SqliteInputRepo {
    async fn append(
        &self,
        engine_id: EngineId,
        name: &str,
        args: &Value,
        received_at: DateTime<Utc>,
    ) -> Result<InputRecord, RepoError> {
        let id = InputId::new();
        let args_json = serde_json::to_string(args).map_err(RepoError::serialization)?;

        let result = sqlx::query(
            r#"
            INSERT INTO inputs (id, engine_id, name, args_json, received_at_ms)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(engine_id.to_string())
        .bind(name)
        .bind(&args_json)
        .bind(received_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("input.append", e))?;

        let number = result.last_insert_rowid();
        tracing::debug!(input_id = %id, engine_id = %engine_id, number, name, "Input appended");

        Ok(InputRecord {
            id,
            engine_id,
            number,
            name: name.to_string(),
            args: args.clone(),
            received_at,
            returned: None,
        })
    }

    async fn get(&self, id: InputId) -> Result<Option<InputRecord>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("input.get", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn list_pending(&self, engine_id: EngineId) -> Result<Vec<InputRecord>, RepoError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE engine_id = ? AND returned_json IS NULL ORDER BY number"
        ))
        .bind(engine_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("input.list_pending", e))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn mark_returned(&self, id: InputId, returned: &Value) -> Result<bool, RepoError> {
        let returned_json = serde_json::to_string(returned).map_err(RepoError::serialization)?;

        let result = sqlx::query(
            "UPDATE inputs SET returned_json = ? WHERE id = ? AND returned_json IS NULL",
        )
        .bind(&returned_json)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("input.mark_returned", e))?;

        Ok(result.rows_affected() > 0)
    }
}
