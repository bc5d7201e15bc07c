//! SQLite schema initialization - tables and indexes.

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

/// Timestamps are stored as epoch milliseconds so that `MAX()` and range
/// comparisons happen in SQL.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS worlds (
        id TEXT PRIMARY KEY
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS world_players (
        world_id TEXT NOT NULL,
        player_id TEXT NOT NULL,
        human TEXT,
        position INTEGER NOT NULL,
        PRIMARY KEY (world_id, player_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS world_status (
        id TEXT PRIMARY KEY,
        world_id TEXT NOT NULL UNIQUE,
        engine_id TEXT NOT NULL,
        is_default INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL,
        last_viewed_ms INTEGER,
        server_start_ms INTEGER,
        seed INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS engines (
        id TEXT PRIMARY KEY,
        current_time_ms INTEGER,
        running INTEGER NOT NULL DEFAULT 0,
        generation_number INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inputs (
        number INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        engine_id TEXT NOT NULL,
        name TEXT NOT NULL,
        args_json TEXT NOT NULL,
        received_at_ms INTEGER NOT NULL,
        returned_json TEXT
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_inputs_engine
    ON inputs(engine_id, number)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS participated_together (
        world_id TEXT NOT NULL,
        player1 TEXT NOT NULL,
        player2 TEXT NOT NULL,
        conversation_id TEXT NOT NULL,
        ended_ms INTEGER NOT NULL,
        PRIMARY KEY (world_id, player1, conversation_id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_player_history
    ON participated_together(world_id, player1, ended_ms)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS archived_conversations (
        id TEXT PRIMARY KEY,
        world_id TEXT NOT NULL,
        creator TEXT NOT NULL,
        created_ms INTEGER NOT NULL,
        ended_ms INTEGER NOT NULL,
        num_messages INTEGER NOT NULL,
        participants_json TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_archived_world
    ON archived_conversations(world_id, id)
    "#,
];

/// Initialize the schema. Every statement is `IF NOT EXISTS`, so this is safe
/// to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }

    tracing::info!("SQLite schema initialized (tables and indexes ensured)");
    Ok(())
}
