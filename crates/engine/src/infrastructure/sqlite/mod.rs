//! SQLite database implementations.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::infrastructure::ports::RepoError;

mod helpers;
mod schema;

mod conversation_repo;
mod engine_control;
mod engine_repo;
mod input_repo;
mod world_repo;
mod world_status_repo;


pub use conversation_repo::SqliteConversationRepo;
pub use engine_control::SqliteEngineControl;
pub use engine_repo::SqliteEngineRepo;
pub use input_repo::SqliteInputRepo;
pub use schema::ensure_schema;
pub use world_repo::SqliteWorldRepo;
pub use world_status_repo::SqliteWorldStatusRepo;

/// Open (creating if needed) a file-backed database and ensure its schema.
pub async fn open(db_path: &str) -> Result<SqlitePool, RepoError> {
    let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .map_err(|e| RepoError::database("connect", e))?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database. Every connection to `:memory:` is a
/// separate database, so the pool must never grow past one.
pub async fn open_in_memory() -> Result<SqlitePool, RepoError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(|e| RepoError::database("connect", e))?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Create all SQLite repositories from a connection pool.
pub struct SqliteRepositories {
    pub world: Arc<SqliteWorldRepo>,
    pub world_status: Arc<SqliteWorldStatusRepo>,
    pub engine: Arc<SqliteEngineRepo>,
    pub input: Arc<SqliteInputRepo>,
    pub conversation: Arc<SqliteConversationRepo>,
    pub engine_control: Arc<SqliteEngineControl>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            world: Arc::new(SqliteWorldRepo::new(pool.clone())),
            world_status: Arc::new(SqliteWorldStatusRepo::new(pool.clone())),
            engine: Arc::new(SqliteEngineRepo::new(pool.clone())),
            input: Arc::new(SqliteInputRepo::new(pool.clone())),
            conversation: Arc::new(SqliteConversationRepo::new(pool.clone())),
            engine_control: Arc::new(SqliteEngineControl::new(pool)),
        }
    }
}
