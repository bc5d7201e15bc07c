//! SQLite-backed world rosters.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use worldkeeper_domain::{Player, World, WorldId};

use super::helpers::parse_id;
use crate::infrastructure::ports::{RepoError, WorldRepo};

pub struct SqliteWorldRepo {
    pool: SqlitePool,
}

impl SqliteWorldRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorldRepo for SqliteWorldRepo {
    async fn get(&self, id: WorldId) -> Result<Option<World>, RepoError> {
        let exists = sqlx::query("SELECT id FROM worlds WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("world.get", e))?;

        if exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query(
            "SELECT player_id, human FROM world_players WHERE world_id = ? ORDER BY position",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("world.get_players", e))?;

        let mut world = World::new(id);
        for row in rows {
            let player_id: String = row
                .try_get("player_id")
                .map_err(|e| RepoError::database("world.decode", e))?;
            let human: Option<String> = row
                .try_get("human")
                .map_err(|e| RepoError::database("world.decode", e))?;
            world.players.push(Player {
                id: parse_id(&player_id)?,
                human,
            });
        }

        Ok(Some(world))
    }

    /// Replace the world's roster.
    async fn save(&self, world: &World) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("world.save", e))?;

        sqlx::query("INSERT OR IGNORE INTO worlds (id) VALUES (?)")
            .bind(world.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("world.save", e))?;

        sqlx::query("DELETE FROM world_players WHERE world_id = ?")
            .bind(world.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("world.save", e))?;

        for (position, player) in world.players.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO world_players (world_id, player_id, human, position)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(world.id.to_string())
            .bind(player.id.to_string())
            .bind(player.human.as_deref())
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("world.save", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("world.save", e))?;

        Ok(())
    }
}
