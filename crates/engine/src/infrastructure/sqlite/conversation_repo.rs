//! SQLite-backed conversation history.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use worldkeeper_domain::{
    ArchivedConversation, ConversationId, ParticipationRecord, PlayerId, WorldId,
};

use super::helpers::{parse_id, parse_millis};
use crate::infrastructure::ports::{ConversationRepo, RepoError};

pub struct SqliteConversationRepo {
    pool: SqlitePool,
}

impl SqliteConversationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepo for SqliteConversationRepo {
    async fn list_participation_desc(
        &self,
        world_id: WorldId,
        player_id: PlayerId,
    ) -> Result<Vec<ParticipationRecord>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT world_id, player1, player2, conversation_id, ended_ms
            FROM participated_together
            WHERE world_id = ? AND player1 = ?
            ORDER BY ended_ms DESC
            "#,
        )
        .bind(world_id.to_string())
        .bind(player_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("conversation.list_participation", e))?;

        let decode = |e: sqlx::Error| RepoError::database("conversation.decode", e);
        rows.iter()
            .map(|row| -> Result<ParticipationRecord, RepoError> {
                Ok(ParticipationRecord {
                    world_id: parse_id(&row.try_get::<String, _>("world_id").map_err(decode)?)?,
                    player1: parse_id(&row.try_get::<String, _>("player1").map_err(decode)?)?,
                    player2: parse_id(&row.try_get::<String, _>("player2").map_err(decode)?)?,
                    conversation_id: parse_id(
                        &row.try_get::<String, _>("conversation_id").map_err(decode)?,
                    )?,
                    ended: parse_millis(row.try_get("ended_ms").map_err(decode)?)?,
                })
            })
            .collect()
    }

    async fn get_archived(
        &self,
        world_id: WorldId,
        id: ConversationId,
    ) -> Result<Option<ArchivedConversation>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT id, world_id, creator, created_ms, ended_ms, num_messages, participants_json
            FROM archived_conversations
            WHERE world_id = ? AND id = ?
            "#,
        )
        .bind(world_id.to_string())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("conversation.get_archived", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = |e: sqlx::Error| RepoError::database("conversation.decode", e);
        let participants_json: String = row.try_get("participants_json").map_err(decode)?;
        let num_messages: i64 = row.try_get("num_messages").map_err(decode)?;

        Ok(Some(ArchivedConversation {
            id: parse_id(&row.try_get::<String, _>("id").map_err(decode)?)?,
            world_id: parse_id(&row.try_get::<String, _>("world_id").map_err(decode)?)?,
            creator: parse_id(&row.try_get::<String, _>("creator").map_err(decode)?)?,
            created: parse_millis(row.try_get("created_ms").map_err(decode)?)?,
            ended: parse_millis(row.try_get("ended_ms").map_err(decode)?)?,
            num_messages: u32::try_from(num_messages).map_err(RepoError::serialization)?,
            participants: serde_json::from_str(&participants_json)
                .map_err(RepoError::serialization)?,
        }))
    }

    async fn save_participation(&self, record: &ParticipationRecord) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO participated_together
                (world_id, player1, player2, conversation_id, ended_ms)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.world_id.to_string())
        .bind(record.player1.to_string())
        .bind(record.player2.to_string())
        .bind(record.conversation_id.to_string())
        .bind(record.ended.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("conversation.save_participation", e))?;

        Ok(())
    }

    async fn save_archived(&self, conversation: &ArchivedConversation) -> Result<(), RepoError> {
        let participants_json =
            serde_json::to_string(&conversation.participants).map_err(RepoError::serialization)?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO archived_conversations
                (id, world_id, creator, created_ms, ended_ms, num_messages, participants_json)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(conversation.id.to_string())
        .bind(conversation.world_id.to_string())
        .bind(conversation.creator.to_string())
        .bind(conversation.created.timestamp_millis())
        .bind(conversation.ended.timestamp_millis())
        .bind(i64::from(conversation.num_messages))
        .bind(&participants_json)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("conversation.save_archived", e))?;

        Ok(())
    }
}
