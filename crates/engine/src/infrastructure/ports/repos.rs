//! Repository port traits for database access.
//!
//! Every mutation is a targeted field patch so that concurrent, unrelated
//! writes to the same row (a heartbeat touching `last_viewed` while a sweep
//! touches `status`) cannot clobber each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use worldkeeper_domain::*;

use super::error::RepoError;

// =============================================================================
// World Status (control plane)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorldStatusRepo: Send + Sync {
    /// The single row flagged `is_default`, if any.
    async fn get_default(&self) -> Result<Option<WorldStatus>, RepoError>;
    async fn get_by_world(&self, world_id: WorldId) -> Result<Option<WorldStatus>, RepoError>;
    async fn list_all(&self) -> Result<Vec<WorldStatus>, RepoError>;
    async fn insert(&self, status: &WorldStatus) -> Result<(), RepoError>;

    /// Write `server_start_ms` only if it is still unset.
    ///
    /// Returns `true` when this call performed the write.
    async fn set_server_start_if_absent(
        &self,
        world_id: WorldId,
        server_start_ms: i64,
    ) -> Result<bool, RepoError>;

    /// Write `seed` only if it is still unset.
    ///
    /// Returns `true` when this call performed the write.
    async fn set_seed_if_absent(&self, world_id: WorldId, seed: u32) -> Result<bool, RepoError>;

    /// `last_viewed = max(last_viewed, viewed_at)`.
    async fn record_view(
        &self,
        world_id: WorldId,
        viewed_at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    /// Compare-and-set on `status`: move from `from` to `to` only if the row
    /// is still in `from`.
    ///
    /// Returns `true` when this call changed the row.
    async fn transition_status(
        &self,
        world_id: WorldId,
        from: WorldStatusKind,
        to: WorldStatusKind,
    ) -> Result<bool, RepoError>;
}

// =============================================================================
// Worlds and engines
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorldRepo: Send + Sync {
    async fn get(&self, id: WorldId) -> Result<Option<World>, RepoError>;
    async fn save(&self, world: &World) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngineRepo: Send + Sync {
    async fn get(&self, id: EngineId) -> Result<Option<Engine>, RepoError>;
    async fn save(&self, engine: &Engine) -> Result<(), RepoError>;
}

// =============================================================================
// Input Queue
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InputRepo: Send + Sync {
    /// Append an input. The returned record carries its insertion number.
    async fn append(
        &self,
        engine_id: EngineId,
        name: &str,
        args: &Value,
        received_at: DateTime<Utc>,
    ) -> Result<InputRecord, RepoError>;

    async fn get(&self, id: InputId) -> Result<Option<InputRecord>, RepoError>;

    /// Unconsumed inputs for an engine, in insertion order.
    async fn list_pending(&self, engine_id: EngineId) -> Result<Vec<InputRecord>, RepoError>;

    /// Consumer side: record the result of processing an input.
    ///
    /// Returns `false` if the input was already consumed.
    async fn mark_returned(&self, id: InputId, returned: &Value) -> Result<bool, RepoError>;
}

// =============================================================================
// Conversation History
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationRepo: Send + Sync {
    /// Participation rows for `(world_id, player1 = player_id)`, newest `ended` first.
    async fn list_participation_desc(
        &self,
        world_id: WorldId,
        player_id: PlayerId,
    ) -> Result<Vec<ParticipationRecord>, RepoError>;

    async fn get_archived(
        &self,
        world_id: WorldId,
        id: ConversationId,
    ) -> Result<Option<ArchivedConversation>, RepoError>;

    async fn save_participation(&self, record: &ParticipationRecord) -> Result<(), RepoError>;
    async fn save_archived(&self, conversation: &ArchivedConversation) -> Result<(), RepoError>;
}
