//! Conversation history records written by the tick engine when a
//! conversation ends. Read-only from the lifecycle manager's side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConversationId, PlayerId, WorldId};

/// One row per (world, player pair, conversation).
///
/// Looked up by `(world_id, player1)` in descending `ended` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationRecord {
    pub world_id: WorldId,
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub conversation_id: ConversationId,
    pub ended: DateTime<Utc>,
}

/// A finished conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedConversation {
    pub id: ConversationId,
    pub world_id: WorldId,
    pub creator: PlayerId,
    pub created: DateTime<Utc>,
    pub ended: DateTime<Utc>,
    pub num_messages: u32,
    pub participants: Vec<PlayerId>,
}

impl ArchivedConversation {
    pub fn is_empty(&self) -> bool {
        self.num_messages == 0
    }
}
