//! Conversation history use cases.

use std::sync::Arc;
use worldkeeper_domain::{ArchivedConversation, PlayerId, WorldId};

use crate::infrastructure::ports::ConversationRepo;
use crate::use_cases::lifecycle::LifecycleError;

/// Finds the most recent non-empty conversation a player took part in.
///
/// Empty conversations (no messages) are skipped. A participation record that
/// points at a missing archived conversation is an integrity error and is
/// surfaced, not skipped.
pub struct PreviousConversation {
    conversation_repo: Arc<dyn ConversationRepo>,
}

impl PreviousConversation {
    pub fn new(conversation_repo: Arc<dyn ConversationRepo>) -> Self {
        Self { conversation_repo }
    }

    pub async fn execute(
        &self,
        world_id: WorldId,
        player_id: PlayerId,
    ) -> Result<Option<ArchivedConversation>, LifecycleError> {
        let history = self
            .conversation_repo
            .list_participation_desc(world_id, player_id)
            .await?;

        for member in history {
            let conversation = self
                .conversation_repo
                .get_archived(world_id, member.conversation_id)
                .await?
                .ok_or(LifecycleError::DanglingConversationReference(
                    member.conversation_id,
                ))?;

            if !conversation.is_empty() {
                return Ok(Some(conversation));
            }
        }

        Ok(None)
    }
}
