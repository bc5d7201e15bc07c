//! World lifecycle use cases.
//!
//! Handles the control plane of every world:
//! - Reading and lazily initializing the default world's status
//! - Viewer heartbeats (and resurrecting idle worlds)
//! - The idle-stop and dead-engine sweeps

use std::sync::Arc;

use worldkeeper_domain::{ConversationId, EngineId, WorldId};

use crate::infrastructure::ports::{EngineControlError, RepoError};

mod heartbeat;
mod monitor;
mod status;
mod store;

pub use heartbeat::{HeartbeatOutcome, HeartbeatWorld};
pub use monitor::{RestartDeadWorlds, StopInactiveWorlds, SweepReport};
pub use status::{DefaultWorldStatus, WorldStatusView};
pub use store::WorldStatusStore;

/// Container for lifecycle use cases.
pub struct LifecycleUseCases {
    pub store: Arc<WorldStatusStore>,
    pub default_status: Arc<DefaultWorldStatus>,
    pub heartbeat: Arc<HeartbeatWorld>,
    pub stop_inactive: Arc<StopInactiveWorlds>,
    pub restart_dead: Arc<RestartDeadWorlds>,
}

impl LifecycleUseCases {
    pub fn new(
        store: Arc<WorldStatusStore>,
        default_status: Arc<DefaultWorldStatus>,
        heartbeat: Arc<HeartbeatWorld>,
        stop_inactive: Arc<StopInactiveWorlds>,
        restart_dead: Arc<RestartDeadWorlds>,
    ) -> Self {
        Self {
            store,
            default_status,
            heartbeat,
            stop_inactive,
            restart_dead,
        }
    }
}

/// Errors surfaced by lifecycle, input and history operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// No world status is flagged as the default world.
    #[error("No default world configured")]
    NoDefaultWorld,
    #[error("Unknown world: {0}")]
    UnknownWorld(WorldId),
    #[error("Invalid engine reference: {0}")]
    InvalidEngineReference(EngineId),
    #[error("Participation record points at missing conversation: {0}")]
    DanglingConversationReference(ConversationId),
    #[error(transparent)]
    EngineControl(#[from] EngineControlError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl LifecycleError {
    /// Referential-integrity violations: corrupted state a retry cannot fix.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidEngineReference(_) | Self::DanglingConversationReference(_)
        )
    }
}
