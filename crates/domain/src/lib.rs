//! Worldkeeper domain.
//!
//! Pure types for the world lifecycle: ids, the world status control record,
//! engine tick progress, queued inputs, conversation history and the
//! deterministic ambient signal. No I/O lives here.

pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    seed_from_millis, ArchivedConversation, Engine, InputRecord, ParticipationRecord, Player,
    World, WorldInput, WorldStatus, WorldStatusKind,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{ConversationId, EngineId, InputId, PlayerId, WorldId, WorldStatusId};

pub use value_objects::{
    AmbientSignal, CharacterSkin, TilePoint, CHARACTER_SKINS, DEFAULT_NAME, DISPLAYED_CREATURES,
    HUMAN_DESCRIPTION_SUFFIX,
};
