//! Domain entities - Core business objects with identity

mod conversation;
mod engine;
mod input;
mod world;
mod world_status;

pub use conversation::{ArchivedConversation, ParticipationRecord};
pub use engine::Engine;
pub use input::{InputRecord, WorldInput};
pub use world::{Player, World};
pub use world_status::{seed_from_millis, WorldStatus, WorldStatusKind};
