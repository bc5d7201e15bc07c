//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific area of the world lifecycle.
//! Use cases orchestrate across ports to fulfill one request or one sweep.

pub mod history;
pub mod input;
pub mod lifecycle;
pub mod world;

// Re-export main types
pub use history::PreviousConversation;
pub use input::InputUseCases;
pub use lifecycle::{LifecycleError, LifecycleUseCases};
pub use world::WorldUseCases;
