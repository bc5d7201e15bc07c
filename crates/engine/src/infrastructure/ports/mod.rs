//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - Engine control (the external tick engine's start/stop/kick commands)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{ConversationRepo, EngineRepo, InputRepo, WorldRepo, WorldStatusRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::EngineControlPort;

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{
    MockConversationRepo, MockEngineRepo, MockInputRepo, MockWorldRepo, MockWorldStatusRepo,
};

#[cfg(test)]
pub use external::MockEngineControlPort;

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{EngineControlError, RepoError};
