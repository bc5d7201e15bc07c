//! External service port traits (tick engine control).

use async_trait::async_trait;
use worldkeeper_domain::WorldId;

use super::error::EngineControlError;

/// Control commands for the external tick engine.
///
/// Every command must be idempotent on the engine side: the lifecycle manager
/// does not deduplicate across concurrent callers, so a duplicate start on an
/// already-running engine (or a stop on a stopped one) has to be a no-op.
/// Callers never wait for the engine to actually become live.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngineControlPort: Send + Sync {
    async fn start_engine(&self, world_id: WorldId) -> Result<(), EngineControlError>;
    async fn stop_engine(&self, world_id: WorldId) -> Result<(), EngineControlError>;
    /// Force the tick loop to restart, abandoning whatever run is wedged. A
    /// stopped engine whose world is still running is started again.
    async fn kick_engine(&self, world_id: WorldId) -> Result<(), EngineControlError>;
}
