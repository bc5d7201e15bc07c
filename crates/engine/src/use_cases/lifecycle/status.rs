//! Default world status view for presentation clients.

use serde::Serialize;
use std::sync::Arc;
use worldkeeper_domain::{
    seed_from_millis, AmbientSignal, EngineId, WorldId, WorldStatusKind, DISPLAYED_CREATURES,
};

use super::{LifecycleError, WorldStatusStore};

/// Status of the default world plus everything a client needs to derive the
/// ambient signal locally and anchor its clock to the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldStatusView {
    pub world_id: WorldId,
    pub engine_id: EngineId,
    pub status: WorldStatusKind,
    pub is_default: bool,
    pub last_viewed: Option<i64>,
    pub server_start_ms: Option<i64>,
    pub seed: Option<u32>,
    pub elapsed_ms: i64,
    pub creatures: u32,
    pub activity: u32,
    pub breath: u32,
    pub intensity: u32,
    pub breath_values: Vec<u32>,
    pub intensity_values: Vec<u32>,
    pub server_now_ms: i64,
}

pub struct DefaultWorldStatus {
    store: Arc<WorldStatusStore>,
}

impl DefaultWorldStatus {
    pub fn new(store: Arc<WorldStatusStore>) -> Self {
        Self { store }
    }

    /// Read the default world, filling its server start and seed on first read.
    pub async fn execute(&self) -> Result<WorldStatusView, LifecycleError> {
        let status = self.store.get_default().await?;
        let status = self.store.ensure_server_start(status).await?;
        let status = self.store.ensure_seed(status).await?;

        let now_ms = self.store.now().timestamp_millis();
        // A seed that could be neither written nor re-read is derived from now.
        let seed = status.seed.unwrap_or_else(|| seed_from_millis(now_ms));
        let signal = AmbientSignal::generate(seed, now_ms);

        Ok(WorldStatusView {
            world_id: status.world_id,
            engine_id: status.engine_id,
            status: status.status,
            is_default: status.is_default,
            last_viewed: status.last_viewed.map(|t| t.timestamp_millis()),
            server_start_ms: status.server_start_ms,
            seed: status.seed,
            elapsed_ms: status.elapsed_ms(now_ms),
            creatures: DISPLAYED_CREATURES,
            activity: signal.activity,
            breath: signal.breath(),
            intensity: signal.intensity(),
            breath_values: signal.breath_values,
            intensity_values: signal.intensity_values,
            server_now_ms: now_ms,
        })
    }
}
