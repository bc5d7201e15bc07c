//! World status - the control-plane record for one world
//!
//! # Invariants
//!
//! - `server_start_ms` and `seed` are write-once-if-absent: they are filled the
//!   first time the status is read and never overwritten.
//! - `last_viewed` never moves backward.
//! - `StoppedByDeveloper` is terminal as far as automatic transitions go.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, EngineId, WorldId, WorldStatusId};

/// Lifecycle state of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorldStatusKind {
    Running,
    Inactive,
    StoppedByDeveloper,
}

impl WorldStatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Inactive => "inactive",
            Self::StoppedByDeveloper => "stoppedByDeveloper",
        }
    }
}

impl std::fmt::Display for WorldStatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorldStatusKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "inactive" => Ok(Self::Inactive),
            "stoppedByDeveloper" => Ok(Self::StoppedByDeveloper),
            other => Err(DomainError::parse(format!("Unknown world status: {}", other))),
        }
    }
}

/// Per-world control-plane record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldStatus {
    pub id: WorldStatusId,
    pub world_id: WorldId,
    pub engine_id: EngineId,
    pub is_default: bool,
    pub status: WorldStatusKind,
    pub last_viewed: Option<DateTime<Utc>>,
    pub server_start_ms: Option<i64>,
    pub seed: Option<u32>,
}

impl WorldStatus {
    pub fn new(world_id: WorldId, engine_id: EngineId) -> Self {
        Self {
            id: WorldStatusId::new(),
            world_id,
            engine_id,
            is_default: false,
            status: WorldStatusKind::Running,
            last_viewed: None,
            server_start_ms: None,
            seed: None,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_status(mut self, status: WorldStatusKind) -> Self {
        self.status = status;
        self
    }

    pub fn with_last_viewed(mut self, last_viewed: DateTime<Utc>) -> Self {
        self.last_viewed = Some(last_viewed);
        self
    }

    pub fn is_running(&self) -> bool {
        self.status == WorldStatusKind::Running
    }

    /// True when nobody has viewed the world within `idle_timeout`.
    ///
    /// A world that was never viewed counts as idle. The boundary is inclusive:
    /// a world last viewed exactly `idle_timeout` ago is idle.
    pub fn is_idle(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        let cutoff = now - idle_timeout;
        match self.last_viewed {
            Some(last_viewed) => last_viewed <= cutoff,
            None => true,
        }
    }

    /// Whether a heartbeat at `now` is worth a write.
    ///
    /// Views newer than half the heartbeat interval are skipped to keep frequent
    /// polling from turning every heartbeat into a write.
    pub fn needs_view_write(&self, now: DateTime<Utc>, heartbeat_interval: Duration) -> bool {
        match self.last_viewed {
            Some(last_viewed) => last_viewed < now - heartbeat_interval / 2,
            None => true,
        }
    }

    /// Milliseconds elapsed since the recorded server start, never negative.
    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        let start = self.server_start_ms.unwrap_or(now_ms);
        (now_ms - start).max(0)
    }
}

/// Seed derived from wall-clock time at first observation.
///
/// Always a non-negative 31-bit value.
pub fn seed_from_millis(now_ms: i64) -> u32 {
    (now_ms % 2_147_483_647).unsigned_abs() as u32
}
