//! Engine entity - tick-progress record owned by the external tick loop

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::EngineId;

/// Tick progress of one world's engine.
///
/// `current_time` is advanced only by the tick engine. The lifecycle manager
/// reads it to detect stalls and flips `running` / `generation_number` through
/// the engine-control commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engine {
    pub id: EngineId,
    pub current_time: Option<DateTime<Utc>>,
    pub running: bool,
    pub generation_number: i64,
}

impl Engine {
    pub fn new(id: EngineId) -> Self {
        Self {
            id,
            current_time: None,
            running: false,
            generation_number: 0,
        }
    }

    /// An engine is stalled once it has missed at least two scheduled ticks,
    /// i.e. `current_time < now - 2 * action_duration`.
    ///
    /// An engine that has never ticked is not considered stalled.
    pub fn is_stalled(&self, now: DateTime<Utc>, action_duration: Duration) -> bool {
        match self.current_time {
            Some(current) => current < now - action_duration * 2,
            None => false,
        }
    }
}
