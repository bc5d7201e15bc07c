//! Input records - commands queued for consumption by a world's tick engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::TilePoint;
use crate::{DomainError, EngineId, InputId, PlayerId};

/// An input appended to an engine's queue.
///
/// `number` is the insertion order within the store and is the only ordering
/// key the consumer may rely on. `returned` is written by the consumer once
/// the input has been processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub id: InputId,
    pub engine_id: EngineId,
    pub number: i64,
    pub name: String,
    pub args: Value,
    pub received_at: DateTime<Utc>,
    pub returned: Option<Value>,
}

/// Typed payloads for the inputs this service produces.
///
/// Serialized adjacently as `{"name": "...", "args": {...}}` which is exactly
/// the `(name, args)` pair stored in an [`InputRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "args", rename_all = "camelCase")]
pub enum WorldInput {
    #[serde(rename_all = "camelCase")]
    Join {
        name: String,
        character: String,
        description: String,
        token_identifier: String,
    },
    #[serde(rename_all = "camelCase")]
    Leave { player_id: PlayerId },
    #[serde(rename_all = "camelCase")]
    MoveTo {
        player_id: PlayerId,
        destination: Option<TilePoint>,
    },
}

impl WorldInput {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::MoveTo { .. } => "moveTo",
        }
    }

    /// Split into the stored `(name, args)` pair.
    pub fn into_parts(self) -> Result<(String, Value), DomainError> {
        let value =
            serde_json::to_value(&self).map_err(|e| DomainError::validation(e.to_string()))?;
        let args = value.get("args").cloned().unwrap_or(Value::Null);
        Ok((self.name().to_string(), args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_splits_into_camel_case_args() {
        let input = WorldInput::Join {
            name: "Me".into(),
            character: "f3".into(),
            description: "Me is a human player".into(),
            token_identifier: "Me".into(),
        };
        let (name, args) = input.into_parts().unwrap();
        assert_eq!(name, "join");
        assert_eq!(args["character"], "f3");
        assert_eq!(args["tokenIdentifier"], "Me");
    }

    #[test]
    fn move_to_keeps_destination_verbatim() {
        let player_id = PlayerId::new();
        let (name, args) = WorldInput::MoveTo {
            player_id,
            destination: Some(TilePoint { x: 12, y: -3 }),
        }
        .into_parts()
        .unwrap();

        assert_eq!(name, "moveTo");
        assert_eq!(args["playerId"], player_id.to_string());
        assert_eq!(args["destination"]["x"], 12);
        assert_eq!(args["destination"]["y"], -3);
    }

    #[test]
    fn move_to_without_destination_serializes_null() {
        let (_, args) = WorldInput::MoveTo {
            player_id: PlayerId::new(),
            destination: None,
        }
        .into_parts()
        .unwrap();
        assert!(args["destination"].is_null());
    }
}
