//! World entity - one independently simulated instance and its roster

use serde::{Deserialize, Serialize};

use crate::{PlayerId, WorldId};

/// A player on a world's roster.
///
/// `human` carries the external identity token for human-controlled players;
/// agent-controlled players have `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub human: Option<String>,
}

impl Player {
    pub fn human(id: PlayerId, token: impl Into<String>) -> Self {
        Self {
            id,
            human: Some(token.into()),
        }
    }

    pub fn agent(id: PlayerId) -> Self {
        Self { id, human: None }
    }
}

/// A simulated world.
///
/// The roster is only mutated by the tick engine when it consumes join/leave
/// inputs; this crate reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    pub id: WorldId,
    pub players: Vec<Player>,
}

impl World {
    pub fn new(id: WorldId) -> Self {
        Self {
            id,
            players: Vec::new(),
        }
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.players.push(player);
        self
    }

    /// Find the roster entry controlled by the given identity token.
    pub fn find_human(&self, token: &str) -> Option<&Player> {
        self.players
            .iter()
            .find(|p| p.human.as_deref() == Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_human_matches_on_token_only() {
        let me = PlayerId::new();
        let world = World::new(WorldId::new())
            .with_player(Player::agent(PlayerId::new()))
            .with_player(Player::human(me, "Me"));

        assert_eq!(world.find_human("Me").map(|p| p.id), Some(me));
        assert!(world.find_human("someone-else").is_none());
    }

    #[test]
    fn agents_are_never_matched() {
        let world = World::new(WorldId::new()).with_player(Player::agent(PlayerId::new()));
        assert!(world.find_human("").is_none());
    }
}
