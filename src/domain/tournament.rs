use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::TournamentConfig;
use crate::domain::player::{Player, PlayerId};
use crate::domain::round::{Round, UnorderedPair};
use crate::domain::tiebreak::TiebreakKind;

/// One manual reassignment (§4.3), recorded so the history of overrides
/// survives a serialize/deserialize round trip. `original_opponent` is
/// `None` when the player being moved was the round's bye.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub player: PlayerId,
    pub original_opponent: Option<PlayerId>,
}

/// The tournament's full in-memory state (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub name: String,
    pub num_rounds: u32,
    pub tiebreak_order: Vec<TiebreakKind>,
    pub players: HashMap<PlayerId, Player>,
    pub rounds: Vec<Round>,
    pub previous_matches: HashSet<UnorderedPair>,
    pub manual_overrides: HashMap<usize, Vec<ManualOverride>>,
    #[serde(default)]
    pub config: TournamentConfig,
}

impl Tournament {
    pub fn new(
        name: impl Into<String>,
        players: Vec<Player>,
        num_rounds: u32,
        tiebreak_order: Vec<TiebreakKind>,
    ) -> Self {
        let config = TournamentConfig::default();
        let tiebreak_order = if tiebreak_order.is_empty() {
            config.default_tiebreak_order.clone()
        } else {
            tiebreak_order
        };
        let mut tournament = Tournament {
            name: name.into(),
            num_rounds,
            tiebreak_order,
            players: HashMap::new(),
            rounds: Vec::new(),
            previous_matches: HashSet::new(),
            manual_overrides: HashMap::new(),
            config,
        };
        for player in players {
            tournament.players.insert(player.id.clone(), player);
        }
        tournament
    }

    pub fn active_players(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.values().filter(|p| p.is_active).collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        players
    }

    pub fn current_round(&self) -> usize {
        self.rounds.len()
    }
}
