//! Tournament persistence (§6): converts the in-memory model to and from
//! the stable, version-independent dictionary shape documented in §6,
//! the way `pawn::service::settings` keeps its on-disk shape decoupled
//! from whatever internal structs happen to back it at runtime.
//!
//! The internal [`Player`] keeps one combined `Vec<RoundRecord>`
//! (REDESIGN FLAGS, §9), but the persisted format is the original's
//! three parallel sequences (`results`, `opponent_ids`, `color_history`)
//! plus the `"none"` sentinel for a bye slot. [`PlayerDto`] and
//! [`TournamentDto`] are the conversion layer that bridges the two
//! shapes; callers never see them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::common::error::TournamentError;
use crate::config::TournamentConfig;
use crate::domain::color::{Color, ColorSlot};
use crate::domain::player::{OpponentSlot, Player, PlayerId, RoundRecord};
use crate::domain::round::{Pairing, Round, UnorderedPair};
use crate::domain::tiebreak::{TiebreakKind, TiebreakValues};
use crate::domain::tournament::{ManualOverride, Tournament};

const BYE_SENTINEL: &str = "none";

fn opponent_to_wire(opponent: &OpponentSlot) -> String {
    match opponent {
        OpponentSlot::Player(id) => id.0.clone(),
        OpponentSlot::Bye => BYE_SENTINEL.to_string(),
    }
}

fn opponent_from_wire(raw: &str) -> OpponentSlot {
    if raw == BYE_SENTINEL {
        OpponentSlot::Bye
    } else {
        OpponentSlot::Player(PlayerId::from(raw.to_string()))
    }
}

fn color_to_wire(color: &ColorSlot) -> String {
    match color {
        ColorSlot::Color(Color::White) => "white".to_string(),
        ColorSlot::Color(Color::Black) => "black".to_string(),
        ColorSlot::None => BYE_SENTINEL.to_string(),
    }
}

fn color_from_wire(raw: &str) -> Result<ColorSlot, TournamentError> {
    match raw {
        "white" => Ok(ColorSlot::Color(Color::White)),
        "black" => Ok(ColorSlot::Color(Color::Black)),
        BYE_SENTINEL => Ok(ColorSlot::None),
        other => Err(TournamentError::InvalidPersistedState(format!(
            "unrecognized color {other:?} in color_history"
        ))),
    }
}

fn bye_to_wire(bye: &Option<PlayerId>) -> String {
    match bye {
        Some(id) => id.0.clone(),
        None => BYE_SENTINEL.to_string(),
    }
}

fn bye_from_wire(raw: &str) -> Option<PlayerId> {
    if raw == BYE_SENTINEL {
        None
    } else {
        Some(PlayerId::from(raw.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PlayerDto {
    id: PlayerId,
    name: String,
    rating: i32,
    is_active: bool,
    results: Vec<f64>,
    opponent_ids: Vec<String>,
    color_history: Vec<String>,
    float_history: Vec<u32>,
    running_scores: Vec<f64>,
    has_received_bye: bool,
    num_black_games: u32,
}

impl From<&Player> for PlayerDto {
    fn from(player: &Player) -> Self {
        let mut results = Vec::with_capacity(player.history.len());
        let mut opponent_ids = Vec::with_capacity(player.history.len());
        let mut color_history = Vec::with_capacity(player.history.len());
        for record in &player.history {
            results.push(record.result);
            opponent_ids.push(opponent_to_wire(&record.opponent));
            color_history.push(color_to_wire(&record.color));
        }
        PlayerDto {
            id: player.id.clone(),
            name: player.name.clone(),
            rating: player.rating,
            is_active: player.is_active,
            results,
            opponent_ids,
            color_history,
            float_history: player.float_history.clone(),
            running_scores: player.running_scores.clone(),
            has_received_bye: player.has_received_bye,
            num_black_games: player.num_black_games,
        }
    }
}

impl TryFrom<PlayerDto> for Player {
    type Error = TournamentError;

    /// Rebuilds a player's combined history from the three wire
    /// sequences. `tiebreakers` isn't part of the persisted shape — it's
    /// derived state, recomputed by the caller via `compute_tiebreakers`
    /// rather than round-tripped.
    fn try_from(dto: PlayerDto) -> Result<Self, Self::Error> {
        if dto.results.len() != dto.opponent_ids.len() || dto.results.len() != dto.color_history.len()
        {
            return Err(TournamentError::InvalidPersistedState(format!(
                "player {:?} has mismatched results/opponent_ids/color_history lengths",
                dto.id
            )));
        }

        let mut history = Vec::with_capacity(dto.results.len());
        for ((result, opponent), color) in dto
            .results
            .into_iter()
            .zip(dto.opponent_ids.iter())
            .zip(dto.color_history.iter())
        {
            history.push(RoundRecord {
                opponent: opponent_from_wire(opponent),
                result,
                color: color_from_wire(color)?,
            });
        }

        Ok(Player {
            id: dto.id,
            name: dto.name,
            rating: dto.rating,
            is_active: dto.is_active,
            history,
            has_received_bye: dto.has_received_bye,
            float_history: dto.float_history,
            running_scores: dto.running_scores,
            num_black_games: dto.num_black_games,
            tiebreakers: TiebreakValues::new(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ManualOverrideDto {
    player: PlayerId,
    original_opponent: String,
}

impl From<&ManualOverride> for ManualOverrideDto {
    fn from(entry: &ManualOverride) -> Self {
        ManualOverrideDto {
            player: entry.player.clone(),
            original_opponent: bye_to_wire(&entry.original_opponent),
        }
    }
}

impl From<ManualOverrideDto> for ManualOverride {
    fn from(dto: ManualOverrideDto) -> Self {
        ManualOverride {
            player: dto.player,
            original_opponent: bye_from_wire(&dto.original_opponent),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TournamentDto {
    name: String,
    players: Vec<PlayerDto>,
    num_rounds: u32,
    tiebreak_order: Vec<TiebreakKind>,
    rounds_pairings_ids: Vec<Vec<(PlayerId, PlayerId)>>,
    rounds_byes_ids: Vec<String>,
    previous_matches: Vec<(PlayerId, PlayerId)>,
    manual_pairings: HashMap<String, Vec<ManualOverrideDto>>,
    #[serde(default)]
    config: TournamentConfig,
}

impl From<&Tournament> for TournamentDto {
    fn from(tournament: &Tournament) -> Self {
        let mut players: Vec<PlayerDto> = tournament.players.values().map(PlayerDto::from).collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));

        let rounds_pairings_ids = tournament
            .rounds
            .iter()
            .map(|round| {
                round
                    .pairings
                    .iter()
                    .map(|p| (p.white.clone(), p.black.clone()))
                    .collect()
            })
            .collect();
        let rounds_byes_ids = tournament.rounds.iter().map(|round| bye_to_wire(&round.bye)).collect();

        let mut previous_matches: Vec<(PlayerId, PlayerId)> = tournament
            .previous_matches
            .iter()
            .map(|pair| {
                let (a, b) = pair.ids();
                (a.clone(), b.clone())
            })
            .collect();
        previous_matches.sort();

        let mut manual_pairings: HashMap<String, Vec<ManualOverrideDto>> = HashMap::new();
        for (round_index, overrides) in &tournament.manual_overrides {
            manual_pairings.insert(
                round_index.to_string(),
                overrides.iter().map(ManualOverrideDto::from).collect(),
            );
        }

        TournamentDto {
            name: tournament.name.clone(),
            players,
            num_rounds: tournament.num_rounds,
            tiebreak_order: tournament.tiebreak_order.clone(),
            rounds_pairings_ids,
            rounds_byes_ids,
            previous_matches,
            manual_pairings,
            config: tournament.config.clone(),
        }
    }
}

impl TryFrom<TournamentDto> for Tournament {
    type Error = TournamentError;

    fn try_from(dto: TournamentDto) -> Result<Self, Self::Error> {
        if dto.rounds_pairings_ids.len() != dto.rounds_byes_ids.len() {
            return Err(TournamentError::InvalidPersistedState(
                "rounds_pairings_ids and rounds_byes_ids have different lengths".to_string(),
            ));
        }

        let mut players = HashMap::with_capacity(dto.players.len());
        for player_dto in dto.players {
            let player = Player::try_from(player_dto)?;
            players.insert(player.id.clone(), player);
        }

        let rounds = dto
            .rounds_pairings_ids
            .into_iter()
            .zip(dto.rounds_byes_ids.iter())
            .map(|(pairings, bye)| Round {
                pairings: pairings
                    .into_iter()
                    .map(|(white, black)| Pairing::new(white, black))
                    .collect(),
                bye: bye_from_wire(bye),
            })
            .collect();

        let previous_matches = dto
            .previous_matches
            .into_iter()
            .map(|(a, b)| UnorderedPair::new(a, b))
            .collect();

        let mut manual_overrides = HashMap::with_capacity(dto.manual_pairings.len());
        for (round_index, overrides) in dto.manual_pairings {
            let round_index: usize = round_index.parse().map_err(|_| {
                TournamentError::InvalidPersistedState(format!(
                    "manual_pairings key {round_index:?} is not a round index"
                ))
            })?;
            manual_overrides.insert(
                round_index,
                overrides.into_iter().map(ManualOverride::from).collect(),
            );
        }

        Ok(Tournament {
            name: dto.name,
            num_rounds: dto.num_rounds,
            tiebreak_order: dto.tiebreak_order,
            players,
            rounds,
            previous_matches,
            manual_overrides,
            config: dto.config,
        })
    }
}

pub fn serialize(tournament: &Tournament) -> Result<String, TournamentError> {
    let dto = TournamentDto::from(tournament);
    Ok(serde_json::to_string_pretty(&dto)?)
}

pub fn deserialize(data: &str) -> Result<Tournament, TournamentError> {
    let dto: TournamentDto = serde_json::from_str(data)?;
    Tournament::try_from(dto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::PlayerId;
    use crate::domain::tiebreak::TiebreakKind;

    #[test]
    fn round_trips_a_populated_tournament() {
        let players = vec![
            Player::new(PlayerId::from("a"), "Alice", 2000),
            Player::new(PlayerId::from("b"), "Bob", 1900),
        ];
        let tournament = Tournament::new("Demo", players, 4, vec![TiebreakKind::Solkoff]);

        let json = serialize(&tournament).unwrap();
        let restored = deserialize(&json).unwrap();

        assert_eq!(restored.name, tournament.name);
        assert_eq!(restored.players.len(), 2);
        assert_eq!(restored.num_rounds, 4);
    }

    #[test]
    fn rejects_malformed_input() {
        let err = deserialize("not json").unwrap_err();
        assert!(matches!(err, TournamentError::Serde(_)));
    }

    #[test]
    fn wire_shape_matches_the_documented_dictionary() {
        let alice = Player::new(PlayerId::from("a"), "Alice", 2000);
        let bob = Player::new(PlayerId::from("b"), "Bob", 1900);
        let mut tournament = Tournament::new("Demo", vec![alice, bob], 2, vec![TiebreakKind::Solkoff]);
        tournament.rounds.push(Round {
            pairings: vec![Pairing::new(PlayerId::from("a"), PlayerId::from("b"))],
            bye: None,
        });
        record_game(&mut tournament);

        let json = serialize(&tournament).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "name",
            "players",
            "num_rounds",
            "tiebreak_order",
            "rounds_pairings_ids",
            "rounds_byes_ids",
            "previous_matches",
            "manual_pairings",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }

        let player = &value["players"][0];
        for key in [
            "id",
            "name",
            "rating",
            "is_active",
            "results",
            "opponent_ids",
            "color_history",
            "float_history",
            "running_scores",
            "has_received_bye",
            "num_black_games",
        ] {
            assert!(player.as_object().unwrap().contains_key(key), "missing player key {key}");
        }
        assert!(!player.as_object().unwrap().contains_key("tiebreakers"));

        let bob_opponent = &value["players"][1]["opponent_ids"][0];
        assert_eq!(bob_opponent.as_str().unwrap(), "a");
    }

    fn record_game(tournament: &mut Tournament) {
        use crate::domain::color::Color;
        tournament
            .players
            .get_mut(&PlayerId::from("a"))
            .unwrap()
            .record_round(
                0,
                OpponentSlot::Player(PlayerId::from("b")),
                1.0,
                ColorSlot::Color(Color::White),
            )
            .unwrap();
        tournament
            .players
            .get_mut(&PlayerId::from("b"))
            .unwrap()
            .record_round(
                0,
                OpponentSlot::Player(PlayerId::from("a")),
                0.0,
                ColorSlot::Color(Color::Black),
            )
            .unwrap();
    }
}
