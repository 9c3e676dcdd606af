use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::error::TournamentError;
use crate::domain::color::{Color, ColorPreference, ColorSlot};
use crate::domain::tiebreak::TiebreakValues;

/// Stable opaque player identifier, unique within a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new_random() -> Self {
        PlayerId(Uuid::new_v4().to_string())
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        PlayerId(value.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        PlayerId(value)
    }
}

/// A round's opponent slot; `Bye` is the "none" sentinel from §3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentSlot {
    Player(PlayerId),
    Bye,
}

impl OpponentSlot {
    pub fn player_id(&self) -> Option<&PlayerId> {
        match self {
            OpponentSlot::Player(id) => Some(id),
            OpponentSlot::Bye => None,
        }
    }
}

/// One round's worth of a player's history, replacing the parallel
/// `results` / `opponent_ids` / `color_history` sequences of the
/// original implementation (REDESIGN FLAGS, §9) so invariant I3 — equal
/// lengths across the three sequences — holds by construction rather
/// than convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub opponent: OpponentSlot,
    pub result: f64,
    pub color: ColorSlot,
}

/// A tournament participant (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub rating: i32,
    pub is_active: bool,
    pub history: Vec<RoundRecord>,
    pub has_received_bye: bool,
    pub float_history: Vec<u32>,
    pub running_scores: Vec<f64>,
    pub num_black_games: u32,
    #[serde(default)]
    pub tiebreakers: TiebreakValues,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, rating: i32) -> Self {
        Player {
            id,
            name: name.into(),
            rating: rating.clamp(0, 3500),
            is_active: true,
            history: Vec::new(),
            has_received_bye: false,
            float_history: Vec::new(),
            running_scores: Vec::new(),
            num_black_games: 0,
            tiebreakers: TiebreakValues::new(),
        }
    }

    pub fn rounds_played(&self) -> usize {
        self.history.len()
    }

    /// Live sum of all recorded results (I5).
    pub fn score(&self) -> f64 {
        self.history.iter().map(|r| r.result).sum()
    }

    /// Color balance: whites minus blacks, ignoring byes.
    pub fn color_balance(&self) -> i32 {
        let mut balance = 0i32;
        for record in &self.history {
            match record.color {
                ColorSlot::Color(Color::White) => balance += 1,
                ColorSlot::Color(Color::Black) => balance -= 1,
                ColorSlot::None => {}
            }
        }
        balance
    }

    /// The last two real (non-bye) colors played, most recent last.
    fn last_two_colors(&self) -> Vec<Color> {
        self.history
            .iter()
            .rev()
            .filter_map(|r| match r.color {
                ColorSlot::Color(c) => Some(c),
                ColorSlot::None => None,
            })
            .take(2)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect()
    }

    /// §4.1 color preference rules.
    pub fn color_preference(&self) -> ColorPreference {
        let recent = self.last_two_colors();
        if recent.len() == 2 && recent[0] == recent[1] {
            return match recent[0].opposite() {
                Color::White => ColorPreference::MustWhite,
                Color::Black => ColorPreference::MustBlack,
            };
        }

        let balance = self.color_balance();
        if balance >= 1 {
            ColorPreference::PreferBlack
        } else if balance <= -1 {
            ColorPreference::PreferWhite
        } else {
            ColorPreference::NoPreference
        }
    }

    /// Appends one round's entry to the player's parallel histories.
    ///
    /// `round_index` is 0-based; it must equal the player's current
    /// number of recorded rounds, mirroring the append-only history
    /// model of §3 (round entries are appended, never inserted).
    pub fn record_round(
        &mut self,
        round_index: usize,
        opponent: OpponentSlot,
        result: f64,
        color: ColorSlot,
    ) -> Result<(), TournamentError> {
        if round_index != self.history.len() {
            return Err(TournamentError::InvalidRoundIndex(round_index));
        }

        if matches!(opponent, OpponentSlot::Bye) {
            self.has_received_bye = true;
        }
        if matches!(color, ColorSlot::Color(Color::Black)) {
            self.num_black_games += 1;
        }

        self.history.push(RoundRecord {
            opponent,
            result,
            color,
        });

        let cumulative = self.running_scores.last().copied().unwrap_or(0.0) + result;
        self.running_scores.push(cumulative);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(opponent: &str, result: f64, color: Color) -> (OpponentSlot, f64, ColorSlot) {
        (
            OpponentSlot::Player(PlayerId::from(opponent)),
            result,
            ColorSlot::Color(color),
        )
    }

    #[test]
    fn no_preference_when_no_history() {
        let p = Player::new(PlayerId::from("a"), "Alice", 1800);
        assert_eq!(p.color_preference(), ColorPreference::NoPreference);
    }

    #[test]
    fn must_opposite_after_two_same_colors() {
        let mut p = Player::new(PlayerId::from("a"), "Alice", 1800);
        let (o1, r1, c1) = record("b", 1.0, Color::White);
        let (o2, r2, c2) = record("c", 0.0, Color::White);
        p.record_round(0, o1, r1, c1).unwrap();
        p.record_round(1, o2, r2, c2).unwrap();
        assert_eq!(p.color_preference(), ColorPreference::MustBlack);
    }

    #[test]
    fn bye_does_not_break_a_streak() {
        let mut p = Player::new(PlayerId::from("a"), "Alice", 1800);
        let (o1, r1, c1) = record("b", 1.0, Color::White);
        p.record_round(0, o1, r1, c1).unwrap();
        p.record_round(1, OpponentSlot::Bye, 1.0, ColorSlot::None)
            .unwrap();
        let (o3, r3, c3) = record("c", 0.0, Color::White);
        p.record_round(2, o3, r3, c3).unwrap();
        assert_eq!(p.color_preference(), ColorPreference::MustBlack);
        assert!(p.has_received_bye);
    }

    #[test]
    fn prefer_black_once_balance_reaches_one() {
        let mut p = Player::new(PlayerId::from("a"), "Alice", 1800);
        let (o1, r1, c1) = record("b", 1.0, Color::White);
        p.record_round(0, o1, r1, c1).unwrap();
        // One game played, so the "last two same color" rule can't fire;
        // falls through to the balance rule (+1 white -> prefer black).
        assert_eq!(p.color_preference(), ColorPreference::PreferBlack);
    }

    #[test]
    fn out_of_order_round_index_is_rejected() {
        let mut p = Player::new(PlayerId::from("a"), "Alice", 1800);
        let (o1, r1, c1) = record("b", 1.0, Color::White);
        let err = p.record_round(1, o1, r1, c1).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidRoundIndex(1)));
    }

    #[test]
    fn running_scores_are_cumulative() {
        let mut p = Player::new(PlayerId::from("a"), "Alice", 1800);
        let (o1, r1, c1) = record("b", 1.0, Color::White);
        let (o2, r2, c2) = record("c", 0.5, Color::Black);
        p.record_round(0, o1, r1, c1).unwrap();
        p.record_round(1, o2, r2, c2).unwrap();
        assert_eq!(p.running_scores, vec![1.0, 1.5]);
        assert_eq!(p.score(), 1.5);
    }
}
