//! Result recording (§4.5): applies one round's outcomes to both
//! players' histories plus the automatic bye score, validating that the
//! supplied results exactly match the round's scheduled pairings.

use tracing::{instrument, warn};

use crate::common::error::TournamentError;
use crate::domain::color::{Color, ColorSlot};
use crate::domain::player::{OpponentSlot, PlayerId};
use crate::domain::tournament::Tournament;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    WhiteWin,
    BlackWin,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub white: PlayerId,
    pub black: PlayerId,
    pub outcome: GameOutcome,
}

/// One scheduled pairing's validated, ready-to-apply scores.
struct ScoredGame {
    white: PlayerId,
    black: PlayerId,
    white_score: f64,
    black_score: f64,
}

/// Validates the entire batch of results against the round's schedule
/// before anything is mutated, so an error partway through leaves the
/// tournament exactly as it was (§5/§7). A scheduled pair with no
/// matching result is a non-fatal omission (§4.5): it is logged and
/// skipped rather than aborting the whole batch.
#[instrument(skip(tournament, results))]
pub fn record_results(
    tournament: &mut Tournament,
    round_index: usize,
    results: &[GameResult],
) -> Result<(), TournamentError> {
    if round_index >= tournament.rounds.len() {
        return Err(TournamentError::InvalidRoundIndex(round_index));
    }

    let round = tournament.rounds[round_index].clone();

    let mut scored = Vec::new();
    for pairing in &round.pairings {
        let matching = results.iter().find(|r| {
            (r.white == pairing.white && r.black == pairing.black)
                || (r.white == pairing.black && r.black == pairing.white)
        });
        let game = match matching {
            Some(game) => game,
            None => {
                warn!(
                    round = round_index,
                    white = ?pairing.white,
                    black = ?pairing.black,
                    "no result supplied for a scheduled pairing; leaving it unscored"
                );
                continue;
            }
        };
        if game.white != pairing.white || game.black != pairing.black {
            return Err(TournamentError::MismatchedPairing {
                round: round_index,
                white: pairing.white.clone(),
                black: pairing.black.clone(),
            });
        }

        let white = tournament
            .players
            .get(&pairing.white)
            .ok_or_else(|| TournamentError::UnknownPlayer(pairing.white.clone()))?;
        if white.history.len() > round_index {
            return Err(TournamentError::AlreadyRecorded(pairing.white.clone(), round_index));
        }
        let black = tournament
            .players
            .get(&pairing.black)
            .ok_or_else(|| TournamentError::UnknownPlayer(pairing.black.clone()))?;
        if black.history.len() > round_index {
            return Err(TournamentError::AlreadyRecorded(pairing.black.clone(), round_index));
        }

        let (white_score, black_score) = match game.outcome {
            GameOutcome::WhiteWin => (tournament.config.win_score, tournament.config.loss_score),
            GameOutcome::BlackWin => (tournament.config.loss_score, tournament.config.win_score),
            GameOutcome::Draw => (tournament.config.draw_score, tournament.config.draw_score),
        };

        scored.push(ScoredGame {
            white: pairing.white.clone(),
            black: pairing.black.clone(),
            white_score,
            black_score,
        });
    }

    let bye_score = if let Some(bye_id) = &round.bye {
        let player = tournament
            .players
            .get(bye_id)
            .ok_or_else(|| TournamentError::UnknownPlayer(bye_id.clone()))?;
        if player.history.len() > round_index {
            return Err(TournamentError::AlreadyRecorded(bye_id.clone(), round_index));
        }
        let score = if !player.is_active && tournament.config.inactive_bye_scores_zero {
            0.0
        } else {
            tournament.config.bye_score
        };
        Some(score)
    } else {
        None
    };

    // Every entry above is now known-valid; apply the mutations.
    for game in scored {
        tournament
            .players
            .get_mut(&game.white)
            .unwrap()
            .record_round(
                round_index,
                OpponentSlot::Player(game.black.clone()),
                game.white_score,
                ColorSlot::Color(Color::White),
            )?;
        tournament
            .players
            .get_mut(&game.black)
            .unwrap()
            .record_round(
                round_index,
                OpponentSlot::Player(game.white),
                game.black_score,
                ColorSlot::Color(Color::Black),
            )?;
    }

    if let (Some(bye_id), Some(score)) = (&round.bye, bye_score) {
        tournament
            .players
            .get_mut(bye_id)
            .unwrap()
            .record_round(round_index, OpponentSlot::Bye, score, ColorSlot::None)?;
    }

    Ok(())
}
