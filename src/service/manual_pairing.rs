//! Manual pairing override (§4.3): swap one player onto a new opponent
//! for an unscored round via a canonical 4-cycle, replacing the original
//! implementation's ad hoc pairwise reassignment branches (REDESIGN
//! FLAGS, §9).

use tracing::info;

use crate::common::error::{ReassignOutcome, TournamentError};
use crate::domain::player::PlayerId;
use crate::domain::round::{Pairing, Round, UnorderedPair};
use crate::domain::tournament::{ManualOverride, Tournament};

enum Location {
    Paired {
        idx: usize,
        opponent: PlayerId,
        was_white: bool,
    },
    Bye,
    NotFound,
}

fn locate(round: &Round, id: &PlayerId) -> Location {
    for (idx, pairing) in round.pairings.iter().enumerate() {
        if &pairing.white == id {
            return Location::Paired {
                idx,
                opponent: pairing.black.clone(),
                was_white: true,
            };
        }
        if &pairing.black == id {
            return Location::Paired {
                idx,
                opponent: pairing.white.clone(),
                was_white: false,
            };
        }
    }
    if round.bye.as_ref() == Some(id) {
        return Location::Bye;
    }
    Location::NotFound
}

/// Re-pairs `player` against `new_opponent` for round `round_index`
/// (0-based), per §4.3.
pub fn reassign(
    tournament: &mut Tournament,
    round_index: usize,
    player: &PlayerId,
    new_opponent: &PlayerId,
) -> Result<ReassignOutcome, TournamentError> {
    if round_index >= tournament.rounds.len() {
        return Err(TournamentError::InvalidRoundIndex(round_index));
    }
    if !tournament.players.contains_key(player) {
        return Err(TournamentError::UnknownPlayer(player.clone()));
    }
    if !tournament.players.contains_key(new_opponent) {
        return Err(TournamentError::UnknownPlayer(new_opponent.clone()));
    }
    if player == new_opponent {
        return Ok(ReassignOutcome::NoOp);
    }

    let round_players_recorded = {
        let round = &tournament.rounds[round_index];
        round
            .pairings
            .iter()
            .flat_map(|p| [p.white.clone(), p.black.clone()])
            .chain(round.bye.clone())
            .any(|id| tournament.players[&id].history.len() > round_index)
    };
    if round_players_recorded {
        return Err(TournamentError::RoundAlreadyScored(round_index));
    }

    let loc_a = locate(&tournament.rounds[round_index], player);
    let loc_b = locate(&tournament.rounds[round_index], new_opponent);

    match (loc_a, loc_b) {
        (Location::NotFound, _) => Err(TournamentError::UnknownPlayer(player.clone())),
        (_, Location::NotFound) => Err(TournamentError::UnknownPlayer(new_opponent.clone())),
        (Location::Bye, Location::Bye) => Err(TournamentError::AmbiguousBye(
            player.clone(),
            new_opponent.clone(),
        )),
        (
            Location::Paired {
                idx: idx_a,
                opponent: x,
                was_white: a_white,
            },
            Location::Paired {
                idx: idx_b,
                opponent: y,
                was_white: _,
            },
        ) => {
            if x == *new_opponent {
                return Ok(ReassignOutcome::NoOp);
            }

            record_override(tournament, round_index, player.clone(), Some(x.clone()));
            record_override(
                tournament,
                round_index,
                new_opponent.clone(),
                Some(y.clone()),
            );

            let round = &mut tournament.rounds[round_index];
            round.pairings[idx_a] = if a_white {
                Pairing::new(player.clone(), new_opponent.clone())
            } else {
                Pairing::new(new_opponent.clone(), player.clone())
            };
            // x occupied the slot opposite `player` in the old pairing.
            let x_was_white = !a_white;
            round.pairings[idx_b] = if x_was_white {
                Pairing::new(x.clone(), y.clone())
            } else {
                Pairing::new(y.clone(), x.clone())
            };

            tournament
                .previous_matches
                .insert(UnorderedPair::new(player.clone(), new_opponent.clone()));
            tournament
                .previous_matches
                .insert(UnorderedPair::new(x, y));

            info!(round = round_index, ?player, ?new_opponent, "manual reassignment applied");
            Ok(ReassignOutcome::Applied)
        }
        (
            Location::Paired {
                idx: idx_a,
                opponent: x,
                was_white: a_white,
            },
            Location::Bye,
        ) => {
            record_override(tournament, round_index, player.clone(), Some(x.clone()));
            record_override(tournament, round_index, new_opponent.clone(), None);

            let round = &mut tournament.rounds[round_index];
            round.pairings[idx_a] = if a_white {
                Pairing::new(player.clone(), new_opponent.clone())
            } else {
                Pairing::new(new_opponent.clone(), player.clone())
            };
            round.bye = Some(x);

            tournament
                .previous_matches
                .insert(UnorderedPair::new(player.clone(), new_opponent.clone()));

            info!(round = round_index, ?player, ?new_opponent, "manual reassignment applied (bye freed)");
            Ok(ReassignOutcome::Applied)
        }
        (
            Location::Bye,
            Location::Paired {
                idx: idx_b,
                opponent: y,
                was_white: b_white,
            },
        ) => {
            record_override(tournament, round_index, player.clone(), None);
            record_override(tournament, round_index, new_opponent.clone(), Some(y.clone()));

            let round = &mut tournament.rounds[round_index];
            round.pairings[idx_b] = if b_white {
                Pairing::new(new_opponent.clone(), player.clone())
            } else {
                Pairing::new(player.clone(), new_opponent.clone())
            };
            round.bye = Some(y);

            tournament
                .previous_matches
                .insert(UnorderedPair::new(player.clone(), new_opponent.clone()));

            info!(round = round_index, ?player, ?new_opponent, "manual reassignment applied (player pulled off bye)");
            Ok(ReassignOutcome::Applied)
        }
    }
}

fn record_override(
    tournament: &mut Tournament,
    round_index: usize,
    player: PlayerId,
    original_opponent: Option<PlayerId>,
) {
    tournament
        .manual_overrides
        .entry(round_index)
        .or_default()
        .push(ManualOverride {
            player,
            original_opponent,
        });
}
