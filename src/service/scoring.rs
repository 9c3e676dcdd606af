//! Scoring and tie-break engine (§4.4), grounded on the tie-break
//! computations in `old_tournament_file.py`'s `Tournament` class, recast
//! as free functions over the redesigned `Tournament`/`Player` model.

use std::cmp::Ordering;

use tracing::instrument;

use crate::domain::player::{OpponentSlot, Player, PlayerId};
use crate::domain::tiebreak::TiebreakKind;
use crate::domain::tournament::Tournament;

/// Recomputes every player's tie-break values in place.
#[instrument(skip(tournament))]
pub fn compute_tiebreakers(tournament: &mut Tournament) {
    let ids: Vec<PlayerId> = tournament.players.keys().cloned().collect();
    for id in ids {
        let values = compute_for_player(&id, tournament);
        tournament.players.get_mut(&id).unwrap().tiebreakers = values;
    }
}

fn compute_for_player(
    id: &PlayerId,
    tournament: &Tournament,
) -> crate::domain::tiebreak::TiebreakValues {
    let player = &tournament.players[id];
    if player.history.is_empty() {
        return crate::domain::tiebreak::TiebreakValues::new();
    }

    let opponent_scores: Vec<f64> = player
        .history
        .iter()
        .filter_map(|r| match &r.opponent {
            OpponentSlot::Player(opp_id) => Some(tournament.players[opp_id].score()),
            OpponentSlot::Bye => None,
        })
        .collect();

    let mut values = crate::domain::tiebreak::TiebreakValues::new();
    values.insert(TiebreakKind::Solkoff, opponent_scores.iter().sum());
    values.insert(TiebreakKind::CumulativeOpp, opponent_scores.iter().sum());
    values.insert(TiebreakKind::Median, median(player, &opponent_scores, tournament));
    values.insert(TiebreakKind::Cumulative, player.running_scores.iter().sum());
    values.insert(TiebreakKind::SonnebornBerger, sonneborn_berger(player, tournament));
    values.insert(TiebreakKind::MostBlacks, player.num_black_games as f64);
    values.insert(TiebreakKind::HeadToHead, 0.0);
    values
}

/// Modified Median, with the exact half-based dropping rule from the
/// original implementation.
fn median(player: &Player, opponent_scores: &[f64], tournament: &Tournament) -> f64 {
    let n = opponent_scores.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return opponent_scores[0];
    }

    let own_played: f64 = player
        .history
        .iter()
        .filter(|r| matches!(r.opponent, OpponentSlot::Player(_)))
        .map(|r| r.result)
        .sum();
    let half = n as f64 * tournament.config.win_score / 2.0;

    let mut sorted = opponent_scores.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    if own_played > half {
        sorted[1..].iter().sum()
    } else if own_played < half {
        sorted[..n - 1].iter().sum()
    } else {
        sorted[1..n - 1].iter().sum()
    }
}

fn sonneborn_berger(player: &Player, tournament: &Tournament) -> f64 {
    let mut total = 0.0;
    for record in &player.history {
        if let OpponentSlot::Player(opp_id) = &record.opponent {
            let opponent_score = tournament.players[opp_id].score();
            if record.result == tournament.config.win_score {
                total += opponent_score;
            } else if record.result == tournament.config.draw_score {
                total += 0.5 * opponent_score;
            }
        }
    }
    total
}

/// Did `player` ever beat / lose to `opponent` across recorded rounds?
fn head_to_head(tournament: &Tournament, player: &PlayerId, opponent: &PlayerId) -> (bool, bool) {
    let p = &tournament.players[player];
    let mut beat = false;
    let mut lost = false;
    for record in &p.history {
        if record.opponent.player_id() == Some(opponent) {
            if record.result == tournament.config.win_score {
                beat = true;
            } else if record.result == tournament.config.loss_score {
                lost = true;
            }
        }
    }
    (beat, lost)
}

/// Total order used for standings (§4.4): score, then head-to-head, then
/// each key of `tiebreak_order` in turn, then rating, then name.
/// `Ordering::Greater` means `a` ranks ahead of `b`.
pub fn compare(tournament: &Tournament, a: &PlayerId, b: &PlayerId) -> Ordering {
    let pa = &tournament.players[a];
    let pb = &tournament.players[b];

    let by_score = pa.score().partial_cmp(&pb.score()).unwrap_or(Ordering::Equal);
    if by_score != Ordering::Equal {
        return by_score;
    }

    let (a_beat_b, b_beat_a_from_a) = head_to_head(tournament, a, b);
    let (_, a_beat_b_from_b) = head_to_head(tournament, b, a);
    let b_beat_a = b_beat_a_from_a || a_beat_b_from_b;
    if a_beat_b && !b_beat_a {
        return Ordering::Greater;
    }
    if b_beat_a && !a_beat_b {
        return Ordering::Less;
    }

    for key in &tournament.tiebreak_order {
        let va = pa.tiebreakers.get(key).copied().unwrap_or(0.0);
        let vb = pb.tiebreakers.get(key).copied().unwrap_or(0.0);
        let ord = va.partial_cmp(&vb).unwrap_or(Ordering::Equal);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    let by_rating = pa.rating.cmp(&pb.rating);
    if by_rating != Ordering::Equal {
        return by_rating;
    }

    // Name ascending: the alphabetically earlier name ranks first, i.e.
    // compares as Greater here.
    pb.name.cmp(&pa.name)
}

/// Active players ordered best-first by [`compare`].
pub fn standings(tournament: &Tournament) -> Vec<PlayerId> {
    let mut ids: Vec<PlayerId> = tournament.active_players().iter().map(|p| p.id.clone()).collect();
    ids.sort_by(|x, y| compare(tournament, y, x));
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::color::{Color, ColorSlot};
    use crate::domain::player::{OpponentSlot, Player};
    use crate::domain::tournament::Tournament;

    fn sample_tournament() -> Tournament {
        let mut alice = Player::new(PlayerId::from("alice"), "Alice", 2000);
        let mut bob = Player::new(PlayerId::from("bob"), "Bob", 1900);
        let mut carol = Player::new(PlayerId::from("carol"), "Carol", 1800);

        alice
            .record_round(
                0,
                OpponentSlot::Player(PlayerId::from("bob")),
                1.0,
                ColorSlot::Color(Color::White),
            )
            .unwrap();
        bob.record_round(
            0,
            OpponentSlot::Player(PlayerId::from("alice")),
            0.0,
            ColorSlot::Color(Color::Black),
        )
        .unwrap();
        carol
            .record_round(0, OpponentSlot::Bye, 1.0, ColorSlot::None)
            .unwrap();

        let mut t = Tournament::new(
            "t",
            vec![alice, bob, carol],
            3,
            vec![
                TiebreakKind::Solkoff,
                TiebreakKind::Median,
                TiebreakKind::SonnebornBerger,
                TiebreakKind::Cumulative,
            ],
        );
        t.rounds.push(crate::domain::round::Round {
            pairings: vec![crate::domain::round::Pairing::new(
                PlayerId::from("alice"),
                PlayerId::from("bob"),
            )],
            bye: Some(PlayerId::from("carol")),
        });
        t
    }

    #[test]
    fn winner_outranks_loser_by_score() {
        let t = sample_tournament();
        let order = standings(&t);
        assert_eq!(order[0], PlayerId::from("alice"));
    }

    #[test]
    fn sonneborn_berger_credits_beaten_opponent_score() {
        let mut t = sample_tournament();
        compute_tiebreakers(&mut t);
        let alice_sb = t.players[&PlayerId::from("alice")]
            .tiebreakers
            .get(&TiebreakKind::SonnebornBerger)
            .copied()
            .unwrap();
        assert_eq!(alice_sb, 0.0); // bob's own score is 0.0 at this point
    }

    #[test]
    fn median_with_one_opponent_is_that_opponents_score() {
        let mut t = sample_tournament();
        compute_tiebreakers(&mut t);
        let alice_median = t.players[&PlayerId::from("alice")]
            .tiebreakers
            .get(&TiebreakKind::Median)
            .copied()
            .unwrap();
        assert_eq!(alice_median, 0.0);
    }
}
