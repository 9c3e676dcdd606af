//! The Swiss pairing engine (§4.2), grounded on
//! `pawn::service::swiss_pairing::SwissPairingEngine`'s Dutch-system
//! implementation: score groups processed highest-to-lowest, a carry
//! accumulator for floats and unpairable players, and a color-conflict
//! scored opponent search within each bucket.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, instrument, warn};

use crate::common::error::TournamentError;
use crate::domain::color::Color;
use crate::domain::player::{Player, PlayerId};
use crate::domain::round::{Pairing, Round, UnorderedPair};
use crate::domain::tournament::Tournament;

/// The pairings and bye produced for one round (§6 engine API).
#[derive(Debug, Clone, PartialEq)]
pub struct PairingOutcome {
    pub pairings: Vec<Pairing>,
    pub bye: Option<PlayerId>,
}

/// Caller-supplied hook asked whenever the engine would otherwise have
/// to repeat a previous pairing with no alternative available.
pub type AllowRepeat<'a> = &'a mut dyn FnMut(&PlayerId, &PlayerId) -> bool;

/// Wrapper giving `f64` scores a total order inside a `BTreeMap`, the
/// same idiom the teacher uses to key its own score-group `BTreeMap`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedScore(f64);

impl Eq for OrderedScore {}

impl PartialOrd for OrderedScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

pub struct PairingEngine;

impl PairingEngine {
    pub fn new() -> Self {
        PairingEngine
    }

    /// Produces round `round_number`'s pairings, appending them (and the
    /// round history entry) to `tournament` on success. Returns the
    /// empty outcome with no mutation if there are no active players.
    #[instrument(skip(self, tournament, allow_repeat))]
    pub fn pair_next_round(
        &self,
        tournament: &mut Tournament,
        round_number: u32,
        mut allow_repeat: Option<AllowRepeat<'_>>,
    ) -> Result<PairingOutcome, TournamentError> {
        if round_number as usize != tournament.current_round() + 1 {
            return Err(TournamentError::InvalidRoundIndex(round_number as usize));
        }

        let active_ids: Vec<PlayerId> = {
            let mut ids: Vec<PlayerId> = tournament
                .players
                .values()
                .filter(|p| p.is_active)
                .map(|p| p.id.clone())
                .collect();
            ids.sort();
            ids
        };

        if active_ids.is_empty() {
            info!("no active players; nothing to pair");
            return Ok(PairingOutcome {
                pairings: vec![],
                bye: None,
            });
        }

        let outcome = if round_number == 1 {
            self.pair_round_one(tournament, active_ids)
        } else {
            self.pair_subsequent_round(tournament, active_ids, round_number, &mut allow_repeat)
        }?;

        tournament.rounds.push(Round {
            pairings: outcome.pairings.clone(),
            bye: outcome.bye.clone(),
        });

        info!(
            round = round_number,
            pairs = outcome.pairings.len(),
            bye = outcome.bye.is_some(),
            "round paired"
        );

        Ok(outcome)
    }

    fn pair_round_one(
        &self,
        tournament: &mut Tournament,
        mut sorted: Vec<PlayerId>,
    ) -> Result<PairingOutcome, TournamentError> {
        self.sort_by_rating_desc_name_asc(&mut sorted, tournament);

        let mut bye = None;
        if sorted.len() % 2 == 1 {
            let bye_id = self
                .select_bye(&sorted, tournament)
                .ok_or(TournamentError::PairingInfeasible)?;
            sorted.retain(|id| id != &bye_id);
            bye = Some(bye_id);
        }

        let mid = sorted.len() / 2;
        let (top, bottom) = sorted.split_at(mid);

        let mut pairings = Vec::with_capacity(mid);
        for (white, black) in top.iter().zip(bottom.iter()) {
            pairings.push(Pairing::new(white.clone(), black.clone()));
            tournament
                .previous_matches
                .insert(UnorderedPair::new(white.clone(), black.clone()));
        }

        Ok(PairingOutcome { pairings, bye })
    }

    fn pair_subsequent_round(
        &self,
        tournament: &mut Tournament,
        active_ids: Vec<PlayerId>,
        round_number: u32,
        allow_repeat: &mut Option<AllowRepeat<'_>>,
    ) -> Result<PairingOutcome, TournamentError> {
        let mut groups: BTreeMap<OrderedScore, Vec<PlayerId>> = BTreeMap::new();
        for id in active_ids {
            let score = tournament.players[&id].score();
            groups.entry(OrderedScore(score)).or_default().push(id);
        }
        // Highest score first.
        let ordered_groups: Vec<Vec<PlayerId>> = groups.into_iter().rev().map(|(_, v)| v).collect();

        let mut pairings = Vec::new();
        let mut carry: Vec<PlayerId> = Vec::new();
        let mut floated_this_round: HashSet<PlayerId> = HashSet::new();

        for group in ordered_groups {
            let mut bucket: Vec<PlayerId> = carry.drain(..).chain(group).collect();
            self.sort_by_rating_desc_name_asc(&mut bucket, tournament);
            debug!(group_size = bucket.len(), "processing score group");

            if bucket.len() % 2 == 1 {
                let floater = self.select_floater(&bucket, &floated_this_round, tournament);
                floated_this_round.insert(floater.clone());
                tournament
                    .players
                    .get_mut(&floater)
                    .expect("floater came from the active roster")
                    .float_history
                    .push(round_number);
                bucket.retain(|id| id != &floater);
                carry.push(floater);
            }

            self.pair_bucket(tournament, bucket, &mut pairings, &mut carry, allow_repeat, false)?;
        }

        let mut leftovers = carry;
        self.sort_by_rating_desc_name_asc(&mut leftovers, tournament);

        let mut bye = None;
        if leftovers.len() % 2 == 1 {
            let bye_id = self
                .select_bye(&leftovers, tournament)
                .ok_or(TournamentError::PairingInfeasible)?;
            leftovers.retain(|id| id != &bye_id);
            bye = Some(bye_id);
        }

        // This is the last chance to pair these players: no further score
        // group remains to carry an unpaired player down into, so a
        // forced, uncallbacked repeat is genuinely unavoidable here.
        let mut unresolved = Vec::new();
        self.pair_bucket(tournament, leftovers, &mut pairings, &mut unresolved, allow_repeat, true)?;
        for id in unresolved {
            warn!(player = ?id, "player could not be paired this round");
        }

        Ok(PairingOutcome { pairings, bye })
    }

    /// Pairs players within one (already even-or-floated) bucket,
    /// pushing anyone who can't be matched into `carry`. `terminal`
    /// marks the final leftover pass, where there is no lower score
    /// group left to carry an unpaired player down into.
    fn pair_bucket(
        &self,
        tournament: &mut Tournament,
        mut remaining: Vec<PlayerId>,
        pairings: &mut Vec<Pairing>,
        carry: &mut Vec<PlayerId>,
        allow_repeat: &mut Option<AllowRepeat<'_>>,
        terminal: bool,
    ) -> Result<(), TournamentError> {
        while remaining.len() >= 2 {
            let p1 = remaining.remove(0);
            match self.find_opponent(&p1, &remaining, tournament, allow_repeat, terminal)? {
                Some(idx) => {
                    let p2 = remaining.remove(idx);
                    let (white, black) = self.assign_colors(&p1, &p2, tournament);
                    pairings.push(Pairing::new(white, black));
                    tournament
                        .previous_matches
                        .insert(UnorderedPair::new(p1, p2));
                }
                None => carry.push(p1),
            }
        }
        carry.extend(remaining);
        Ok(())
    }

    /// Finds the best opponent for `p1` among `remaining` (§4.2 step c).
    /// Returns the index into `remaining`, or `None` if `p1` must be
    /// carried down (either no candidate exists, or every candidate is a
    /// repeat and none was approved). A repeat is only ever reported as
    /// an error in the `terminal` pass: carrying `p1` down to a lower
    /// score group can still avoid the repeat entirely, so it is not yet
    /// "required" while more groups remain to try.
    fn find_opponent(
        &self,
        p1: &PlayerId,
        remaining: &[PlayerId],
        tournament: &Tournament,
        allow_repeat: &mut Option<AllowRepeat<'_>>,
        terminal: bool,
    ) -> Result<Option<usize>, TournamentError> {
        let mut best_idx = None;
        let mut best_conflict = i32::MAX;
        for (idx, p2) in remaining.iter().enumerate() {
            if tournament
                .previous_matches
                .contains(&UnorderedPair::new(p1.clone(), p2.clone()))
            {
                continue;
            }
            let conflict = self.color_conflict_score(&tournament.players[p1], &tournament.players[p2]);
            if conflict < best_conflict {
                best_conflict = conflict;
                best_idx = Some(idx);
            }
        }
        if best_idx.is_some() {
            return Ok(best_idx);
        }
        if remaining.is_empty() {
            return Ok(None);
        }

        // Every remaining candidate is a previous opponent.
        match allow_repeat {
            Some(cb) => {
                for (idx, p2) in remaining.iter().enumerate() {
                    if cb(p1, p2) {
                        return Ok(Some(idx));
                    }
                }
                Ok(None)
            }
            None if terminal => Err(TournamentError::RepeatPairingRequired(
                p1.clone(),
                remaining[0].clone(),
            )),
            None => {
                debug!(player = ?p1, "only repeat opponents available in this group; carrying down");
                Ok(None)
            }
        }
    }

    fn color_conflict_score(&self, p1: &Player, p2: &Player) -> i32 {
        let c1 = p1.color_preference().preferred_color();
        let c2 = p2.color_preference().preferred_color();
        match (c1, c2) {
            (Some(a), Some(b)) if a == b => 2,
            _ => 0,
        }
    }

    /// Color assignment rules R1-R5, §4.2.
    fn assign_colors(
        &self,
        p1_id: &PlayerId,
        p2_id: &PlayerId,
        tournament: &Tournament,
    ) -> (PlayerId, PlayerId) {
        let p1 = &tournament.players[p1_id];
        let p2 = &tournament.players[p2_id];
        let pref1 = p1.color_preference().preferred_color();
        let pref2 = p2.color_preference().preferred_color();

        if pref1 == Some(Color::White) && pref2 != Some(Color::White) {
            return (p1_id.clone(), p2_id.clone());
        }
        if pref1 == Some(Color::Black) && pref2 != Some(Color::Black) {
            return (p2_id.clone(), p1_id.clone());
        }
        if pref2 == Some(Color::White) && pref1 != Some(Color::White) {
            return (p2_id.clone(), p1_id.clone());
        }
        if pref2 == Some(Color::Black) && pref1 != Some(Color::Black) {
            return (p1_id.clone(), p2_id.clone());
        }

        let b1 = p1.color_balance();
        let b2 = p2.color_balance();
        if b1 > b2 {
            (p2_id.clone(), p1_id.clone())
        } else if b2 > b1 {
            (p1_id.clone(), p2_id.clone())
        } else if p1.rating != p2.rating {
            if p1.rating > p2.rating {
                (p1_id.clone(), p2_id.clone())
            } else {
                (p2_id.clone(), p1_id.clone())
            }
        } else if p1.name <= p2.name {
            (p1_id.clone(), p2_id.clone())
        } else {
            (p2_id.clone(), p1_id.clone())
        }
    }

    /// §4.2.B bye selection over a candidate pool of active players.
    fn select_bye(&self, pool: &[PlayerId], tournament: &Tournament) -> Option<PlayerId> {
        if pool.is_empty() {
            return None;
        }
        let never_byed: Vec<&PlayerId> = pool
            .iter()
            .filter(|id| !tournament.players[*id].has_received_bye)
            .collect();
        let source: Vec<&PlayerId> = if !never_byed.is_empty() {
            never_byed
        } else {
            pool.iter().collect()
        };
        source
            .into_iter()
            .min_by(|a, b| {
                let pa = &tournament.players[*a];
                let pb = &tournament.players[*b];
                pa.score()
                    .partial_cmp(&pb.score())
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| pa.rating.cmp(&pb.rating))
                    .then_with(|| pa.name.cmp(&pb.name))
            })
            .cloned()
    }

    /// §4.2 step 2.b floater selection: never-floated first, then the
    /// longest-ago float, then lowest rating, then name.
    fn select_floater(
        &self,
        bucket: &[PlayerId],
        floated_this_round: &HashSet<PlayerId>,
        tournament: &Tournament,
    ) -> PlayerId {
        let candidates: Vec<&PlayerId> = {
            let fresh: Vec<&PlayerId> = bucket
                .iter()
                .filter(|id| !floated_this_round.contains(*id))
                .collect();
            if fresh.is_empty() {
                bucket.iter().collect()
            } else {
                fresh
            }
        };

        candidates
            .into_iter()
            .min_by(|a, b| {
                let pa = &tournament.players[*a];
                let pb = &tournament.players[*b];
                let last_a = pa.float_history.last().copied().map(i64::from).unwrap_or(i64::MIN);
                let last_b = pb.float_history.last().copied().map(i64::from).unwrap_or(i64::MIN);
                last_a
                    .cmp(&last_b)
                    .then_with(|| pa.rating.cmp(&pb.rating))
                    .then_with(|| pa.name.cmp(&pb.name))
            })
            .cloned()
            .expect("bucket is non-empty when an odd group needs a floater")
    }

    fn sort_by_rating_desc_name_asc(&self, ids: &mut [PlayerId], tournament: &Tournament) {
        ids.sort_by(|a, b| {
            let pa = &tournament.players[a];
            let pb = &tournament.players[b];
            pb.rating.cmp(&pa.rating).then_with(|| pa.name.cmp(&pb.name))
        });
    }
}

impl Default for PairingEngine {
    fn default() -> Self {
        Self::new()
    }
}
