use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tie-break metrics computed by the scoring engine, §4.4. Named the way
/// the teacher's `pawn::domain::tiebreak::TiebreakType` enumerates its own
/// (much larger) set of FIDE tie-break systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiebreakKind {
    Solkoff,
    Median,
    Cumulative,
    CumulativeOpp,
    SonnebornBerger,
    MostBlacks,
    /// Reserved slot — head-to-head is resolved pairwise at comparison
    /// time (§4.4) and never stored as a scalar tiebreaker value, but the
    /// variant exists so a caller can still name it in `tiebreak_order`
    /// without the engine rejecting an otherwise-valid ordering.
    HeadToHead,
}

impl TiebreakKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            TiebreakKind::Solkoff => "Solkoff",
            TiebreakKind::Median => "Median (Modified Median)",
            TiebreakKind::Cumulative => "Cumulative",
            TiebreakKind::CumulativeOpp => "Cumulative of Opponents",
            TiebreakKind::SonnebornBerger => "Sonneborn-Berger",
            TiebreakKind::MostBlacks => "Most Blacks",
            TiebreakKind::HeadToHead => "Head-to-Head",
        }
    }
}

/// A player's computed tie-break values, keyed by kind. `BTreeMap` keeps
/// iteration order stable for serialization and debug output.
pub type TiebreakValues = BTreeMap<TiebreakKind, f64>;
