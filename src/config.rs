//! Tunable tournament constants, the way `pawn::service::settings` treats
//! application settings as a YAML-serializable blob rather than hard
//! compile-time literals.

use serde::{Deserialize, Serialize};

use crate::domain::tiebreak::TiebreakKind;

/// Tournament-wide constants and tie-break ordering, §6 of the spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TournamentConfig {
    pub win_score: f64,
    pub draw_score: f64,
    pub loss_score: f64,
    pub bye_score: f64,
    /// Default ordering applied by the tie-break engine when a tournament
    /// doesn't specify one of its own.
    pub default_tiebreak_order: Vec<TiebreakKind>,
    /// §9 Open Question, resolved: an inactive bye player is recorded
    /// with 0.0 regardless of `bye_score`, but still marked as having
    /// received a bye. Exposed here so a caller can override the policy
    /// without touching engine code.
    pub inactive_bye_scores_zero: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            win_score: 1.0,
            draw_score: 0.5,
            loss_score: 0.0,
            bye_score: 1.0,
            default_tiebreak_order: vec![
                TiebreakKind::Solkoff,
                TiebreakKind::Median,
                TiebreakKind::SonnebornBerger,
                TiebreakKind::Cumulative,
            ],
            inactive_bye_scores_zero: true,
        }
    }
}

impl TournamentConfig {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = TournamentConfig::default();
        assert_eq!(cfg.win_score, 1.0);
        assert_eq!(cfg.draw_score, 0.5);
        assert_eq!(cfg.loss_score, 0.0);
        assert_eq!(cfg.bye_score, 1.0);
    }

    #[test]
    fn yaml_round_trips() {
        let cfg = TournamentConfig::default();
        let yaml = cfg.to_yaml().unwrap();
        let back = TournamentConfig::from_yaml(&yaml).unwrap();
        assert_eq!(cfg, back);
    }
}
