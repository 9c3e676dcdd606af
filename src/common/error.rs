use thiserror::Error;

use crate::domain::player::PlayerId;

/// Error kinds surfaced by the tournament core.
///
/// Every public operation either fully applies its effect or returns one
/// of these before mutating anything; there is no partial-state failure
/// mode (§7).
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("round index {0} is outside the recorded round history")]
    InvalidRoundIndex(usize),

    #[error("player {0:?} is not in the roster")]
    UnknownPlayer(PlayerId),

    #[error("player {0:?} already has a result recorded for round {1}")]
    AlreadyRecorded(PlayerId, usize),

    #[error(
        "white player {white:?}'s scheduled opponent for round {round} is not {black:?}"
    )]
    MismatchedPairing {
        round: usize,
        white: PlayerId,
        black: PlayerId,
    },

    #[error("an odd number of active players remains with no player eligible for a bye")]
    PairingInfeasible,

    #[error("round {0} has already had results recorded and can no longer be reassigned")]
    RoundAlreadyScored(usize),

    #[error("{0:?} and {1:?} are both the bye for their round; reassign cannot resolve two byes")]
    AmbiguousBye(PlayerId, PlayerId),

    #[error(
        "pairing {0:?} against {1:?} requires repeating a previous match, but no \
         allow_repeat callback was supplied"
    )]
    RepeatPairingRequired(PlayerId, PlayerId),

    #[error("failed to (de)serialize tournament state: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("failed to (de)serialize tournament configuration: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("persisted tournament state is malformed: {0}")]
    InvalidPersistedState(String),
}

/// Outcome of a manual reassignment request that is not itself a failure
/// (`SameAsCurrent` per §7 is informational, not an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassignOutcome {
    Applied,
    NoOp,
}
