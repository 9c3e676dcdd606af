//! A deterministic, synchronous, in-memory Swiss-system chess tournament
//! engine: pairing (Dutch system with float carry-down), manual pairing
//! overrides, and a multi-key tie-break and standings engine.
//!
//! The crate carries no async runtime, no database layer, and no GUI
//! bridge; callers own persistence timing and any outer service loop.

pub mod common;
pub mod config;
pub mod domain;
pub mod persistence;
pub mod service;

pub use common::error::{ReassignOutcome, TournamentError};
pub use config::TournamentConfig;
pub use domain::color::{Color, ColorPreference, ColorSlot};
pub use domain::player::{OpponentSlot, Player, PlayerId, RoundRecord};
pub use domain::round::{Pairing, Round, UnorderedPair};
pub use domain::tiebreak::{TiebreakKind, TiebreakValues};
pub use domain::tournament::{ManualOverride, Tournament};
pub use service::pairing::{AllowRepeat, PairingEngine, PairingOutcome};
pub use service::results::{GameOutcome, GameResult};
pub use service::tournament::TournamentController;
