//! Match results and the round-limit tie-break.

use crate::env::{DrawPurpose, RngOracle, compute_seed};
use crate::state::{GameState, Round, Team};

/// How decisively a match was won.
///
/// Variants are declared weakest first, so the derived ordering ranks
/// `Destroyed` highest.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DominationFactor {
    /// Everything was equal; the seeded coin decided.
    WonByDubiousReasons,
    /// Equal health, higher ledger balance.
    BarelyBarelyBeat,
    BarelyBeat,
    Beat,
    Owned,
    Pwned,
    Resigned,
    /// Every enemy archon was destroyed.
    Destroyed,
}

impl DominationFactor {
    /// Factor for a health win where the loser kept `ratio` of the winner's health.
    pub fn from_health_ratio(ratio: f64) -> Self {
        if ratio <= 0.25 {
            Self::Pwned
        } else if ratio <= 0.5 {
            Self::Owned
        } else if ratio <= 0.8 {
            Self::Beat
        } else {
            Self::BarelyBeat
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchOutcome {
    pub winner: Team,
    pub factor: DominationFactor,
    /// Round in which the match ended.
    pub round: Round,
}

/// Decides a match that ran out of rounds or lost both armies at once.
///
/// Higher aggregate robot health wins; then higher ledger balance; then a
/// seeded coin flip. The flip reads the current draw counter, so the caller
/// must count one draw when `WonByDubiousReasons` is returned.
pub fn tie_break(state: &GameState, rng: &dyn RngOracle) -> (Team, DominationFactor) {
    let [health_a, health_b] = state.aggregate_health();
    if health_a != health_b {
        let (winner, high, low) = if health_a > health_b {
            (Team::A, health_a, health_b)
        } else {
            (Team::B, health_b, health_a)
        };
        return (winner, DominationFactor::from_health_ratio(low / high));
    }

    let [balance_a, balance_b] = state.ledger().balances();
    if balance_a != balance_b {
        let winner = if balance_a > balance_b { Team::A } else { Team::B };
        return (winner, DominationFactor::BarelyBarelyBeat);
    }

    let seed = compute_seed(state.seed(), state.draws, state.round(), DrawPurpose::TieBreak);
    let winner = if rng.flip(seed) { Team::A } else { Team::B };
    (winner, DominationFactor::WonByDubiousReasons)
}
