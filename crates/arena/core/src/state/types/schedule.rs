use std::collections::BTreeSet;

use crate::engine::MatchOutcome;
use crate::signal::Signal;

use super::{EntityId, Position, Team};

/// Match lifecycle. `Ended` is terminal.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchPhase {
    #[default]
    NotStarted,
    Running,
    Ended(MatchOutcome),
}

impl MatchPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, MatchPhase::Running)
    }

    pub fn outcome(&self) -> Option<&MatchOutcome> {
        match self {
            MatchPhase::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// The robot whose turn is in progress.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveTurn {
    pub robot: EntityId,
    pub bytecode_limit: u32,
    /// At most one movement per turn, committed at end of turn.
    pub pending_move: Option<Signal>,
}

/// Round-scoped bookkeeping owned by the scheduler.
///
/// Nothing here is part of the replayable world; it is rebuilt every round.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundSchedule {
    pub in_round: bool,
    /// Robots alive with a turn at the start of the round, ascending ID.
    pub turn_order: Vec<EntityId>,
    pub cursor: usize,
    pub active: Option<ActiveTurn>,
    /// Connected supply nodes per team, `None` when the match has no network.
    pub connectivity: Option<[BTreeSet<Position>; 2]>,
    /// Signals emitted so far this round, in application order.
    pub signals: Vec<Signal>,
    pub resigned: Option<Team>,
    pub force_end: bool,
}

impl RoundSchedule {
    /// True when a tower at `location` is supplied for `team`.
    pub fn is_connected(&self, location: Position, team: Team) -> bool {
        match (&self.connectivity, team.index()) {
            (None, _) => true,
            (Some(sets), Some(i)) => sets[i].contains(&location),
            (Some(_), None) => false,
        }
    }
}
