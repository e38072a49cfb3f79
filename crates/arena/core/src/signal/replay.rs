//! Rebuilds world state from a recorded log.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, MatchSetup, Round, SetupError};

use super::{ApplyError, MatchLog, RoundRecord, apply};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ReplayError {
    #[error("replay setup rejected")]
    Setup(#[from] SetupError),

    #[error("round {found} recorded after round {previous}")]
    RoundOutOfOrder { previous: Round, found: Round },

    #[error("signal {index} of round {round} failed to apply")]
    Apply {
        round: Round,
        index: usize,
        #[source]
        source: ApplyError,
    },
}

impl GameError for ReplayError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Setup(_) => ErrorSeverity::Fatal,
            Self::RoundOutOfOrder { .. } => ErrorSeverity::Validation,
            Self::Apply { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Setup(_) => "REPLAY_SETUP",
            Self::RoundOutOfOrder { .. } => "REPLAY_ROUND_ORDER",
            Self::Apply { .. } => "REPLAY_APPLY",
        }
    }
}

/// Applies recorded rounds over a pristine world built from the same setup.
#[derive(Clone, Debug)]
pub struct Replayer {
    state: GameState,
}

impl Replayer {
    pub fn new(setup: &MatchSetup) -> Result<Self, ReplayError> {
        Ok(Self {
            state: GameState::from_setup(setup)?,
        })
    }

    /// Replays a whole log and returns the final state.
    pub fn replay(setup: &MatchSetup, log: &MatchLog) -> Result<GameState, ReplayError> {
        let mut replayer = Self::new(setup)?;
        for record in &log.rounds {
            replayer.apply_round(record)?;
        }
        Ok(replayer.into_state())
    }

    pub fn apply_round(&mut self, record: &RoundRecord) -> Result<(), ReplayError> {
        if record.round <= self.state.round {
            return Err(ReplayError::RoundOutOfOrder {
                previous: self.state.round,
                found: record.round,
            });
        }
        self.state.round = record.round;
        self.state.prune_buffs(record.round);

        for (index, signal) in record.signals.iter().enumerate() {
            apply(signal, &mut self.state).map_err(|source| ReplayError::Apply {
                round: record.round,
                index,
                source,
            })?;
        }
        Ok(())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }
}
