//! Errors surfaced by the round scheduler.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::signal::ApplyError;
use crate::state::{EntityId, Position};

/// Misuse of the scheduler, or a failure inside signal application.
///
/// Illegal actions are not engine errors; they are reported per turn.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("match has not been started")]
    NotStarted,

    #[error("match has already ended")]
    MatchEnded,

    #[error("round already in progress")]
    RoundInProgress,

    #[error("no round in progress")]
    RoundNotOpen,

    #[error("turn of {robot} still in progress")]
    TurnInProgress { robot: EntityId },

    #[error("no turn in progress")]
    NoTurnInProgress,

    #[error("unknown robot {0}")]
    UnknownRobot(EntityId),

    #[error("cannot place {robot} at {position:?}")]
    InvalidOverride { robot: EntityId, position: Position },

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotStarted
            | Self::MatchEnded
            | Self::RoundInProgress
            | Self::RoundNotOpen
            | Self::TurnInProgress { .. }
            | Self::NoTurnInProgress => ErrorSeverity::Validation,
            Self::UnknownRobot(_) | Self::InvalidOverride { .. } => ErrorSeverity::Recoverable,
            Self::Apply(_) => ErrorSeverity::Internal,
            Self::Oracle(_) => ErrorSeverity::Fatal,
        }
    }

    fn context(&self) -> Option<&crate::error::ErrorContext> {
        match self {
            Self::Apply(err) => err.context(),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotStarted => "ENGINE_NOT_STARTED",
            Self::MatchEnded => "ENGINE_MATCH_ENDED",
            Self::RoundInProgress => "ENGINE_ROUND_IN_PROGRESS",
            Self::RoundNotOpen => "ENGINE_ROUND_NOT_OPEN",
            Self::TurnInProgress { .. } => "ENGINE_TURN_IN_PROGRESS",
            Self::NoTurnInProgress => "ENGINE_NO_TURN",
            Self::UnknownRobot(_) => "ENGINE_UNKNOWN_ROBOT",
            Self::InvalidOverride { .. } => "ENGINE_INVALID_OVERRIDE",
            Self::Apply(err) => err.error_code(),
            Self::Oracle(_) => "ENGINE_ORACLE",
        }
    }
}
