//! Action rejection errors.

use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::EntityId;

/// Named reason an action request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    /// Target outside the range band or arc.
    OutOfRange,
    /// Timer still running, or movement already used this turn.
    Cooldown,
    /// Flux or ledger balance too low.
    InsufficientResource,
    /// The robot's type cannot perform this action.
    NotApplicable,
    /// Destination slot already held.
    Occupied,
    OutOfBounds,
    /// Terrain does not allow the robot's level.
    Impassable,
    AlreadyBroadcast,
    /// Malformed request (bad index, no direction, unknown target).
    InvalidArgument,
}

/// An illegal action. No state changed; the turn continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{action} by {robot} rejected: {reason}")]
pub struct ActionError {
    pub robot: EntityId,
    pub action: &'static str,
    pub reason: RejectReason,
    pub context: ErrorContext,
}

impl ActionError {
    pub fn new(
        robot: EntityId,
        action: &'static str,
        reason: RejectReason,
        context: ErrorContext,
    ) -> Self {
        Self {
            robot,
            action,
            reason,
            context,
        }
    }
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self.reason {
            RejectReason::NotApplicable | RejectReason::InvalidArgument => {
                ErrorSeverity::Validation
            }
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        Some(&self.context)
    }

    fn error_code(&self) -> &'static str {
        match self.reason {
            RejectReason::OutOfRange => "ACTION_OUT_OF_RANGE",
            RejectReason::Cooldown => "ACTION_COOLDOWN",
            RejectReason::InsufficientResource => "ACTION_INSUFFICIENT_RESOURCE",
            RejectReason::NotApplicable => "ACTION_NOT_APPLICABLE",
            RejectReason::Occupied => "ACTION_OCCUPIED",
            RejectReason::OutOfBounds => "ACTION_OUT_OF_BOUNDS",
            RejectReason::Impassable => "ACTION_IMPASSABLE",
            RejectReason::AlreadyBroadcast => "ACTION_ALREADY_BROADCAST",
            RejectReason::InvalidArgument => "ACTION_INVALID_ARGUMENT",
        }
    }
}
