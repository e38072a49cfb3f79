use crate::error::{ErrorSeverity, GameError};
use crate::state::{Level, Position, Team};

/// Malformed match setup. Always fatal: the match never reaches round 1.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SetupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("placement {index} at {position} is outside the map")]
    OutOfBounds { index: usize, position: Position },

    #[error("placement {index} at {position} is on impassable terrain")]
    Impassable { index: usize, position: Position },

    #[error("placement {index} at {position} overlaps another {level:?} occupant")]
    Overlap {
        index: usize,
        position: Position,
        level: Level,
    },

    #[error("structure placement {index} at {position} is not on a supply node")]
    StructureOffNetwork { index: usize, position: Position },

    #[error("tree placement {index} has non-positive radius")]
    InvalidTreeRadius { index: usize },

    #[error("team {team} starts without an archon")]
    NoArchons { team: Team },
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "SETUP_INVALID_CONFIG",
            Self::OutOfBounds { .. } => "SETUP_OUT_OF_BOUNDS",
            Self::Impassable { .. } => "SETUP_IMPASSABLE",
            Self::Overlap { .. } => "SETUP_OVERLAP",
            Self::StructureOffNetwork { .. } => "SETUP_STRUCTURE_OFF_NETWORK",
            Self::InvalidTreeRadius { .. } => "SETUP_INVALID_TREE_RADIUS",
            Self::NoArchons { .. } => "SETUP_NO_ARCHONS",
        }
    }
}
