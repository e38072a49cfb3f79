//! Common error infrastructure for arena-core.
//!
//! Domain-specific errors (`ActionError`, `ApplyError`, `SetupError`,
//! `EngineError`) live next to the code that raises them; this module holds
//! the classification they share.

use crate::state::{EntityId, Position, Round};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the request was refused; the turn continues
/// - **Validation**: malformed input that will never succeed unchanged
/// - **Internal**: state inconsistency that indicates a kernel bug
/// - **Fatal**: the match cannot be started or continued
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: target out of range, still cooling down, tile occupied.
    Recoverable,

    /// Examples: indicator index out of range, wrong robot type for the action.
    Validation,

    /// Examples: occupancy index desync, missing entity during apply.
    Internal,

    /// Examples: malformed map, duplicate placement at setup.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Robot or tree that triggered the error (if applicable).
    pub actor: Option<EntityId>,

    /// Position where the error occurred (if applicable).
    pub position: Option<Position>,

    /// Round in which the error was raised.
    pub round: Round,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(round: Round) -> Self {
        Self {
            actor: None,
            position: None,
            round,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Common trait for all arena-core errors.
///
/// - All error enums implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Used by logs and tests to match on a failure without string parsing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
