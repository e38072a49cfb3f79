//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, sinks, and the engine so clients
//! can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use arena_core::{EngineError, SetupError};

pub use crate::repository::SinkError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to initialize match state from setup")]
    InitialState(#[source] SetupError),

    #[error("runner requires a match setup before building")]
    MissingSetup,

    #[error("{team} program failed: {message}")]
    Program {
        team: arena_core::Team,
        message: String,
    },
}
