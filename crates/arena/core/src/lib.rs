//! Deterministic referee kernel for tick-based robot matches.
//!
//! `arena-core` owns the rules: the unit catalog, world state, legality of
//! actions, combat and economy, and the round scheduler. Every change to the
//! world is a [`signal::Signal`] passed through [`signal::apply`], so a match
//! log replayed over the same setup reproduces the live state exactly.
//! Programs, persistence and transport live in other crates and talk to the
//! kernel through [`engine::GameEngine`] and the oracles in [`env`].
pub mod action;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod rules;
pub mod signal;
pub mod state;

pub use action::{Action, ActionContext, ActionError, ActionPlan, RejectReason};
pub use catalog::{RobotStats, RobotType};
pub use config::GameConfig;
pub use engine::{
    DominationFactor, EngineError, GameEngine, MatchOutcome, ProgramExecutor, RoundSummary,
    TurnReport, TurnRequest, TurnStatus, TurnSummary,
};
pub use env::{
    DrawPurpose, Env, GameEnv, GridMap, MapDimensions, MapOracle, NodeGraph, OracleError, PcgRng,
    RngOracle, SupplyNetwork, TerrainTile,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use signal::{
    ApplyError, LogRecord, MatchFooter, MatchHeader, MatchLog, ReplayError, Replayer, RoundRecord,
    Signal,
};
pub use state::{
    Direction, EntityId, GameState, Level, MatchPhase, MatchSetup, Message, Position, Robot,
    RobotPlacement, Round, SetupError, Team, TeamLedger, Tree, TreePlacement,
};
