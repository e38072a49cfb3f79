//! Async match runner for the arena referee kernel.
//!
//! This crate wires together program providers, the simulation worker, and
//! match log sinks into a cohesive runtime API. Consumers build a
//! [`MatchRunner`] to play a match and steer it through [`MatchHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the runner and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`repository`] persists and transports match logs
//! - [`oracle`] owns the terrain, network and RNG of a match
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    IdleProvider, MatchHandle, ProgramProvider, ProviderRegistry, Result, RuntimeError,
    ScriptedProvider, Skirmisher,
};
pub use oracle::MatchOracles;
pub use repository::{
    FileMatchLog, MatchSink, MemorySink, SinkError, StreamFormat, StreamSink, read_log,
};
pub use runtime::{MatchReport, MatchRunner, RunnerBuilder, RunnerConfig};
