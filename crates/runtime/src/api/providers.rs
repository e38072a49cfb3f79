//! Asynchronous abstraction for running robot programs.
//!
//! Runtime users plug in [`ProgramProvider`] implementations so a match can
//! be driven by sandboxed interpreters, remote players, scripted fixtures, or
//! nothing at all.
use async_trait::async_trait;
use arena_core::{TurnReport, TurnRequest};

use super::errors::Result;

/// Runs one robot's program for one turn.
///
/// An `Err` counts as a crash: the runner logs it and submits an empty
/// report with [`TurnStatus::Crashed`](arena_core::TurnStatus::Crashed).
#[async_trait]
pub trait ProgramProvider: Send + Sync {
    async fn run_turn(&self, request: &TurnRequest) -> Result<TurnReport>;
}

/// A program that does nothing and ends its turn immediately.
pub struct IdleProvider;

#[async_trait]
impl ProgramProvider for IdleProvider {
    async fn run_turn(&self, _request: &TurnRequest) -> Result<TurnReport> {
        Ok(TurnReport::default())
    }
}

/// Adapts a synchronous function into a provider.
pub struct ScriptedProvider<F> {
    script: F,
}

impl<F> ScriptedProvider<F>
where
    F: Fn(&TurnRequest) -> TurnReport + Send + Sync,
{
    pub fn new(script: F) -> Self {
        Self { script }
    }
}

#[async_trait]
impl<F> ProgramProvider for ScriptedProvider<F>
where
    F: Fn(&TurnRequest) -> TurnReport + Send + Sync,
{
    async fn run_turn(&self, request: &TurnRequest) -> Result<TurnReport> {
        Ok((self.script)(request))
    }
}
