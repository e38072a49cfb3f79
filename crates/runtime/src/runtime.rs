//! High-level match runner.
//!
//! The runner owns the simulation worker, hands each turn to the program
//! provider of the acting robot's team, and streams sealed rounds into a
//! [`MatchSink`]. Clients steer a running match through [`MatchHandle`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use arena_core::{
    GameState, LogRecord, MatchFooter, MatchHeader, MatchOutcome, MatchSetup, Round,
    RoundSummary, Team, TurnReport, TurnRequest, TurnStatus,
};

use crate::api::{MatchHandle, ProgramProvider, ProviderRegistry, Result, RuntimeError};
use crate::oracle::MatchOracles;
use crate::repository::{MatchSink, MemorySink};
use crate::workers::{Command, SimulationWorker};

/// Runner configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub command_buffer_size: usize,
    /// Wall-clock limit per program turn. A program that overruns it forfeits
    /// the turn with [`TurnStatus::BudgetExhausted`].
    pub turn_timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
            turn_timeout: None,
        }
    }
}

/// How a finished match ended.
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub outcome: MatchOutcome,
    pub rounds_played: Round,
    pub final_state: GameState,
}

impl MatchReport {
    pub fn state_digest(&self) -> String {
        hex::encode(self.final_state.digest())
    }
}

/// Drives one match from setup to footer.
///
/// Design: the runner owns providers and the sink; the worker owns the state.
/// [`MatchHandle`] provides a cloneable façade for clients.
pub struct MatchRunner {
    handle: MatchHandle,
    header: MatchHeader,
    providers: ProviderRegistry,
    sink: Box<dyn MatchSink>,
    config: RunnerConfig,
    header_written: bool,
    outcome: Option<MatchOutcome>,
    sim_worker_handle: JoinHandle<()>,
}

impl MatchRunner {
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    /// Get a cloneable handle to this match.
    ///
    /// Resignations, forced ends and external controls issued through it are
    /// processed between turns, in the order they arrive.
    pub fn handle(&self) -> MatchHandle {
        self.handle.clone()
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Plays one full round and persists its record.
    pub async fn play_round(&mut self) -> Result<RoundSummary> {
        if !self.header_written {
            self.handle.start().await?;
            self.sink.write(&LogRecord::Header(self.header.clone()))?;
            self.header_written = true;
        }

        self.handle.begin_round().await?;
        while let Some(request) = self.handle.next_turn().await? {
            let report = run_turn(&self.providers, self.config.turn_timeout, &request).await;
            let summary = self.handle.submit_turn(report).await?;
            if !summary.rejections.is_empty() {
                debug!(
                    target: "runtime::runner",
                    robot = %summary.robot,
                    rejected = summary.rejections.len(),
                    accepted = summary.accepted,
                    "turn had rejected actions"
                );
            }
        }
        let summary = self.handle.end_round().await?;

        self.sink.write(&LogRecord::Round(summary.record.clone()))?;
        if let Some(outcome) = summary.outcome {
            let state = self.handle.query_state().await?;
            self.sink
                .write(&LogRecord::Footer(MatchFooter::new(&outcome, &state)))?;
            self.outcome = Some(outcome);
            info!(
                target: "runtime::runner",
                winner = %outcome.winner,
                factor = %outcome.factor,
                round = outcome.round,
                "match finished"
            );
        }
        self.sink.flush()?;

        Ok(summary)
    }

    /// Plays rounds until the match ends, then shuts the worker down.
    pub async fn run(mut self) -> Result<MatchReport> {
        let outcome = loop {
            if let Some(outcome) = self.outcome {
                break outcome;
            }
            self.play_round().await?;
        };

        let final_state = self.handle.query_state().await?;
        self.shutdown().await?;

        Ok(MatchReport {
            outcome,
            rounds_played: final_state.round(),
            final_state,
        })
    }

    /// Shutdown the runner gracefully, flushing the sink.
    ///
    /// The worker exits once every cloned [`MatchHandle`] is dropped.
    pub async fn shutdown(mut self) -> Result<()> {
        self.sink.flush()?;
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Runs the acting robot's program. Crashes and overruns become empty
/// reports carrying the matching status.
async fn run_turn(
    providers: &ProviderRegistry,
    turn_timeout: Option<Duration>,
    request: &TurnRequest,
) -> TurnReport {
    let team = request.robot.team;
    let provider = providers.get(team);

    let result = match turn_timeout {
        Some(limit) => match tokio::time::timeout(limit, provider.run_turn(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    target: "runtime::runner",
                    robot = %request.robot.id,
                    ?limit,
                    "program overran its turn"
                );
                return TurnReport::default().with_status(TurnStatus::BudgetExhausted);
            }
        },
        None => provider.run_turn(request).await,
    };

    match result {
        Ok(report) => report,
        Err(error) => {
            warn!(
                target: "runtime::runner",
                robot = %request.robot.id,
                %team,
                %error,
                "program crashed"
            );
            TurnReport::default().with_status(TurnStatus::Crashed)
        }
    }
}

/// Builder for [`MatchRunner`].
pub struct RunnerBuilder {
    config: RunnerConfig,
    setup: Option<MatchSetup>,
    providers: ProviderRegistry,
    sink: Option<Box<dyn MatchSink>>,
}

impl RunnerBuilder {
    fn new() -> Self {
        Self {
            config: RunnerConfig::default(),
            setup: None,
            providers: ProviderRegistry::new(),
            sink: None,
        }
    }

    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    /// Match setup to validate and play (required).
    pub fn setup(mut self, setup: MatchSetup) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Program provider for one team. Unbound teams idle.
    pub fn provider(mut self, team: Team, provider: impl ProgramProvider + 'static) -> Self {
        self.providers.register(team, provider);
        self
    }

    pub fn providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    /// Destination for the match log. Defaults to a [`MemorySink`].
    pub fn sink(mut self, sink: impl MatchSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Validates the setup and spawns the simulation worker.
    pub async fn build(self) -> Result<MatchRunner> {
        let setup = self.setup.ok_or(RuntimeError::MissingSetup)?;
        let state = GameState::from_setup(&setup).map_err(RuntimeError::InitialState)?;
        let oracles = MatchOracles::from_setup(&setup);

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let handle = MatchHandle::new(command_tx);

        let sim_worker = SimulationWorker::new(state, oracles, command_rx);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        let sink: Box<dyn MatchSink> = match self.sink {
            Some(sink) => sink,
            None => Box::new(MemorySink::new()),
        };

        Ok(MatchRunner {
            handle,
            header: MatchHeader::from_setup(&setup),
            providers: self.providers,
            sink,
            config: self.config,
            header_written: false,
            outcome: None,
            sim_worker_handle,
        })
    }
}
