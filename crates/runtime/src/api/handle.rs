//! Cloneable façade for issuing commands to a running match.
//!
//! [`MatchHandle`] hides channel plumbing and offers async helpers for
//! stepping the engine phase by phase or steering the match from outside.
use tokio::sync::{mpsc, oneshot};

use arena_core::{
    EngineError, EntityId, GameState, Position, RoundSummary, Team, TurnReport, TurnRequest,
    TurnSummary,
};

use super::errors::{Result, RuntimeError};
use crate::workers::Command;

/// Client-facing handle to a match owned by a simulation worker.
#[derive(Clone)]
pub struct MatchHandle {
    command_tx: mpsc::Sender<Command>,
}

impl MatchHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<std::result::Result<T, EngineError>>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        Ok(reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)??)
    }

    pub async fn start(&self) -> Result<()> {
        self.request(|reply| Command::Start { reply }).await
    }

    pub async fn begin_round(&self) -> Result<()> {
        self.request(|reply| Command::BeginRound { reply }).await
    }

    /// Opens the next turn, or returns `None` once the round has no robots
    /// left to act.
    pub async fn next_turn(&self) -> Result<Option<TurnRequest>> {
        self.request(|reply| Command::NextTurn { reply }).await
    }

    pub async fn submit_turn(&self, report: TurnReport) -> Result<TurnSummary> {
        self.request(|reply| Command::SubmitTurn { report, reply })
            .await
    }

    pub async fn end_round(&self) -> Result<RoundSummary> {
        self.request(|reply| Command::EndRound { reply }).await
    }

    /// Concedes for `team`; takes effect when the current round ends.
    pub async fn resign(&self, team: Team) -> Result<()> {
        self.request(|reply| Command::Resign { team, reply }).await
    }

    /// Ends the match after the current round, decided by tie-break.
    pub async fn force_end(&self) -> Result<()> {
        self.request(|reply| Command::ForceEnd { reply }).await
    }

    pub async fn set_control_bits(&self, robot: EntityId, bits: u64) -> Result<()> {
        self.request(|reply| Command::SetControlBits { robot, bits, reply })
            .await
    }

    pub async fn override_movement(&self, robot: EntityId, to: Position) -> Result<()> {
        self.request(|reply| Command::OverrideMovement { robot, to, reply })
            .await
    }

    /// Query the current match state (read-only snapshot).
    pub async fn query_state(&self) -> Result<GameState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
