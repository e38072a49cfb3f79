//! Simulation worker that owns the authoritative [`arena_core::GameState`].
//!
//! Receives commands from [`MatchHandle`](crate::MatchHandle), drives
//! [`arena_core::GameEngine`] and replies over oneshot channels. Commands are
//! processed strictly in arrival order, so controls issued between two turns
//! land between those turns in the signal log.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use arena_core::{
    EngineError, EntityId, GameEngine, GameState, Position, RoundSummary, Team, TurnReport,
    TurnRequest, TurnSummary,
};

use crate::oracle::MatchOracles;

type Reply<T> = oneshot::Sender<Result<T, EngineError>>;

/// Commands that can be sent to the simulation worker.
pub enum Command {
    Start {
        reply: Reply<()>,
    },
    BeginRound {
        reply: Reply<()>,
    },
    /// Opens the next robot's turn, or `None` once every robot has acted.
    NextTurn {
        reply: Reply<Option<TurnRequest>>,
    },
    SubmitTurn {
        report: TurnReport,
        reply: Reply<TurnSummary>,
    },
    EndRound {
        reply: Reply<RoundSummary>,
    },
    Resign {
        team: Team,
        reply: Reply<()>,
    },
    ForceEnd {
        reply: Reply<()>,
    },
    SetControlBits {
        robot: EntityId,
        bits: u64,
        reply: Reply<()>,
    },
    OverrideMovement {
        robot: EntityId,
        to: Position,
        reply: Reply<()>,
    },
    /// Query the current match state (read-only).
    QueryState {
        reply: oneshot::Sender<GameState>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Start { .. } => "start",
            Command::BeginRound { .. } => "begin_round",
            Command::NextTurn { .. } => "next_turn",
            Command::SubmitTurn { .. } => "submit_turn",
            Command::EndRound { .. } => "end_round",
            Command::Resign { .. } => "resign",
            Command::ForceEnd { .. } => "force_end",
            Command::SetControlBits { .. } => "set_control_bits",
            Command::OverrideMovement { .. } => "override_movement",
            Command::QueryState { .. } => "query_state",
        }
    }
}

/// Background task that processes match commands.
///
/// The worker holds no providers and does no I/O; program execution and
/// persistence live in [`MatchRunner`](crate::MatchRunner).
pub struct SimulationWorker {
    state: GameState,
    oracles: MatchOracles,
    command_rx: mpsc::Receiver<Command>,
}

impl SimulationWorker {
    pub fn new(
        state: GameState,
        oracles: MatchOracles,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        tracing::info!(
            "SimulationWorker initialized with {} robots and {} trees",
            state.entities().robots().count(),
            state.entities().trees().count()
        );

        Self {
            state,
            oracles,
            command_rx,
        }
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(
            target: "runtime::worker",
            round = self.state.round(),
            "command channel closed, worker exiting"
        );
    }

    fn handle_command(&mut self, cmd: Command) {
        let name = cmd.name();
        let delivered = match cmd {
            Command::Start { reply } => reply.send(self.engine().start()).is_ok(),
            Command::BeginRound { reply } => {
                let env = self.oracles.as_game_env();
                let result = GameEngine::new(&mut self.state).begin_round(env);
                reply.send(result).is_ok()
            }
            Command::NextTurn { reply } => reply.send(self.engine().next_turn()).is_ok(),
            Command::SubmitTurn { report, reply } => {
                let env = self.oracles.as_game_env();
                let result = GameEngine::new(&mut self.state).submit_turn(env, report);
                reply.send(result).is_ok()
            }
            Command::EndRound { reply } => {
                let env = self.oracles.as_game_env();
                let result = GameEngine::new(&mut self.state).end_round(env);
                reply.send(result).is_ok()
            }
            Command::Resign { team, reply } => reply.send(self.engine().resign(team)).is_ok(),
            Command::ForceEnd { reply } => reply.send(self.engine().force_end()).is_ok(),
            Command::SetControlBits { robot, bits, reply } => reply
                .send(self.engine().set_control_bits(robot, bits))
                .is_ok(),
            Command::OverrideMovement { robot, to, reply } => {
                let env = self.oracles.as_game_env();
                let result = GameEngine::new(&mut self.state).override_movement(env, robot, to);
                reply.send(result).is_ok()
            }
            Command::QueryState { reply } => reply.send(self.state.clone()).is_ok(),
        };

        if !delivered {
            debug!(
                target: "runtime::worker",
                command = name,
                "reply channel closed (caller dropped)"
            );
        }
    }

    fn engine(&mut self) -> GameEngine<'_> {
        GameEngine::new(&mut self.state)
    }
}
