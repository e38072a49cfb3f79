//! Round scheduling and signal emission.
//!
//! The [`GameEngine`] is the only writer of [`GameState`] during a live
//! match. It drives the phase machine (begin round, one turn per robot, end
//! round), turns legal actions into signals, and records every applied
//! signal so the round can be sealed into the match log.

mod errors;
mod outcome;
mod round;
mod turns;

pub use errors::EngineError;
pub use outcome::{DominationFactor, MatchOutcome, tie_break};
pub use round::RoundSummary;
pub use turns::{ProgramExecutor, TurnReport, TurnRequest, TurnStatus, TurnSummary};

use crate::env::{GameEnv, MapOracle, SupplyNetwork};
use crate::signal::{Casualty, EconomyOp, Signal, apply};
use crate::state::{Direction, EntityId, GameState, MatchPhase, Position, Team};

/// Scheduler over a borrowed match state.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Moves the match from `NotStarted` to `Running`.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.state.phase {
            MatchPhase::NotStarted => {
                self.state.phase = MatchPhase::Running;
                tracing::info!(
                    seed = self.state.seed(),
                    robots = self.state.entities.robots.len(),
                    max_rounds = self.state.config.max_rounds,
                    "match started"
                );
                Ok(())
            }
            MatchPhase::Running => Ok(()),
            MatchPhase::Ended(_) => Err(EngineError::MatchEnded),
        }
    }

    /// Drives one whole round with a synchronous executor.
    pub fn run_round(
        &mut self,
        env: GameEnv<'_>,
        executor: &mut impl ProgramExecutor,
    ) -> Result<RoundSummary, EngineError> {
        self.begin_round(env)?;
        while let Some(request) = self.next_turn()? {
            let report = executor.execute(&request);
            self.submit_turn(env, report)?;
        }
        self.end_round(env)
    }

    /// Concedes the match for `team`. Honored at the end of the round.
    pub fn resign(&mut self, team: Team) -> Result<(), EngineError> {
        self.ensure_running()?;
        if team.is_player() && self.state.schedule.resigned.is_none() {
            tracing::info!(%team, round = self.state.round, "team resigned");
            self.state.schedule.resigned = Some(team);
        }
        Ok(())
    }

    /// Ends the match at the end of the current round via the tie-break.
    pub fn force_end(&mut self) -> Result<(), EngineError> {
        self.ensure_running()?;
        self.state.schedule.force_end = true;
        Ok(())
    }

    pub fn set_control_bits(&mut self, robot: EntityId, bits: u64) -> Result<(), EngineError> {
        self.ensure_running()?;
        if self.state.robot(robot).is_none() {
            return Err(EngineError::UnknownRobot(robot));
        }
        self.emit(Signal::ControlBitsChange { robot, bits })
    }

    /// Teleports a robot, leaving its timers untouched.
    pub fn override_movement(
        &mut self,
        env: GameEnv<'_>,
        robot: EntityId,
        to: Position,
    ) -> Result<(), EngineError> {
        self.ensure_running()?;
        let map = env.map()?;
        let level = self
            .state
            .robot(robot)
            .map(|r| r.level())
            .ok_or(EngineError::UnknownRobot(robot))?;
        let free = self.state.occupant(to, level).is_none_or(|id| id == robot);
        if !map.contains(to) || !map.is_traversable(to, level) || !free {
            return Err(EngineError::InvalidOverride {
                robot,
                position: to,
            });
        }
        self.emit(Signal::MovementOverride { robot, to })
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        match self.state.phase {
            MatchPhase::Running => Ok(()),
            MatchPhase::NotStarted => Err(EngineError::NotStarted),
            MatchPhase::Ended(_) => Err(EngineError::MatchEnded),
        }
    }

    /// Applies `signal`, records it, and buries whatever it killed.
    fn emit(&mut self, signal: Signal) -> Result<(), EngineError> {
        let outcome = apply(&signal, self.state)?;
        self.state.schedule.signals.push(signal);
        for casualty in outcome.casualties {
            self.bury(casualty)?;
        }
        Ok(())
    }

    /// Removes a dead entity. A destroyed tree hands its flux and any
    /// contained robot to the team that destroyed it.
    fn bury(&mut self, casualty: Casualty) -> Result<(), EngineError> {
        let payload = self
            .state
            .tree(casualty.victim)
            .map(|t| (t.position, t.contained_flux, t.contained_robot));

        tracing::debug!(
            victim = %casualty.victim,
            team = %casualty.team,
            cause = ?casualty.cause,
            round = self.state.round,
            "entity destroyed"
        );
        self.emit(Signal::Death {
            victim: casualty.victim,
            team: casualty.team,
            killer: casualty.killer,
            cause: casualty.cause,
        })?;

        let Some((location, flux, contained)) = payload else {
            return Ok(());
        };
        let heir = casualty.killer_team;
        if flux > 0.0 && heir.is_player() {
            self.emit(Signal::TeamResourceChange {
                team: heir,
                delta: flux,
                op: EconomyOp::Release,
            })?;
        }
        if let Some(robot_type) = contained {
            if self.state.occupant(location, robot_type.level()).is_some() {
                tracing::debug!(%location, ?robot_type, "released robot has no room");
                return Ok(());
            }
            self.emit(Signal::Spawn {
                parent: None,
                robot: self.state.peek_next_id(),
                robot_type,
                team: heir,
                location,
                direction: Direction::North,
                cost: 0.0,
                wake_delay: self.state.config.wake_delay,
            })?;
        }
        Ok(())
    }

    /// Recomputes which supply nodes are connected for each team.
    fn refresh_connectivity(&mut self, env: GameEnv<'_>) {
        let Some(network) = active_network(env) else {
            self.state.schedule.connectivity = None;
            return;
        };
        let entities = &self.state.entities;
        let tiles = &self.state.world.tile_map;
        let owner = |location: Position| {
            tiles
                .occupant(location, crate::state::Level::Ground)
                .and_then(|id| entities.robot(id))
                .filter(|r| r.robot_type.is_structure())
                .map(|r| r.team)
        };
        let sets = Team::PLAYERS.map(|team| network.connected_nodes(team, &owner));
        self.state.schedule.connectivity = Some(sets);
    }
}

/// The network oracle, ignoring an empty graph.
fn active_network<'a>(env: GameEnv<'a>) -> Option<&'a (dyn SupplyNetwork + 'a)> {
    env.network().filter(|n| !n.is_empty())
}
