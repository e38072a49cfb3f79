use crate::env::GameEnv;
use crate::rules::{combat, trees};
use crate::signal::{EconomyOp, HealthCause, HealthEntry, RoundRecord, Signal};
use crate::state::{DirtyFlags, EntityId, MatchPhase, Team};

use super::{DominationFactor, EngineError, GameEngine, MatchOutcome, tie_break};

/// Result of sealing a round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundSummary {
    pub record: RoundRecord,
    /// Set when this round ended the match.
    pub outcome: Option<MatchOutcome>,
}

impl GameEngine<'_> {
    /// Opens the next round: buff expiry, tower regeneration, tree
    /// growth and decay, supply connectivity, then the turn order.
    pub fn begin_round(&mut self, env: GameEnv<'_>) -> Result<(), EngineError> {
        self.ensure_running()?;
        if self.state.schedule.in_round {
            return Err(EngineError::RoundInProgress);
        }

        self.state.round += 1;
        let round = self.state.round;
        self.state.prune_buffs(round);

        let schedule = &mut self.state.schedule;
        schedule.in_round = true;
        schedule.turn_order.clear();
        schedule.cursor = 0;
        schedule.active = None;

        // Towers have no turn, so their queued regeneration lands here.
        let regen_amount = self.state.config.regen_amount;
        let entries: Vec<HealthEntry> = self
            .state
            .entities
            .robots()
            .filter(|r| r.regen && r.robot_type.is_structure())
            .map(|r| HealthEntry {
                id: r.id,
                health: (r.health + regen_amount).min(r.max_health()),
            })
            .collect();
        if !entries.is_empty() {
            self.emit(Signal::HealthChange {
                entries,
                cause: HealthCause::Regeneration,
            })?;
        }

        self.step_trees()?;
        self.refresh_connectivity(env);

        self.state.schedule.turn_order = self
            .state
            .entities
            .robots()
            .filter(|r| r.robot_type.has_turn())
            .map(|r| r.id)
            .collect();

        tracing::debug!(
            round,
            turns = self.state.schedule.turn_order.len(),
            "round started"
        );
        Ok(())
    }

    fn step_trees(&mut self) -> Result<(), EngineError> {
        let ids: Vec<EntityId> = self.state.entities.trees().map(|t| t.id).collect();
        for id in ids {
            let Some(tree) = self.state.tree(id) else {
                continue;
            };
            let step = trees::tree_step(&self.state.config, tree);
            let signal = match step {
                trees::TreeStep::Grow(amount) => Signal::TreeGrowth { tree: id, amount },
                trees::TreeStep::Decay(amount) => Signal::TreeDecay { tree: id, amount },
            };
            self.emit(signal)?;

            let Some(tree) = self.state.tree(id) else {
                continue;
            };
            let amount = trees::tree_yield(&self.state.config, tree, step, tree.health);
            if amount > 0.0 {
                self.emit(Signal::TeamResourceChange {
                    team: tree.team,
                    delta: amount,
                    op: EconomyOp::Production,
                })?;
            }
        }
        Ok(())
    }

    /// Closes the round: supply damage, the health report, the termination
    /// check, and sealing of the round's signals.
    pub fn end_round(&mut self, env: GameEnv<'_>) -> Result<RoundSummary, EngineError> {
        self.ensure_running()?;
        if !self.state.schedule.in_round {
            return Err(EngineError::RoundNotOpen);
        }
        if let Some(active) = &self.state.schedule.active {
            return Err(EngineError::TurnInProgress {
                robot: active.robot,
            });
        }

        let round = self.state.round;
        self.refresh_connectivity(env);
        let damage = self.state.config.disconnected_node_damage;
        let schedule = &self.state.schedule;
        let entries: Vec<HealthEntry> = self
            .state
            .entities
            .robots()
            .filter(|r| r.robot_type.is_structure() && r.team.is_player())
            .filter(|r| !schedule.is_connected(r.position, r.team))
            .map(|r| HealthEntry {
                id: r.id,
                health: r.health - combat::attack_damage(r, damage, round),
            })
            .collect();
        if !entries.is_empty() {
            self.emit(Signal::HealthChange {
                entries,
                cause: HealthCause::Disconnected,
            })?;
        }

        let entries: Vec<HealthEntry> = self
            .state
            .entities
            .robots()
            .filter(|r| r.dirty.contains(DirtyFlags::HEALTH))
            .map(|r| HealthEntry {
                id: r.id,
                health: r.health,
            })
            .collect();
        if !entries.is_empty() {
            self.emit(Signal::HealthChange {
                entries,
                cause: HealthCause::Report,
            })?;
        }

        let outcome = self.check_termination(env)?;
        let record = RoundRecord {
            round,
            signals: std::mem::take(&mut self.state.schedule.signals),
        };
        self.state.schedule.in_round = false;
        self.state.schedule.turn_order.clear();

        if let Some(outcome) = outcome {
            tracing::info!(
                winner = %outcome.winner,
                factor = %outcome.factor,
                round,
                "match ended"
            );
            self.state.phase = MatchPhase::Ended(outcome);
        }

        Ok(RoundSummary { record, outcome })
    }

    /// Termination in priority order: forced end or round limit, then
    /// resignation, then lost archons.
    fn check_termination(&mut self, env: GameEnv<'_>) -> Result<Option<MatchOutcome>, EngineError> {
        let round = self.state.round;
        let schedule = &self.state.schedule;
        let decided = |winner: Team, factor: DominationFactor| {
            Some(MatchOutcome {
                winner,
                factor,
                round,
            })
        };

        if !schedule.force_end && round < self.state.config.max_rounds {
            if let Some(loser) = schedule.resigned {
                let winner = loser.opponent().unwrap_or(Team::Neutral);
                return Ok(decided(winner, DominationFactor::Resigned));
            }
            let a_lost = self.state.archon_count(Team::A) == 0;
            let b_lost = self.state.archon_count(Team::B) == 0;
            match (a_lost, b_lost) {
                (false, false) => return Ok(None),
                (true, false) => return Ok(decided(Team::B, DominationFactor::Destroyed)),
                (false, true) => return Ok(decided(Team::A, DominationFactor::Destroyed)),
                (true, true) => {}
            }
        }

        let (winner, factor) = tie_break(self.state, env.rng()?);
        if factor == DominationFactor::WonByDubiousReasons {
            self.state.next_draw();
        }
        Ok(decided(winner, factor))
    }
}
