//! The single mutator of world state.
//!
//! Every variant is validated in full before anything is written, so a
//! failed application leaves the state untouched. Lethal outcomes are
//! reported as [`Casualty`] entries; the engine turns them into `Death`
//! signals within the same step.

use crate::catalog::RobotType;
use crate::config::GameConfig;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{
    DirtyFlags, EntityId, Envelope, GameState, Level, Position, Robot, Team,
};

use super::{DeathCause, EconomyOp, HealthCause, Hit, Signal};

/// Entity whose health reached a terminal value while applying a signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Casualty {
    pub victim: EntityId,
    pub team: Team,
    pub killer: Option<EntityId>,
    /// Team credited with the kill; receives tree payloads.
    pub killer_team: Team,
    pub cause: DeathCause,
}

/// Side effects of one application that the engine must follow up on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyOutcome {
    pub casualties: Vec<Casualty>,
}

impl ApplyOutcome {
    fn push(&mut self, casualty: Casualty) {
        if !self.casualties.iter().any(|c| c.victim == casualty.victim) {
            self.casualties.push(casualty);
        }
    }
}

/// Signal could not be applied to the current state.
///
/// Live signals are built from the same state they are applied to, so any of
/// these indicates a kernel bug or a log replayed over the wrong setup.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ApplyError {
    #[error("{signal} signal names unknown entity {id}")]
    UnknownEntity {
        signal: &'static str,
        id: EntityId,
        context: ErrorContext,
    },

    #[error("{signal} signal reuses live entity id {id}")]
    DuplicateEntity {
        signal: &'static str,
        id: EntityId,
        context: ErrorContext,
    },

    #[error("{signal} signal targets occupied {level:?} slot")]
    SlotOccupied {
        signal: &'static str,
        level: Level,
        context: ErrorContext,
    },

    #[error("indicator index {index} out of range")]
    IndicatorIndex { index: usize, context: ErrorContext },
}

impl GameError for ApplyError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::UnknownEntity { context, .. }
            | Self::DuplicateEntity { context, .. }
            | Self::SlotOccupied { context, .. }
            | Self::IndicatorIndex { context, .. } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity { .. } => "APPLY_UNKNOWN_ENTITY",
            Self::DuplicateEntity { .. } => "APPLY_DUPLICATE_ENTITY",
            Self::SlotOccupied { .. } => "APPLY_SLOT_OCCUPIED",
            Self::IndicatorIndex { .. } => "APPLY_INDICATOR_INDEX",
        }
    }
}

/// Applies `signal` to `state`.
///
/// # Errors
///
/// Returns [`ApplyError`] if the signal does not fit the state. The state is
/// unchanged in that case.
pub fn apply(signal: &Signal, state: &mut GameState) -> Result<ApplyOutcome, ApplyError> {
    let kind = signal.kind();
    let mut outcome = ApplyOutcome::default();
    tracing::trace!(round = state.round, signal = kind, "apply");

    match signal {
        Signal::Movement {
            robot: id,
            to,
            direction,
            delay,
            cost,
            ..
        } => {
            relocate(state, kind, *id, *to)?;
            let (width, height) = state.dimensions();
            let r = robot_mut(state, kind, *id)?;
            r.direction = *direction;
            r.movement_idle = *delay;
            r.adjust_flux(-cost);
            r.remember_surroundings(width, height);
        }

        Signal::Attack { attacker, hits, .. } => {
            let (team, delay) = {
                let r = robot(state, kind, *attacker)?;
                (r.team, r.stats().attack_delay)
            };
            check_hits(state, kind, hits)?;
            robot_mut(state, kind, *attacker)?.attack_idle = delay;
            apply_hits(state, hits, *attacker, team, DeathCause::Attack, &mut outcome);
        }

        Signal::Broadcast {
            sender,
            message,
            recipients,
            cost,
        } => {
            robot(state, kind, *sender)?;
            for id in recipients {
                robot(state, kind, *id)?;
            }
            let round = state.round;
            let s = robot_mut(state, kind, *sender)?;
            s.has_broadcast = true;
            s.adjust_flux(-cost);
            for id in recipients {
                if let Some(r) = state.entities.robot_mut(*id) {
                    r.inbox.push(Envelope {
                        sender: *sender,
                        round,
                        message: message.clone(),
                    });
                }
            }
        }

        Signal::Spawn {
            parent,
            robot: id,
            robot_type,
            team,
            location,
            direction,
            cost,
            wake_delay,
        } => {
            if let Some(parent) = parent {
                robot(state, kind, *parent)?;
            }
            create_robot(state, kind, *id, *robot_type, *team, *location, |r| {
                r.direction = *direction;
                r.movement_idle = *wake_delay;
                r.attack_idle = *wake_delay;
            })?;
            if let Some(parent) = parent {
                robot_mut(state, kind, *parent)?.adjust_flux(-cost);
            }
        }

        Signal::Build {
            robot: id,
            robot_type,
            team,
            location,
            builder,
        } => {
            robot(state, kind, *builder)?;
            create_robot(state, kind, *id, *robot_type, *team, *location, |_| {})?;
        }

        Signal::Death { victim, .. } => remove_entity(state, kind, *victim)?,

        Signal::SelfDestruct { robot: id, hits, .. } => {
            let team = robot(state, kind, *id)?.team;
            check_hits(state, kind, hits)?;
            apply_hits(state, hits, *id, team, DeathCause::Blast, &mut outcome);
            robot_mut(state, kind, *id)?.set_health(0.0);
            outcome.push(Casualty {
                victim: *id,
                team,
                killer: Some(*id),
                killer_team: team,
                cause: DeathCause::SelfDestruct,
            });
        }

        Signal::HealthChange { entries, cause } => {
            for entry in entries {
                robot(state, kind, entry.id)?;
            }
            for entry in entries {
                let Some(r) = state.entities.robot_mut(entry.id) else {
                    continue;
                };
                let lethal = r.set_health(entry.health);
                match cause {
                    HealthCause::Regeneration => r.regen = false,
                    HealthCause::Report => r.dirty = DirtyFlags::empty(),
                    HealthCause::Disconnected => {}
                }
                if lethal {
                    outcome.push(Casualty {
                        victim: r.id,
                        team: r.team,
                        killer: None,
                        killer_team: Team::Neutral,
                        cause: DeathCause::Disconnected,
                    });
                }
            }
        }

        Signal::ControlBitsChange { robot: id, bits } => {
            robot_mut(state, kind, *id)?.control_bits = *bits;
        }

        Signal::BytecodesUsed { robot: id, bytecodes } => {
            robot_mut(state, kind, *id)?.bytecodes_used = *bytecodes;
        }

        Signal::IndicatorString {
            robot: id,
            index,
            text,
        } => {
            if *index >= GameConfig::NUMBER_OF_INDICATOR_STRINGS {
                return Err(ApplyError::IndicatorIndex {
                    index: *index,
                    context: ErrorContext::new(state.round).with_actor(*id),
                });
            }
            robot_mut(state, kind, *id)?.indicator_strings[*index] = text.clone();
        }

        // Viewer-only annotations.
        Signal::IndicatorDot { .. }
        | Signal::IndicatorLine { .. }
        | Signal::MatchObservation { .. } => {}

        Signal::TeamResourceChange { team, delta, .. } => state.ledger.adjust(*team, *delta),

        Signal::FluxChange {
            robot: id,
            delta,
            op,
        } => {
            let r = robot_mut(state, kind, *id)?;
            r.adjust_flux(*delta);
            match op {
                EconomyOp::Upkeep => r.upkeep_paid = true,
                EconomyOp::UpkeepMissed => r.upkeep_paid = false,
                _ => {}
            }
        }

        Signal::MovementOverride { robot: id, to } => {
            relocate(state, kind, *id, *to)?;
            let (width, height) = state.dimensions();
            robot_mut(state, kind, *id)?.remember_surroundings(width, height);
        }

        Signal::TreeGrowth { tree, amount } => {
            let cap = state.config.tree_max_health;
            let t = tree_mut(state, kind, *tree)?;
            t.age += 1;
            t.set_health(t.health + amount, cap);
        }

        Signal::TreeDecay { tree, amount } => {
            let cap = state.config.tree_max_health;
            let t = tree_mut(state, kind, *tree)?;
            t.age += 1;
            if t.set_health(t.health - amount, cap) {
                outcome.push(Casualty {
                    victim: t.id,
                    team: t.team,
                    killer: None,
                    killer_team: Team::Neutral,
                    cause: DeathCause::Decay,
                });
            }
        }

        Signal::TreeWater {
            robot: id,
            tree,
            amount,
        } => {
            robot(state, kind, *id)?;
            let cap = state.config.tree_max_health;
            let t = tree_mut(state, kind, *tree)?;
            t.set_health(t.health + amount, cap);
            robot_mut(state, kind, *id)?.attack_idle = 1;
        }

        Signal::Regen {
            source,
            targets,
            cost,
        } => {
            robot(state, kind, *source)?;
            for id in targets {
                robot(state, kind, *id)?;
            }
            robot_mut(state, kind, *source)?.adjust_flux(-cost);
            for id in targets {
                if let Some(r) = state.entities.robot_mut(*id) {
                    r.regen = true;
                }
            }
        }

        Signal::TeamMemory {
            team,
            index,
            value,
            mask,
        } => state.ledger.write_memory(*team, *index, *value, *mask),

        Signal::RobotInfo {
            robot: id,
            flux,
            movement_idle,
            attack_idle,
            upkeep_paid,
        } => {
            let r = robot_mut(state, kind, *id)?;
            r.set_flux(*flux);
            r.movement_idle = *movement_idle;
            r.attack_idle = *attack_idle;
            r.upkeep_paid = *upkeep_paid;
            r.has_broadcast = false;
            r.inbox.clear();
        }
    }

    Ok(outcome)
}

fn unknown(state: &GameState, signal: &'static str, id: EntityId) -> ApplyError {
    ApplyError::UnknownEntity {
        signal,
        id,
        context: ErrorContext::new(state.round).with_actor(id),
    }
}

fn robot<'s>(
    state: &'s GameState,
    signal: &'static str,
    id: EntityId,
) -> Result<&'s Robot, ApplyError> {
    state
        .entities
        .robot(id)
        .ok_or_else(|| unknown(state, signal, id))
}

fn robot_mut<'s>(
    state: &'s mut GameState,
    signal: &'static str,
    id: EntityId,
) -> Result<&'s mut Robot, ApplyError> {
    let round = state.round;
    state
        .entities
        .robot_mut(id)
        .ok_or(ApplyError::UnknownEntity {
            signal,
            id,
            context: ErrorContext::new(round).with_actor(id),
        })
}

fn tree_mut<'s>(
    state: &'s mut GameState,
    signal: &'static str,
    id: EntityId,
) -> Result<&'s mut crate::state::Tree, ApplyError> {
    let round = state.round;
    state
        .entities
        .tree_mut(id)
        .ok_or(ApplyError::UnknownEntity {
            signal,
            id,
            context: ErrorContext::new(round).with_actor(id),
        })
}

fn check_hits(state: &GameState, signal: &'static str, hits: &[Hit]) -> Result<(), ApplyError> {
    for hit in hits {
        if !state.entities.contains(hit.target) {
            return Err(unknown(state, signal, hit.target));
        }
    }
    Ok(())
}

/// Subtracts pre-resolved damage. Callers validate targets first.
fn apply_hits(
    state: &mut GameState,
    hits: &[Hit],
    source: EntityId,
    source_team: Team,
    cause: DeathCause,
    outcome: &mut ApplyOutcome,
) {
    let round = state.round;
    let cap = state.config.tree_max_health;
    for hit in hits {
        if let Some(r) = state.entities.robot_mut(hit.target) {
            if let Some(buff) = hit.buff {
                r.buffs.add(buff, round);
            }
            if r.set_health(r.health - hit.damage) {
                outcome.push(Casualty {
                    victim: r.id,
                    team: r.team,
                    killer: Some(source),
                    killer_team: source_team,
                    cause,
                });
            }
        } else if let Some(t) = state.entities.tree_mut(hit.target) {
            if t.set_health(t.health - hit.damage, cap) {
                outcome.push(Casualty {
                    victim: t.id,
                    team: t.team,
                    killer: Some(source),
                    killer_team: source_team,
                    cause,
                });
            }
        }
    }
}

/// Moves a robot's occupancy entry. No-op when `to` is its current tile.
fn relocate(
    state: &mut GameState,
    signal: &'static str,
    id: EntityId,
    to: Position,
) -> Result<(), ApplyError> {
    let (from, level) = {
        let r = robot(state, signal, id)?;
        (r.position, r.level())
    };
    if from == to {
        return Ok(());
    }
    if !state.world.tile_map.is_free(to, level) {
        return Err(ApplyError::SlotOccupied {
            signal,
            level,
            context: ErrorContext::new(state.round)
                .with_actor(id)
                .with_position(to),
        });
    }
    state.world.tile_map.remove(from, level, id);
    state.world.tile_map.place(to, level, id);
    robot_mut(state, signal, id)?.position = to;
    Ok(())
}

fn create_robot(
    state: &mut GameState,
    signal: &'static str,
    id: EntityId,
    robot_type: RobotType,
    team: Team,
    location: Position,
    init: impl FnOnce(&mut Robot),
) -> Result<(), ApplyError> {
    if state.entities.contains(id) {
        return Err(ApplyError::DuplicateEntity {
            signal,
            id,
            context: ErrorContext::new(state.round).with_actor(id),
        });
    }
    let level = robot_type.level();
    if !state.world.tile_map.is_free(location, level) {
        return Err(ApplyError::SlotOccupied {
            signal,
            level,
            context: ErrorContext::new(state.round)
                .with_actor(id)
                .with_position(location),
        });
    }

    let (width, height) = state.dimensions();
    let mut robot = Robot::new(id, team, robot_type, location);
    init(&mut robot);
    robot.remember_surroundings(width, height);
    state.world.tile_map.place(location, level, id);
    state.entities.robots.insert(id, robot);
    state.observe_id(id);
    Ok(())
}

fn remove_entity(
    state: &mut GameState,
    signal: &'static str,
    id: EntityId,
) -> Result<(), ApplyError> {
    if let Some(robot) = state.entities.robots.remove(&id) {
        state
            .world
            .tile_map
            .remove(robot.position, robot.level(), id);
        return Ok(());
    }
    if let Some(tree) = state.entities.trees.remove(&id) {
        state.world.tile_map.remove(tree.position, Level::Ground, id);
        return Ok(());
    }
    Err(unknown(state, signal, id))
}
