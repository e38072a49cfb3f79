//! Action requests and their legality rules.
//!
//! A program's turn yields a list of [`Action`]s. Each is checked against the
//! current state by [`plan`]; a legal action becomes an [`ActionPlan`] of
//! signals for the engine to apply, an illegal one an [`ActionError`] naming
//! the reason. Planning never mutates state.
//!
//! # Module Structure
//!
//! - `movement`: Move, SetDirection (deferred to end of turn)
//! - `combat`: Attack, SelfDestruct
//! - `production`: Spawn, Construct
//! - `support`: Broadcast, Regenerate, WaterTree
//! - `annotation`: indicators, observations, team memory, resignation

mod annotation;
mod combat;
mod error;
mod movement;
mod production;
mod support;

pub use error::{ActionError, RejectReason};

use crate::catalog::RobotType;
use crate::env::{MapOracle, RngOracle, SupplyNetwork};
use crate::error::ErrorContext;
use crate::signal::{Rgb, Signal};
use crate::state::{Direction, EntityId, GameState, Level, Message, Position, Robot};

/// An action a robot's program may request during its turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Move(Direction),
    SetDirection(Direction),
    Attack { target: Position, level: Level },
    Broadcast(Message),
    Spawn {
        direction: Direction,
        robot_type: RobotType,
    },
    Construct {
        direction: Direction,
        robot_type: RobotType,
    },
    SelfDestruct,
    Regenerate,
    WaterTree { target: EntityId },
    SetIndicatorString { index: usize, text: String },
    SetIndicatorDot { location: Position, color: Rgb },
    SetIndicatorLine {
        from: Position,
        to: Position,
        color: Rgb,
    },
    AddMatchObservation(String),
    SetTeamMemory { index: usize, value: i64, mask: i64 },
    Resign,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Move(_) => "move",
            Action::SetDirection(_) => "set_direction",
            Action::Attack { .. } => "attack",
            Action::Broadcast(_) => "broadcast",
            Action::Spawn { .. } => "spawn",
            Action::Construct { .. } => "construct",
            Action::SelfDestruct => "self_destruct",
            Action::Regenerate => "regenerate",
            Action::WaterTree { .. } => "water_tree",
            Action::SetIndicatorString { .. } => "set_indicator_string",
            Action::SetIndicatorDot { .. } => "set_indicator_dot",
            Action::SetIndicatorLine { .. } => "set_indicator_line",
            Action::AddMatchObservation(_) => "add_match_observation",
            Action::SetTeamMemory { .. } => "set_team_memory",
            Action::Resign => "resign",
        }
    }
}

/// What a legal action turns into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionPlan {
    /// Applied immediately, in order.
    pub signals: Vec<Signal>,
    /// Movement held until end of turn.
    pub deferred: Option<Signal>,
    /// Random draws consumed while planning.
    pub draws: u64,
    pub resign: bool,
}

impl ActionPlan {
    fn immediate(signals: Vec<Signal>) -> Self {
        Self {
            signals,
            ..Self::default()
        }
    }

    fn deferred(signal: Signal) -> Self {
        Self {
            deferred: Some(signal),
            ..Self::default()
        }
    }
}

/// Read-only view used while planning one action.
pub struct ActionContext<'a> {
    pub state: &'a GameState,
    pub map: &'a dyn MapOracle,
    pub network: Option<&'a dyn SupplyNetwork>,
    pub rng: &'a dyn RngOracle,
    pub robot: &'a Robot,
    /// Movement already queued this turn.
    pub pending_move: Option<&'a Signal>,
}

impl ActionContext<'_> {
    /// Flux left after the cost of this turn's pending move.
    pub(crate) fn available_flux(&self) -> f64 {
        match self.pending_move {
            Some(Signal::Movement { cost, .. }) => self.robot.flux - cost,
            _ => self.robot.flux,
        }
    }

    /// True when `location` on `level` is held, or claimed by this turn's
    /// pending move.
    pub(crate) fn is_taken(&self, location: Position, level: Level) -> bool {
        if !self.state.world().tile_map.is_free(location, level) {
            return true;
        }
        matches!(
            self.pending_move,
            Some(Signal::Movement { to, .. }) if *to == location && self.robot.level() == level
        )
    }
}

/// Checks `action` for the context's robot and plans its signals.
///
/// # Errors
///
/// Returns [`ActionError`] with the rejection reason; nothing is planned.
pub fn plan(ctx: &ActionContext<'_>, action: &Action) -> Result<ActionPlan, ActionError> {
    let result = match action {
        Action::Move(direction) => movement::plan_move(ctx, *direction),
        Action::SetDirection(direction) => movement::plan_set_direction(ctx, *direction),
        Action::Attack { target, level } => combat::plan_attack(ctx, *target, *level),
        Action::SelfDestruct => combat::plan_self_destruct(ctx),
        Action::Spawn {
            direction,
            robot_type,
        } => production::plan_spawn(ctx, *direction, *robot_type),
        Action::Construct {
            direction,
            robot_type,
        } => production::plan_construct(ctx, *direction, *robot_type),
        Action::Broadcast(message) => support::plan_broadcast(ctx, message),
        Action::Regenerate => support::plan_regenerate(ctx),
        Action::WaterTree { target } => support::plan_water(ctx, *target),
        Action::SetIndicatorString { index, text } => {
            annotation::plan_indicator_string(ctx, *index, text)
        }
        Action::SetIndicatorDot { location, color } => Ok(ActionPlan::immediate(vec![
            Signal::IndicatorDot {
                robot: ctx.robot.id,
                location: *location,
                color: *color,
            },
        ])),
        Action::SetIndicatorLine { from, to, color } => Ok(ActionPlan::immediate(vec![
            Signal::IndicatorLine {
                robot: ctx.robot.id,
                from: *from,
                to: *to,
                color: *color,
            },
        ])),
        Action::AddMatchObservation(observation) => Ok(ActionPlan::immediate(vec![
            Signal::MatchObservation {
                robot: ctx.robot.id,
                observation: observation.clone(),
            },
        ])),
        Action::SetTeamMemory { index, value, mask } => {
            annotation::plan_team_memory(ctx, *index, *value, *mask)
        }
        Action::Resign => annotation::plan_resign(ctx),
    };

    result.map_err(|reason| {
        ActionError::new(
            ctx.robot.id,
            action.name(),
            reason,
            ErrorContext::new(ctx.state.round()).with_actor(ctx.robot.id).with_position(ctx.robot.position),
        )
    })
}

/// Shorthand for the rule modules.
pub(crate) type Planned = Result<ActionPlan, RejectReason>;

/// Adjacent build/spawn location in `direction`.
pub(crate) fn adjacent_site(
    ctx: &ActionContext<'_>,
    direction: Direction,
    level: Level,
) -> Result<Position, RejectReason> {
    if direction.is_none() {
        return Err(RejectReason::InvalidArgument);
    }
    let site = ctx.robot.position.add(direction);
    if !ctx.map.contains(site) {
        return Err(RejectReason::OutOfBounds);
    }
    if !ctx.map.is_traversable(site, level) {
        return Err(RejectReason::Impassable);
    }
    if ctx.is_taken(site, level) {
        return Err(RejectReason::Occupied);
    }
    Ok(site)
}
