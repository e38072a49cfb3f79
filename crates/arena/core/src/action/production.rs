use crate::catalog::RobotType;
use crate::env::{DrawPurpose, compute_seed};
use crate::signal::{EconomyOp, Signal};
use crate::state::{Direction, Level};

use super::{ActionContext, ActionPlan, Planned, RejectReason, adjacent_site};

/// Archon creates a mobile unit on an adjacent tile, paid from its own flux.
/// Archons themselves cannot be spawned.
///
/// The newborn's facing is a seeded draw, so the plan consumes one draw.
pub(super) fn plan_spawn(
    ctx: &ActionContext<'_>,
    direction: Direction,
    robot_type: RobotType,
) -> Planned {
    let parent = ctx.robot;
    if !parent.robot_type.is_producer() || robot_type.is_structure() || robot_type.is_producer() {
        return Err(RejectReason::NotApplicable);
    }
    if !parent.is_movement_idle() {
        return Err(RejectReason::Cooldown);
    }
    let location = adjacent_site(ctx, direction, robot_type.level())?;

    let cost = robot_type.stats().spawn_cost;
    if ctx.available_flux() < cost {
        return Err(RejectReason::InsufficientResource);
    }

    let state = ctx.state;
    let child = state.peek_next_id();
    let seed = compute_seed(state.seed(), state.draws, child.0, DrawPurpose::SpawnFacing);
    let facing = Direction::COMPASS[ctx.rng.choose_index(seed, Direction::COMPASS.len())];

    Ok(ActionPlan {
        signals: vec![Signal::Spawn {
            parent: Some(parent.id),
            robot: child,
            robot_type,
            team: parent.team,
            location,
            direction: facing,
            cost,
            wake_delay: state.config.wake_delay,
        }],
        draws: 1,
        ..ActionPlan::default()
    })
}

/// Archon builds a structure on an adjacent supply node, paid from the
/// team's ledger.
pub(super) fn plan_construct(
    ctx: &ActionContext<'_>,
    direction: Direction,
    robot_type: RobotType,
) -> Planned {
    let builder = ctx.robot;
    if !builder.robot_type.is_producer() || !robot_type.is_structure() {
        return Err(RejectReason::NotApplicable);
    }
    let location = adjacent_site(ctx, direction, Level::Ground)?;
    if let Some(network) = ctx.network {
        if !network.is_node(location) {
            return Err(RejectReason::NotApplicable);
        }
    }

    let cost = robot_type.stats().spawn_cost;
    if ctx.state.ledger().balance(builder.team) < cost {
        return Err(RejectReason::InsufficientResource);
    }

    Ok(ActionPlan::immediate(vec![
        Signal::TeamResourceChange {
            team: builder.team,
            delta: -cost,
            op: EconomyOp::Spend,
        },
        Signal::Build {
            builder: builder.id,
            robot: ctx.state.peek_next_id(),
            robot_type,
            team: builder.team,
            location,
        },
    ]))
}
