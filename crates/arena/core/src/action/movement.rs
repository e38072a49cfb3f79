use crate::signal::Signal;
use crate::state::Direction;

use super::{ActionContext, ActionPlan, Planned, RejectReason};

/// Common gate for anything that uses the movement timer.
fn check_movement_ready(ctx: &ActionContext<'_>) -> Result<(), RejectReason> {
    if ctx.robot.robot_type.is_structure() {
        return Err(RejectReason::NotApplicable);
    }
    if ctx.pending_move.is_some() || !ctx.robot.is_movement_idle() {
        return Err(RejectReason::Cooldown);
    }
    Ok(())
}

pub(super) fn plan_move(ctx: &ActionContext<'_>, direction: Direction) -> Planned {
    check_movement_ready(ctx)?;
    if direction.is_none() {
        return Err(RejectReason::InvalidArgument);
    }

    let robot = ctx.robot;
    let stats = robot.stats();
    let level = robot.level();
    let to = robot.position.add(direction);

    if !ctx.map.contains(to) {
        return Err(RejectReason::OutOfBounds);
    }
    if !ctx.map.is_traversable(to, level) {
        return Err(RejectReason::Impassable);
    }
    if ctx.is_taken(to, level) {
        return Err(RejectReason::Occupied);
    }
    if ctx.available_flux() < stats.move_cost {
        return Err(RejectReason::InsufficientResource);
    }

    let delay = if direction.is_diagonal() {
        stats.move_delay_diagonal
    } else {
        stats.move_delay_orthogonal
    };

    Ok(ActionPlan::deferred(Signal::Movement {
        robot: robot.id,
        from: robot.position,
        to,
        direction,
        delay,
        cost: stats.move_cost,
    }))
}

/// Turning in place costs one round of movement time and no flux.
pub(super) fn plan_set_direction(ctx: &ActionContext<'_>, direction: Direction) -> Planned {
    check_movement_ready(ctx)?;
    if direction.is_none() {
        return Err(RejectReason::InvalidArgument);
    }

    Ok(ActionPlan::deferred(Signal::Movement {
        robot: ctx.robot.id,
        from: ctx.robot.position,
        to: ctx.robot.position,
        direction,
        delay: 1,
        cost: 0.0,
    }))
}
