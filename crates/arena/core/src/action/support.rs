use crate::config::GameConfig;
use crate::rules::geometry;
use crate::signal::Signal;
use crate::state::{EntityId, Message};

use super::{ActionContext, ActionPlan, Planned, RejectReason};

/// One message per turn, heard by every other robot in range in ID order.
pub(super) fn plan_broadcast(ctx: &ActionContext<'_>, message: &Message) -> Planned {
    let sender = ctx.robot;
    let config = &ctx.state.config;
    if sender.has_broadcast {
        return Err(RejectReason::AlreadyBroadcast);
    }
    if ctx.available_flux() < config.broadcast_cost {
        return Err(RejectReason::InsufficientResource);
    }

    let recipients: Vec<EntityId> = ctx
        .state
        .entities()
        .robots()
        .filter(|r| r.id != sender.id)
        .filter(|r| {
            geometry::within_radius(sender.position, r.position, config.broadcast_radius_squared)
        })
        .map(|r| r.id)
        .collect();

    Ok(ActionPlan::immediate(vec![Signal::Broadcast {
        sender: sender.id,
        message: message.clone(),
        recipients,
        cost: config.broadcast_cost,
    }]))
}

/// Queues regeneration on friendly robots around an archon, itself included.
/// Towers stop accepting it once the time limit is reached.
pub(super) fn plan_regenerate(ctx: &ActionContext<'_>) -> Planned {
    let source = ctx.robot;
    let config = &ctx.state.config;
    if !source.robot_type.is_producer() {
        return Err(RejectReason::NotApplicable);
    }
    if ctx.available_flux() < config.regen_cost {
        return Err(RejectReason::InsufficientResource);
    }

    let towers_closed = config.time_limit_reached(ctx.state.round());
    let targets: Vec<EntityId> = ctx
        .state
        .entities()
        .team_robots(source.team)
        .filter(|r| geometry::within_radius(source.position, r.position, config.regen_radius_squared))
        .filter(|r| !(towers_closed && r.robot_type.is_structure()))
        .map(|r| r.id)
        .collect();

    Ok(ActionPlan::immediate(vec![Signal::Regen {
        source: source.id,
        targets,
        cost: config.regen_cost,
    }]))
}

pub(super) fn plan_water(ctx: &ActionContext<'_>, target: EntityId) -> Planned {
    let robot = ctx.robot;
    let Some(tree) = ctx.state.tree(target) else {
        return Err(RejectReason::InvalidArgument);
    };
    if !robot.is_attack_idle() {
        return Err(RejectReason::Cooldown);
    }
    if !geometry::within_radius(robot.position, tree.position, GameConfig::WATER_RADIUS_SQUARED) {
        return Err(RejectReason::OutOfRange);
    }

    Ok(ActionPlan::immediate(vec![Signal::TreeWater {
        robot: robot.id,
        tree: target,
        amount: ctx.state.config.tree_water_amount,
    }]))
}
