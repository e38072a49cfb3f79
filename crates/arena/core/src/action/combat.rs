use crate::config::GameConfig;
use crate::rules::{combat, geometry};
use crate::signal::{Hit, Signal};
use crate::state::{EntityId, Level, Position};

use super::{ActionContext, ActionPlan, Planned, RejectReason};

pub(super) fn plan_attack(ctx: &ActionContext<'_>, target: Position, level: Level) -> Planned {
    let attacker = ctx.robot;
    let stats = attacker.stats();

    if !stats.can_attack(level) {
        return Err(RejectReason::NotApplicable);
    }
    if !attacker.is_attack_idle() {
        return Err(RejectReason::Cooldown);
    }
    if !ctx.map.contains(target) {
        return Err(RejectReason::OutOfBounds);
    }
    if !geometry::in_attack_range(stats, attacker.position, target)
        || !geometry::in_attack_arc(stats, attacker.position, attacker.direction, target)
    {
        return Err(RejectReason::OutOfRange);
    }

    let hits = if combat::hits_area(attacker.robot_type) {
        area_targets(ctx, level)
            .into_iter()
            .filter_map(|id| resolve_hit(ctx, id, stats.attack_power))
            .collect()
    } else {
        ctx.state
            .occupant(target, level)
            .and_then(|id| resolve_hit(ctx, id, stats.attack_power))
            .into_iter()
            .collect()
    };

    Ok(ActionPlan::immediate(vec![Signal::Attack {
        attacker: attacker.id,
        target,
        level,
        hits,
    }]))
}

/// Every entity on `level` inside the attacker's band and arc, by ID.
fn area_targets(ctx: &ActionContext<'_>, level: Level) -> Vec<EntityId> {
    let attacker = ctx.robot;
    let stats = attacker.stats();
    let mut targets: Vec<EntityId> = ctx
        .state
        .world()
        .tile_map
        .occupancy()
        .iter()
        .filter(|(pos, _)| {
            geometry::in_attack_range(stats, attacker.position, **pos)
                && geometry::in_attack_arc(stats, attacker.position, attacker.direction, **pos)
        })
        .filter_map(|(_, slots)| slots.get(level))
        .filter(|id| *id != attacker.id)
        .collect();
    targets.sort();
    targets
}

/// Damage an attack of `power` deals to `target`, or `None` when it cannot
/// be hurt by this attacker.
fn resolve_hit(ctx: &ActionContext<'_>, target: EntityId, power: f64) -> Option<Hit> {
    let round = ctx.state.round();
    if let Some(robot) = ctx.state.robot(target) {
        // Towers only take damage from teams whose supply reaches them.
        if robot.robot_type.is_structure()
            && !ctx
                .state
                .schedule()
                .is_connected(robot.position, ctx.robot.team)
        {
            return None;
        }
        return Some(Hit {
            target,
            damage: combat::attack_damage(robot, power, round),
            buff: combat::on_hit_buff(ctx.robot.robot_type, &ctx.state.config, round),
        });
    }
    ctx.state.tree(target).map(|_| Hit {
        target,
        damage: power,
        buff: None,
    })
}

pub(super) fn plan_self_destruct(ctx: &ActionContext<'_>) -> Planned {
    let robot = ctx.robot;
    if robot.robot_type.is_structure() {
        return Err(RejectReason::NotApplicable);
    }

    let round = ctx.state.round();
    let blast = combat::self_destruct_damage(&ctx.state.config, robot.health);
    let mut hits: Vec<Hit> = Vec::new();
    for (pos, slots) in ctx.state.world().tile_map.occupancy() {
        if !geometry::within_radius(robot.position, *pos, GameConfig::SELF_DESTRUCT_RADIUS_SQUARED) {
            continue;
        }
        for id in [slots.ground, slots.air].into_iter().flatten() {
            if id == robot.id {
                continue;
            }
            let damage = match ctx.state.robot(id) {
                Some(victim) => combat::attack_damage(victim, blast, round),
                None => blast,
            };
            hits.push(Hit {
                target: id,
                damage,
                buff: None,
            });
        }
    }
    hits.sort_by_key(|h| h.target);

    Ok(ActionPlan::immediate(vec![Signal::SelfDestruct {
        robot: robot.id,
        location: robot.position,
        hits,
    }]))
}
