//! Damage resolution.

use crate::catalog::RobotType;
use crate::config::GameConfig;
use crate::state::{Buff, Robot, Round};

/// Damage actually dealt to a robot by an attack of `amount`.
#[inline]
pub fn damage_taken(amount: f64, damage_received_multiplier: f64) -> f64 {
    amount * (1.0 + damage_received_multiplier)
}

/// Attack damage against `target` in `round`, including its buffs.
pub fn attack_damage(target: &Robot, amount: f64, round: Round) -> f64 {
    damage_taken(amount, target.buffs.damage_received_multiplier(round))
}

/// Buff attached to robots hit by `attacker`.
pub fn on_hit_buff(attacker: RobotType, config: &GameConfig, round: Round) -> Option<Buff> {
    match attacker {
        RobotType::Disrupter => Some(Buff::disrupted(config, round)),
        _ => None,
    }
}

/// Blast damage of a self-destructing robot with `health` remaining.
pub fn self_destruct_damage(config: &GameConfig, health: f64) -> f64 {
    config.self_destruct_base_damage + config.self_destruct_damage_factor * health.max(0.0)
}

/// Scorchers burn every ground target in their arc; everything else hits one.
pub const fn hits_area(attacker: RobotType) -> bool {
    matches!(attacker, RobotType::Scorcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityId, Position, Team};

    #[test]
    fn buffs_scale_damage() {
        let config = GameConfig::default();
        let mut target = Robot::new(EntityId(1), Team::A, RobotType::Soldier, Position::ORIGIN);
        assert_eq!(attack_damage(&target, 10.0, 1), 10.0);

        if let Some(buff) = on_hit_buff(RobotType::Disrupter, &config, 1) {
            target.buffs.add(buff, 1);
        }
        let boosted = 10.0 * (1.0 + config.disrupted_damage_bonus);
        assert_eq!(attack_damage(&target, 10.0, 2), boosted);
        assert_eq!(
            attack_damage(&target, 10.0, 1 + config.disrupted_duration),
            10.0
        );
        assert!(on_hit_buff(RobotType::Soldier, &config, 1).is_none());
    }

    #[test]
    fn blast_grows_with_remaining_health() {
        let config = GameConfig::default();
        assert_eq!(self_destruct_damage(&config, 0.0), config.self_destruct_base_damage);
        assert!(self_destruct_damage(&config, 40.0) > self_destruct_damage(&config, 10.0));
    }
}
