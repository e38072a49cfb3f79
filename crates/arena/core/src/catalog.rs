//! Static archetype catalog.
//!
//! Every robot type maps to one immutable [`RobotStats`] row. Derived columns
//! (diagonal move delay, cone cosines) are computed once per process when the
//! table is first touched; afterwards every lookup is a plain array index.
use std::sync::OnceLock;

use strum::{EnumCount, IntoEnumIterator};

use crate::state::Level;

/// Robot archetypes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RobotType {
    /// Producing unit. Spawns mobile units and anchors flux production.
    Archon,
    Soldier,
    Scout,
    Disrupter,
    Scorcher,
    /// Immobile structure placed on a supply node. Takes no turns.
    Tower,
}

/// Immutable stat row for one robot type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RobotStats {
    pub level: Level,
    pub max_health: f64,
    pub max_flux: f64,
    pub spawn_cost: f64,
    pub move_delay_orthogonal: u32,
    /// `round(move_delay_orthogonal × √2)`.
    pub move_delay_diagonal: u32,
    pub move_cost: f64,
    /// Negative radius means the type cannot sense at all.
    pub sensor_radius_squared: i32,
    pub sensor_angle: f64,
    pub sensor_cos_half_theta: f64,
    pub attack_radius_min_squared: i32,
    pub attack_radius_max_squared: i32,
    pub attack_angle: f64,
    pub attack_cos_half_theta: f64,
    pub attack_delay: u32,
    pub attack_power: f64,
    pub can_attack_air: bool,
    pub can_attack_ground: bool,
}

impl RobotStats {
    #[allow(clippy::too_many_arguments)]
    fn build(
        level: Level,
        max_health: f64,
        max_flux: f64,
        spawn_cost: f64,
        move_delay_orthogonal: u32,
        move_cost: f64,
        sensor_radius_squared: i32,
        sensor_angle: f64,
        attack_radius_min_squared: i32,
        attack_radius_max_squared: i32,
        attack_angle: f64,
        attack_delay: u32,
        attack_power: f64,
        can_attack_air: bool,
        can_attack_ground: bool,
    ) -> Self {
        Self {
            level,
            max_health,
            max_flux,
            spawn_cost,
            move_delay_orthogonal,
            move_delay_diagonal: (move_delay_orthogonal as f64 * std::f64::consts::SQRT_2).round()
                as u32,
            move_cost,
            sensor_radius_squared,
            sensor_angle,
            sensor_cos_half_theta: half_angle_cos(sensor_angle),
            attack_radius_min_squared,
            attack_radius_max_squared,
            attack_angle,
            attack_cos_half_theta: half_angle_cos(attack_angle),
            attack_delay,
            attack_power,
            can_attack_air,
            can_attack_ground,
        }
    }

    pub const fn can_attack(&self, level: Level) -> bool {
        match level {
            Level::Ground => self.can_attack_ground,
            Level::Air => self.can_attack_air,
        }
    }

    pub const fn is_airborne(&self) -> bool {
        matches!(self.level, Level::Air)
    }

    pub const fn can_sense(&self) -> bool {
        self.sensor_radius_squared >= 0
    }
}

fn half_angle_cos(angle_degrees: f64) -> f64 {
    (angle_degrees * std::f64::consts::PI / 360.0).cos()
}

static CATALOG: OnceLock<[RobotStats; RobotType::COUNT]> = OnceLock::new();

fn catalog() -> &'static [RobotStats; RobotType::COUNT] {
    CATALOG.get_or_init(|| {
        use Level::{Air, Ground};
        //                   level   hp   flux  cost md mvc  sr   sa  amin amax  aa ad  ap   air    ground
        [
            RobotStats::build(Ground, 150.0, 300.0, 0.0, 6, 0.0, 36, 360.0, 0, 0, 0.0, 5, 0.0, false, false),
            RobotStats::build(Ground, 40.0, 100.0, 120.0, 6, 0.4, 10, 180.0, 0, 5, 90.0, 5, 6.0, true, true),
            RobotStats::build(Air, 20.0, 50.0, 80.0, 4, 0.1, 25, 360.0, 0, 5, 360.0, 5, 1.5, true, true),
            RobotStats::build(Ground, 70.0, 100.0, 180.0, 9, 1.2, 16, 180.0, 0, 10, 90.0, 5, 1.7, true, true),
            RobotStats::build(Ground, 70.0, 100.0, 270.0, 8, 1.8, 10, 135.0, 1, 10, 180.0, 5, 9.0, false, true),
            RobotStats::build(Ground, 250.0, 0.0, 200.0, 0, 0.0, -1, 0.0, 0, 0, 0.0, 0, 0.0, false, false),
        ]
    })
}

impl RobotType {
    /// Stat row for this type.
    #[inline]
    pub fn stats(self) -> &'static RobotStats {
        &catalog()[self as usize]
    }

    pub fn all() -> impl Iterator<Item = RobotType> {
        RobotType::iter()
    }

    pub fn is_airborne(self) -> bool {
        self.stats().is_airborne()
    }

    pub fn level(self) -> Level {
        self.stats().level
    }

    /// Immobile structures never get a turn and are built, not spawned.
    pub const fn is_structure(self) -> bool {
        matches!(self, RobotType::Tower)
    }

    /// Archons produce flux each turn and are the only spawners.
    pub const fn is_producer(self) -> bool {
        matches!(self, RobotType::Archon)
    }

    pub const fn has_turn(self) -> bool {
        !self.is_structure()
    }

    /// Non-producers pay upkeep at the start of every turn.
    pub const fn pays_upkeep(self) -> bool {
        !self.is_producer() && !self.is_structure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_delay_is_rounded_root_two() {
        assert_eq!(RobotType::Archon.stats().move_delay_diagonal, 8);
        assert_eq!(RobotType::Scout.stats().move_delay_diagonal, 6);
        assert_eq!(RobotType::Disrupter.stats().move_delay_diagonal, 13);
        assert_eq!(RobotType::Scorcher.stats().move_delay_diagonal, 11);
        assert_eq!(RobotType::Tower.stats().move_delay_diagonal, 0);
    }

    #[test]
    fn full_circle_cosine_is_minus_one() {
        let scout = RobotType::Scout.stats();
        assert!((scout.attack_cos_half_theta + 1.0).abs() < 1e-12);
        let soldier = RobotType::Soldier.stats();
        assert!((soldier.attack_cos_half_theta - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn rows_follow_declaration_order() {
        let levels: Vec<_> = RobotType::all().map(RobotType::level).collect();
        assert_eq!(levels.len(), RobotType::COUNT);
        assert_eq!(levels[RobotType::Scout as usize], Level::Air);
        assert!(RobotType::Scorcher.stats().can_attack(Level::Ground));
        assert!(!RobotType::Scorcher.stats().can_attack(Level::Air));
        assert!(!RobotType::Tower.stats().can_sense());
    }

    #[test]
    fn parses_snake_case_names() {
        assert_eq!("disrupter".parse::<RobotType>().ok(), Some(RobotType::Disrupter));
        assert_eq!(RobotType::Archon.as_ref(), "archon");
    }
}
