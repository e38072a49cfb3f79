use std::collections::BTreeSet;

use crate::catalog::{RobotStats, RobotType};
use crate::config::GameConfig;
use crate::state::{Buffs, Direction, EntityId, Level, Position, Round, Team};

bitflags::bitflags! {
    /// Fields that changed since the last end-of-round health report.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DirtyFlags: u8 {
        const HEALTH = 1 << 0;
        const FLUX   = 1 << 1;
    }
}

/// Broadcast payload delivered to robots within broadcast range.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub ints: Vec<i32>,
    pub strings: Vec<String>,
    pub locations: Vec<Position>,
}

/// A received message with its sender.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    pub sender: EntityId,
    pub round: Round,
    pub message: Message,
}

/// Authoritative state of one robot.
///
/// Only signal application mutates a robot; everything else reads it through
/// `&GameState`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Robot {
    pub id: EntityId,
    pub team: Team,
    pub robot_type: RobotType,
    pub position: Position,
    pub direction: Direction,
    pub health: f64,
    pub flux: f64,
    /// Rounds until movement is usable again.
    pub movement_idle: u32,
    /// Rounds until attacking is usable again.
    pub attack_idle: u32,
    pub buffs: Buffs,
    pub has_broadcast: bool,
    /// Regeneration queued for the next turn (or next round for towers).
    pub regen: bool,
    pub upkeep_paid: bool,
    pub control_bits: u64,
    pub bytecodes_used: u32,
    pub indicator_strings: [String; GameConfig::NUMBER_OF_INDICATOR_STRINGS],
    /// Tiles this robot has sensed at least once.
    pub map_memory: BTreeSet<Position>,
    pub inbox: Vec<Envelope>,
    pub dirty: DirtyFlags,
}

impl Robot {
    /// A robot at full health with no flux and both timers idle.
    pub fn new(id: EntityId, team: Team, robot_type: RobotType, position: Position) -> Self {
        let stats = robot_type.stats();
        Self {
            id,
            team,
            robot_type,
            position,
            direction: Direction::None,
            health: stats.max_health,
            flux: 0.0,
            movement_idle: 0,
            attack_idle: 0,
            buffs: Buffs::empty(),
            has_broadcast: false,
            regen: false,
            upkeep_paid: true,
            control_bits: 0,
            bytecodes_used: 0,
            indicator_strings: Default::default(),
            map_memory: BTreeSet::new(),
            inbox: Vec::new(),
            dirty: DirtyFlags::empty(),
        }
    }

    #[inline]
    pub fn stats(&self) -> &'static RobotStats {
        self.robot_type.stats()
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.robot_type.level()
    }

    #[inline]
    pub fn max_health(&self) -> f64 {
        self.stats().max_health
    }

    #[inline]
    pub fn max_flux(&self) -> f64 {
        self.stats().max_flux
    }

    pub fn is_movement_idle(&self) -> bool {
        self.movement_idle == 0
    }

    pub fn is_attack_idle(&self) -> bool {
        self.attack_idle == 0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Sets health, clamped to `[.., max_health]`.
    ///
    /// Returns true when the new value is lethal.
    pub(crate) fn set_health(&mut self, health: f64) -> bool {
        let clamped = health.min(self.max_health());
        if clamped != self.health {
            self.dirty |= DirtyFlags::HEALTH;
        }
        self.health = clamped;
        self.health <= 0.0
    }

    /// Adds (or removes) flux, clamped to `[0, max_flux]`.
    pub(crate) fn adjust_flux(&mut self, amount: f64) {
        self.set_flux(self.flux + amount);
    }

    pub(crate) fn set_flux(&mut self, flux: f64) {
        let clamped = flux.clamp(0.0, self.max_flux());
        if clamped != self.flux {
            self.dirty |= DirtyFlags::FLUX;
        }
        self.flux = clamped;
    }

    /// Records every in-bounds tile within sensor range as remembered.
    pub(crate) fn remember_surroundings(&mut self, width: u32, height: u32) {
        let radius_squared = self.stats().sensor_radius_squared;
        if radius_squared < 0 {
            return;
        }
        let reach = (radius_squared as f64).sqrt() as i32;
        let center = self.position;
        for y in (center.y - reach).max(0)..=(center.y + reach).min(height as i32 - 1) {
            for x in (center.x - reach).max(0)..=(center.x + reach).min(width as i32 - 1) {
                let tile = Position::new(x, y);
                if center.distance_squared(tile) <= radius_squared {
                    self.map_memory.insert(tile);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flux_is_clamped_to_capacity() {
        let mut scout = Robot::new(EntityId(1), Team::A, RobotType::Scout, Position::ORIGIN);
        scout.adjust_flux(500.0);
        assert_eq!(scout.flux, 50.0);
        scout.adjust_flux(-80.0);
        assert_eq!(scout.flux, 0.0);
        assert!(scout.dirty.contains(DirtyFlags::FLUX));
    }

    #[test]
    fn health_is_clamped_to_max() {
        let mut soldier = Robot::new(EntityId(1), Team::A, RobotType::Soldier, Position::ORIGIN);
        assert!(!soldier.set_health(100.0));
        assert_eq!(soldier.health, 40.0);
        assert!(soldier.set_health(0.0));
    }

    #[test]
    fn surroundings_stay_inside_the_map() {
        let mut soldier = Robot::new(EntityId(1), Team::A, RobotType::Soldier, Position::new(0, 0));
        soldier.remember_surroundings(4, 4);
        assert!(soldier.map_memory.iter().all(|p| p.x >= 0 && p.y >= 0 && p.x < 4 && p.y < 4));
        assert!(soldier.map_memory.contains(&Position::new(3, 1)));
        assert!(!soldier.map_memory.contains(&Position::new(3, 3)));
    }
}
