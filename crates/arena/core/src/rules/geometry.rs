//! Range and arc checks.
//!
//! Ranges compare squared distances against the catalog's squared radii.
//! Arcs compare the bearing's cosine against the catalog's precomputed
//! half-angle cosine.

use crate::catalog::RobotStats;
use crate::state::{Direction, Position};

/// Float slack for bearings that sit exactly on an arc edge.
const ARC_EPSILON: f64 = 1e-9;

#[inline]
pub fn within_radius(origin: Position, target: Position, radius_squared: i32) -> bool {
    origin.distance_squared(target) <= radius_squared
}

#[inline]
pub fn within_band(origin: Position, target: Position, min_squared: i32, max_squared: i32) -> bool {
    let d = origin.distance_squared(target);
    min_squared <= d && d <= max_squared
}

/// True when `target` lies inside the arc of `angle` degrees centred on
/// `facing`.
///
/// Full circles always pass, as does the origin tile. A robot facing
/// `Direction::None` only sees with a full circle.
pub fn within_arc(
    origin: Position,
    facing: Direction,
    target: Position,
    angle: f64,
    cos_half_theta: f64,
) -> bool {
    if angle >= 360.0 || origin == target {
        return true;
    }
    if facing.is_none() {
        return false;
    }
    let (fx, fy) = facing.delta();
    let vx = target.x - origin.x;
    let vy = target.y - origin.y;
    let dot = (fx * vx + fy * vy) as f64;
    let norm = (((fx * fx + fy * fy) * (vx * vx + vy * vy)) as f64).sqrt();
    dot / norm >= cos_half_theta - ARC_EPSILON
}

pub fn can_sense(stats: &RobotStats, origin: Position, facing: Direction, target: Position) -> bool {
    stats.can_sense()
        && within_radius(origin, target, stats.sensor_radius_squared)
        && within_arc(
            origin,
            facing,
            target,
            stats.sensor_angle,
            stats.sensor_cos_half_theta,
        )
}

pub fn in_attack_range(stats: &RobotStats, origin: Position, target: Position) -> bool {
    within_band(
        origin,
        target,
        stats.attack_radius_min_squared,
        stats.attack_radius_max_squared,
    )
}

pub fn in_attack_arc(stats: &RobotStats, origin: Position, facing: Direction, target: Position) -> bool {
    within_arc(
        origin,
        facing,
        target,
        stats.attack_angle,
        stats.attack_cos_half_theta,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RobotType;

    #[test]
    fn attack_band_is_inclusive() {
        let stats = RobotType::Disrupter.stats();
        let origin = Position::new(0, 0);
        // 3² + 1² = 10 == max radius squared
        assert!(in_attack_range(stats, origin, Position::new(3, 1)));
        // 13 is the next lattice distance
        assert!(!in_attack_range(stats, origin, Position::new(3, 2)));

        // 2² + 1² = 5 is exactly max + 1 for a band ending at 4
        assert!(within_band(origin, Position::new(2, 0), 0, 4));
        assert!(!within_band(origin, Position::new(2, 1), 0, 4));
    }

    #[test]
    fn scorcher_cannot_hit_its_own_tile() {
        let stats = RobotType::Scorcher.stats();
        let origin = Position::new(5, 5);
        assert!(!in_attack_range(stats, origin, origin));
        assert!(in_attack_range(stats, origin, origin.add(Direction::North)));
    }

    #[test]
    fn arc_edges_are_inclusive() {
        let stats = RobotType::Soldier.stats();
        let origin = Position::new(5, 5);
        assert!(in_attack_arc(stats, origin, Direction::North, Position::new(6, 4)));
        assert!(in_attack_arc(stats, origin, Direction::North, Position::new(5, 3)));
        assert!(!in_attack_arc(stats, origin, Direction::North, Position::new(6, 5)));
        assert!(!in_attack_arc(stats, origin, Direction::North, Position::new(5, 6)));
    }

    #[test]
    fn full_circle_ignores_facing() {
        let stats = RobotType::Scout.stats();
        let origin = Position::new(0, 0);
        assert!(in_attack_arc(stats, origin, Direction::None, Position::new(-2, 1)));
        assert!(can_sense(stats, origin, Direction::North, Position::new(0, 5)));
        assert!(!can_sense(stats, origin, Direction::North, Position::new(0, 6)));
    }

    #[test]
    fn towers_sense_nothing() {
        let stats = RobotType::Tower.stats();
        assert!(!can_sense(stats, Position::ORIGIN, Direction::North, Position::ORIGIN));
    }
}
