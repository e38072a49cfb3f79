//! Flux production and upkeep.

use crate::config::GameConfig;
use crate::state::{EntityId, Position};

/// Production for an archon whose nearest other friendly archon is
/// `nearest_squared` away (`None` when there is none).
///
/// `min + (max - min) * sqrt(d / penalty)` with `d` capped at the penalty
/// radius: at or beyond it yields max, stacked archons yield min.
pub fn production(config: &GameConfig, nearest_squared: Option<i32>) -> f64 {
    let penalty = config.production_penalty_radius_squared;
    let d = nearest_squared.map_or(penalty, |d| d.clamp(0, penalty));
    config.min_production
        + (config.max_production - config.min_production) * (d as f64 / penalty as f64).sqrt()
}

/// Squared distance from `archon` to the nearest other archon in `archons`.
pub fn nearest_archon_squared(
    archon: EntityId,
    location: Position,
    archons: impl IntoIterator<Item = (EntityId, Position)>,
) -> Option<i32> {
    archons
        .into_iter()
        .filter(|(id, _)| *id != archon)
        .map(|(_, other)| location.distance_squared(other))
        .min()
}

/// Whether a robot holding `flux` can pay this turn's upkeep.
#[inline]
pub fn can_pay_upkeep(config: &GameConfig, flux: f64) -> bool {
    flux >= config.unit_upkeep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_falls_off_with_crowding() {
        let config = GameConfig::default();
        let penalty = config.production_penalty_radius_squared;
        assert_eq!(production(&config, Some(penalty)), config.max_production);
        assert_eq!(production(&config, Some(penalty * 4)), config.max_production);
        assert_eq!(production(&config, None), config.max_production);
        assert_eq!(production(&config, Some(0)), config.min_production);

        let quarter = production(&config, Some(penalty / 4));
        let expected = config.min_production + (config.max_production - config.min_production) * 0.5;
        assert!((quarter - expected).abs() < 1e-12);
    }

    #[test]
    fn nearest_skips_self() {
        let me = EntityId(1);
        let here = Position::new(0, 0);
        let archons = [(me, here), (EntityId(2), Position::new(3, 0)), (EntityId(3), Position::new(1, 1))];
        assert_eq!(nearest_archon_squared(me, here, archons), Some(2));
        assert_eq!(nearest_archon_squared(me, here, [(me, here)]), None);
    }
}
