use crate::catalog::RobotType;
use crate::config::GameConfig;
use crate::state::{EntityId, Position, Round, Team};

/// A tree occupying the ground slot of its center tile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tree {
    pub id: EntityId,
    pub team: Team,
    pub position: Position,
    pub radius: f64,
    pub health: f64,
    /// Rounds this tree has been through a growth or decay step.
    pub age: Round,
    /// Flux released to the destroying team.
    pub contained_flux: f64,
    /// Robot released on the tree's tile when it is destroyed.
    pub contained_robot: Option<RobotType>,
}

impl Tree {
    /// A fresh tree with its starting health.
    ///
    /// Neutral trees start proportional to their radius, owned trees at a
    /// fixed fraction of the cap.
    pub fn new(
        id: EntityId,
        team: Team,
        position: Position,
        radius: f64,
        config: &GameConfig,
    ) -> Self {
        let health = match team {
            Team::Neutral => (config.neutral_tree_health_rate * radius).min(config.tree_max_health),
            Team::A | Team::B => config.tree_initial_fraction * config.tree_max_health,
        };
        Self {
            id,
            team,
            position,
            radius,
            health,
            age: 0,
            contained_flux: 0.0,
            contained_robot: None,
        }
    }

    pub fn with_payload(mut self, flux: f64, robot: Option<RobotType>) -> Self {
        self.contained_flux = flux;
        self.contained_robot = robot;
        self
    }

    /// True while the tree still grows each round.
    pub fn is_growing(&self, config: &GameConfig) -> bool {
        self.age <= config.tree_growth_rounds
    }

    /// Sets health clamped to `[0, cap]`. Returns true when it reached zero.
    pub(crate) fn set_health(&mut self, health: f64, cap: f64) -> bool {
        self.health = health.clamp(0.0, cap);
        self.health == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_health_depends_on_owner() {
        let config = GameConfig::default();
        let neutral = Tree::new(EntityId(1), Team::Neutral, Position::ORIGIN, 2.0, &config);
        assert_eq!(neutral.health, 20.0);
        let huge = Tree::new(EntityId(2), Team::Neutral, Position::ORIGIN, 50.0, &config);
        assert_eq!(huge.health, 100.0);
        let owned = Tree::new(EntityId(3), Team::B, Position::ORIGIN, 1.0, &config);
        assert_eq!(owned.health, 20.0);
    }
}
