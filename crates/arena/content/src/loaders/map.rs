//! Match map loader.
//!
//! A map file carries the terrain as glyph rows (`.` land, `#` void), the
//! starting robots and trees, team balances and the optional supply network.

use std::path::Path;

use arena_core::env::{MapDimensions, TerrainTile};
use arena_core::{
    Direction, GameConfig, GridMap, MatchSetup, NodeGraph, Position, RobotPlacement, RobotType,
    Team, TreePlacement,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapFileRon {
    name: String,
    #[serde(default)]
    seed: u64,
    terrain: Vec<String>,
    #[serde(default)]
    robots: Vec<RobotRon>,
    #[serde(default)]
    trees: Vec<TreeRon>,
    #[serde(default)]
    starting_resources: (f64, f64),
    #[serde(default)]
    network: Option<NetworkRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RobotRon {
    team: Team,
    robot_type: RobotType,
    position: (i32, i32),
    #[serde(default)]
    direction: Option<Direction>,
    #[serde(default)]
    flux: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TreeRon {
    team: Team,
    position: (i32, i32),
    radius: f64,
    #[serde(default)]
    contained_flux: f64,
    #[serde(default)]
    contained_robot: Option<RobotType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct NetworkRon {
    #[serde(default)]
    nodes: Vec<(i32, i32)>,
    #[serde(default)]
    edges: Vec<((i32, i32), (i32, i32))>,
    #[serde(default)]
    cores: Vec<((i32, i32), Team)>,
}

fn at((x, y): (i32, i32)) -> Position {
    Position::new(x, y)
}

/// Loader for match maps from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Loads a map file into a setup using `config`.
    pub fn load(path: &Path, config: GameConfig) -> LoadResult<MatchSetup> {
        let content = read_file(path)?;
        Self::parse(&content, config)
            .map_err(|e| anyhow::anyhow!("Invalid map {}: {}", path.display(), e))
    }

    pub fn parse(content: &str, config: GameConfig) -> LoadResult<MatchSetup> {
        let data: MapFileRon =
            ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let map = Self::build_grid(&data.name, &data.terrain)?;
        let mut setup = MatchSetup::new(map, data.seed)
            .with_config(config)
            .with_resources(data.starting_resources.0, data.starting_resources.1);

        for robot in data.robots {
            let placement = RobotPlacement::new(robot.team, robot.robot_type, at(robot.position))
                .facing(robot.direction.unwrap_or(Direction::North))
                .with_flux(robot.flux);
            setup = setup.robot(placement);
        }

        for tree in data.trees {
            setup = setup.tree(TreePlacement {
                contained_flux: tree.contained_flux,
                contained_robot: tree.contained_robot,
                ..TreePlacement::new(tree.team, at(tree.position), tree.radius)
            });
        }

        if let Some(layout) = data.network {
            let mut network = NodeGraph::new();
            for node in layout.nodes {
                network.add_node(at(node));
            }
            for (a, b) in layout.edges {
                network.add_edge(at(a), at(b));
            }
            for (core, team) in layout.cores {
                network.add_core(at(core), team);
            }
            setup = setup.with_network(network);
        }

        Ok(setup)
    }

    fn build_grid(name: &str, rows: &[String]) -> LoadResult<GridMap> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            anyhow::bail!("map '{}' has no terrain", name);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                anyhow::bail!("terrain row {} has length {}, expected {}", y, row.chars().count(), width);
            }
            for (x, glyph) in row.chars().enumerate() {
                let tile = TerrainTile::from_glyph(glyph)
                    .ok_or_else(|| anyhow::anyhow!("unknown terrain glyph '{}' at ({}, {})", glyph, x, y))?;
                tiles.push(tile);
            }
        }

        let dimensions = MapDimensions::new(width as u32, height as u32);
        GridMap::new(name, dimensions, tiles).ok_or_else(|| anyhow::anyhow!("terrain does not fill the grid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{GameState, Level, MapOracle, SupplyNetwork};

    const DUEL: &str = r#"(
        name: "duel",
        seed: 99,
        terrain: [
            ".....",
            "..#..",
            ".....",
        ],
        robots: [
            (team: A, robot_type: Archon, position: (0, 0), direction: Some(East), flux: 100.0),
            (team: B, robot_type: Archon, position: (4, 2)),
            (team: A, robot_type: Tower, position: (1, 0)),
        ],
        trees: [
            (team: Neutral, position: (3, 0), radius: 1.5, contained_robot: Some(Scout)),
        ],
        starting_resources: (50.0, 25.0),
        network: Some((
            edges: [((0, 1), (1, 0))],
            cores: [((0, 1), A)],
        )),
    )"#;

    #[test]
    fn parses_a_complete_map() {
        let setup = MapLoader::parse(DUEL, GameConfig::default()).unwrap();
        assert_eq!(setup.seed, 99);
        assert_eq!(setup.map.name(), "duel");
        assert_eq!(setup.map.dimensions(), MapDimensions::new(5, 3));
        assert!(!setup.map.is_traversable(Position::new(2, 1), Level::Ground));
        assert_eq!(setup.robots.len(), 3);
        assert_eq!(setup.robots[0].direction, Direction::East);
        assert_eq!(setup.robots[1].direction, Direction::North);
        assert_eq!(setup.trees[0].contained_robot, Some(RobotType::Scout));
        assert_eq!(setup.starting_resources, [50.0, 25.0]);
        assert!(setup.network.is_node(Position::new(1, 0)));

        let state = GameState::from_setup(&setup).unwrap();
        assert_eq!(state.entities().robots().count(), 3);
        assert_eq!(state.ledger().balance(Team::A), 50.0);
    }

    #[test]
    fn ragged_terrain_is_rejected() {
        let ragged = r#"(name: "bad", terrain: ["...", ".."])"#;
        assert!(MapLoader::parse(ragged, GameConfig::default()).is_err());

        let glyph = r#"(name: "bad", terrain: ["..x"])"#;
        assert!(MapLoader::parse(glyph, GameConfig::default()).is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duel.ron");
        std::fs::write(&path, DUEL).unwrap();
        let setup = MapLoader::load(&path, GameConfig::default().with_max_rounds(10)).unwrap();
        assert_eq!(setup.config.max_rounds, 10);
    }
}
